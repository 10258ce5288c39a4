use crate::Cli;
use ansi_term::Style;
use linefeed::{Interface, ReadResult, Signal};
use phantom::lang::{lex, parse, Error};
use phantom::mach::{Event, Program, Runtime};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

const CYCLES: usize = 5000;

pub fn main(cli: &Cli) -> i32 {
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    if let Err(error) = ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    }) {
        warn!("unable to set Ctrl-C handler: {}", error);
    }
    let result = match &cli.file {
        None => main_loop(cli, interrupted),
        Some(path) => run_file(cli, path, interrupted),
    };
    match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{}", error);
            1
        }
    }
}

fn paint(error: &Error) -> String {
    Style::new().bold().paint(error.to_string()).to_string()
}

fn main_loop(cli: &Cli, interrupted: Arc<AtomicBool>) -> std::io::Result<i32> {
    let mut runtime = Runtime::new(cli.config());
    let command = Interface::new("phantom")?;
    command.set_prompt(">> ")?;
    let input = Interface::new("stdin")?;
    input.set_report_signal(Signal::Interrupt, true);
    command.write_fmt(format_args!("Phantom {}\n", env!("CARGO_PKG_VERSION")))?;

    loop {
        if interrupted.swap(false, Ordering::SeqCst) {
            runtime.interrupt();
        }
        match runtime.execute(CYCLES) {
            Event::Stopped => {
                let string = match command.read_line()? {
                    ReadResult::Input(string) => string,
                    ReadResult::Signal(_) | ReadResult::Eof => break,
                };
                if string.trim().is_empty() {
                    continue;
                }
                if cli.tokens || cli.disassemble {
                    let lines = if cli.tokens {
                        Ok(token_table(&string))
                    } else {
                        listing(&string)
                    };
                    match lines {
                        Ok(lines) => {
                            for line in lines {
                                command.write_fmt(format_args!("{}\n", line))?;
                            }
                        }
                        Err(errors) => {
                            for error in errors.iter() {
                                command.write_fmt(format_args!("{}\n", paint(error)))?;
                            }
                        }
                    }
                } else {
                    runtime.enter(&string);
                }
                command.add_history_unique(string);
            }
            Event::Input => match input.read_line()? {
                ReadResult::Input(string) => {
                    runtime.enter(&string);
                }
                ReadResult::Signal(Signal::Interrupt) => {
                    input.set_buffer("")?;
                    input.lock_reader().cancel_read_line()?;
                    runtime.interrupt();
                }
                ReadResult::Signal(_) | ReadResult::Eof => break,
            },
            Event::Errors(errors) => {
                for error in errors.iter() {
                    command.write_fmt(format_args!("{}\n", paint(error)))?;
                }
            }
            Event::Running => {}
            Event::Print(s) => {
                command.write_fmt(format_args!("{}", s))?;
            }
        }
    }
    Ok(0)
}

fn run_file(cli: &Cli, path: &Path, interrupted: Arc<AtomicBool>) -> std::io::Result<i32> {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            return Err(std::io::Error::new(
                error.kind(),
                format!("Unable to read file '{}': {}", path.display(), error),
            ))
        }
    };
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    if cli.tokens {
        for line in token_table(&source) {
            writeln!(stdout, "{}", line)?;
        }
        return Ok(0);
    }
    if cli.disassemble {
        return match listing(&source) {
            Ok(lines) => {
                for line in lines {
                    writeln!(stdout, "{}", line)?;
                }
                Ok(0)
            }
            Err(errors) => {
                for error in errors.iter() {
                    eprintln!("{}", paint(error));
                }
                Ok(1)
            }
        };
    }

    let mut runtime = Runtime::new(cli.config());
    runtime.enter(&source);
    let stdin = std::io::stdin();
    let mut failed = false;
    loop {
        if interrupted.swap(false, Ordering::SeqCst) {
            runtime.interrupt();
        }
        match runtime.execute(CYCLES) {
            Event::Stopped => break,
            Event::Running => {}
            Event::Print(s) => stdout.write_all(s.as_bytes())?,
            Event::Input => {
                stdout.flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    debug!("end of input while waiting on stdin");
                    runtime.interrupt();
                } else {
                    runtime.enter(&line);
                }
            }
            Event::Errors(errors) => {
                failed = true;
                stdout.flush()?;
                for error in errors.iter() {
                    eprintln!("{}", paint(error));
                }
            }
        }
    }
    stdout.flush()?;
    Ok(if failed { 1 } else { 0 })
}

/// One row per token: line, column, kind, byte length and source text.
fn token_table(source: &str) -> Vec<String> {
    let mut lines = vec![
        format!(
            " {:>4} | {:>4} | {:>20} | {:>4} | {}",
            "line", "col", "token type", "len", "value"
        ),
        "-".repeat(53),
    ];
    for token in lex(source) {
        lines.push(format!(
            " {:>4} | {:>4} | {:>20} | {:>4} | {}",
            token.line,
            token.col,
            token.kind.name(),
            token.span.len(),
            &source[token.span.clone()]
        ));
    }
    lines
}

fn listing(source: &str) -> Result<Vec<String>, Vec<Error>> {
    let ast = parse(source)?;
    let mut program = Program::new();
    if let Err(errors) = program.compile(&ast) {
        return Err(errors.as_ref().clone());
    }
    Ok(program
        .listing()
        .into_iter()
        .enumerate()
        .map(|(addr, line)| format!("{:04} {}", addr, line))
        .collect())
}
