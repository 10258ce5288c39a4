//! # Phantom
//!
//! Runs a Phantom source file, or starts the interactive prompt when no
//! file is given.

use clap::Parser;
use phantom::mach::{Config, ErrorPolicy};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod term;

#[derive(Parser, Debug)]
#[command(name = "phantom", version)]
#[command(about = "The Phantom scripting language")]
pub struct Cli {
    /// Source file to run. Starts the REPL when omitted.
    file: Option<PathBuf>,

    /// Stop at the first runtime error instead of skipping the statement
    #[arg(long)]
    halt_on_error: bool,

    /// Seed for `rand`
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum operand stack depth
    #[arg(long, default_value = "1024")]
    stack_limit: usize,

    /// Print the token stream and exit
    #[arg(long)]
    tokens: bool,

    /// Print the compiled opcodes and exit
    #[arg(long)]
    disassemble: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            on_error: if self.halt_on_error {
                ErrorPolicy::Halt
            } else {
                ErrorPolicy::Continue
            },
            stack_limit: self.stack_limit,
            seed: self.seed,
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_env("PHANTOM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = term::main(&cli);
    std::process::exit(code);
}
