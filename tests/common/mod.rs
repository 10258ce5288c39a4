#![allow(dead_code)]
use phantom::mach::{Config, Event, Runtime};

pub fn seeded(seed: u64) -> Runtime {
    Runtime::new(Config {
        seed: Some(seed),
        ..Config::default()
    })
}

pub fn exec(runtime: &mut Runtime) -> String {
    exec_n(runtime, 5000)
}

pub fn exec_n(runtime: &mut Runtime, cycles: usize) -> String {
    let mut s = String::new();
    let mut prev_running = false;
    loop {
        let event = runtime.execute(cycles);
        match &event {
            Event::Stopped => {
                break;
            }
            Event::Errors(errors) => {
                for error in errors.iter() {
                    s.push_str(&format!("{}\n", error));
                }
            }
            Event::Running => {
                if prev_running {
                    s.push_str(&format!("\n{} Execution cycles exceeded.\n", cycles));
                    break;
                }
            }
            Event::Print(ps) => {
                s.push_str(ps);
            }
            Event::Input => {
                s.push_str("? ");
                break;
            }
        }
        prev_running = event == Event::Running;
    }
    s
}

/// Compile and run `source` on a fresh runtime.
pub fn eval(source: &str) -> String {
    let mut r = Runtime::default();
    r.enter(source);
    exec(&mut r)
}
