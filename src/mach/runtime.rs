use super::{Address, Function, Opcode, Operation, Program, Stack, Val, Var};
use crate::error;
use crate::lang::{parse, Error};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace};

type Result<T> = std::result::Result<T, Error>;

/// What to do after a runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abandon the failing statement and resume after it.
    Continue,
    /// Stop the program.
    Halt,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub on_error: ErrorPolicy,
    /// Maximum number of values on the operand stack.
    pub stack_limit: usize,
    /// Seed for `rand`. Entropy is used when absent.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            on_error: ErrorPolicy::Continue,
            stack_limit: 1024,
            seed: None,
        }
    }
}

/// ## Virtual machine

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Stopped,
    Running,
    Print(String),
    Input,
    Errors(Arc<Vec<Error>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Stopped,
    Running,
    Input,
}

pub struct Runtime {
    program: Program,
    stack: Stack<Val>,
    vars: Var,
    pc: Address,
    state: State,
    input: VecDeque<String>,
    pending: Option<Arc<Vec<Error>>>,
    rng: StdRng,
    config: Config,
}

impl Default for Runtime {
    fn default() -> Runtime {
        Runtime::new(Config::default())
    }
}

impl Runtime {
    pub fn new(config: Config) -> Runtime {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Runtime {
            program: Program::new(),
            stack: Stack::with_limit("STACK OVERFLOW", config.stack_limit),
            vars: Var::new(),
            pc: 0,
            state: State::Stopped,
            input: VecDeque::new(),
            pending: None,
            rng,
            config,
        }
    }

    /// Enter source text to compile and run, replacing the previous
    /// program. Globals survive. While a `stdin` is waiting the text is
    /// taken as input instead, and true is returned.
    pub fn enter(&mut self, text: &str) -> bool {
        if self.state == State::Input {
            self.input
                .extend(text.split_whitespace().map(|s| s.to_string()));
            if !self.input.is_empty() {
                self.state = State::Running;
            }
            return true;
        }
        self.stop();
        self.pc = 0;
        match parse(text) {
            Err(errors) => {
                debug!(errors = errors.len(), "parse failed");
                self.program.clear();
                self.pending = Some(Arc::new(errors));
            }
            Ok(ast) => {
                debug!(statements = ast.len(), "parsed");
                match self.program.compile(&ast) {
                    Ok(()) => self.state = State::Running,
                    Err(errors) => self.pending = Some(errors),
                }
            }
        }
        false
    }

    /// Stop a running program with a `BREAK` error.
    pub fn interrupt(&mut self) {
        if self.state != State::Stopped {
            let mut error = error!(Break);
            if let Some(frame) = self.program.frame_for(self.pc) {
                error = error.in_position(frame.position);
            }
            self.stop();
            self.pending = Some(Arc::new(vec![error]));
        }
    }

    pub fn var(&self, name: &str) -> Option<&Val> {
        self.vars.get(name)
    }

    pub fn vars(&self) -> &Var {
        &self.vars
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run up to `iterations` opcodes. Returns early with anything the
    /// host must act on.
    pub fn execute(&mut self, iterations: usize) -> Event {
        if let Some(errors) = self.pending.take() {
            return Event::Errors(errors);
        }
        match self.state {
            State::Stopped => return Event::Stopped,
            State::Input => return Event::Input,
            State::Running => {}
        }
        for _ in 0..iterations {
            match self.step() {
                Ok(None) => {}
                Ok(Some(event)) => return event,
                Err(error) => return self.fault(error),
            }
        }
        Event::Running
    }

    fn stop(&mut self) {
        self.state = State::Stopped;
        self.stack.clear();
    }

    fn fault(&mut self, error: Error) -> Event {
        let addr = self.pc.saturating_sub(1);
        let frame = self.program.frame_for(addr).cloned();
        let error = match &frame {
            Some(frame) => error.or_position(frame.position),
            None => error,
        };
        debug!(%error, addr, "runtime error");
        match frame {
            Some(frame) if self.config.on_error == ErrorPolicy::Continue => {
                self.stack.truncate(frame.depth);
                self.pc = frame.range.end;
            }
            _ => self.stop(),
        }
        Event::Errors(Arc::new(vec![error]))
    }

    fn pop_name(&mut self) -> Result<std::rc::Rc<str>> {
        match self.stack.pop()? {
            Val::String(name) => Ok(name),
            _ => Err(error!(InternalError; "EXPECTED VARIABLE NAME")),
        }
    }

    fn unary(&mut self, f: fn(Val) -> Result<Val>) -> Result<()> {
        let val = self.stack.pop()?;
        self.stack.push(f(val)?)
    }

    fn binary(&mut self, f: fn(Val, Val) -> Result<Val>) -> Result<()> {
        let (lhs, rhs) = self.stack.pop_2()?;
        self.stack.push(f(lhs, rhs)?)
    }

    fn step(&mut self) -> Result<Option<Event>> {
        let op = match self.program.op(self.pc) {
            Some(op) => *op,
            None => {
                self.stop();
                return Ok(Some(Event::Stopped));
            }
        };
        trace!(pc = self.pc, %op, depth = self.stack.len());
        self.pc += 1;
        match op {
            Opcode::Const(idx) => match self.program.constant(idx) {
                Some(val) => self.stack.push(val.clone())?,
                None => return Err(error!(InternalError; "MISSING CONSTANT")),
            },
            Opcode::Pop => {
                let val = self.stack.pop()?;
                return Ok(Some(Event::Print(format!("{}\n", val))));
            }
            Opcode::VarDecl => {
                let val = self.stack.pop()?;
                let name = self.pop_name()?;
                self.vars.store(&name, val)?;
            }
            Opcode::VarGet => {
                let name = self.pop_name()?;
                match self.vars.get(&name) {
                    Some(val) => self.stack.push(val.clone())?,
                    None => return Err(error!(UndefinedVariable; &name)),
                }
            }
            Opcode::Inc => {
                let name = self.pop_name()?;
                let val = self.vars.increment(&name, 1)?;
                self.stack.push(val)?;
            }
            Opcode::Dec => {
                let name = self.pop_name()?;
                let val = self.vars.increment(&name, -1)?;
                self.stack.push(val)?;
            }
            Opcode::If(addr) => {
                if !self.stack.pop()?.is_truthy() {
                    self.pc = addr;
                }
            }
            Opcode::Else(addr) => self.pc = addr,
            Opcode::JumpEnd => {}
            Opcode::Loop(exit) => {
                let loop_addr = self.pc - 1;
                let state = match self.stack.pop()? {
                    Val::Integer(n) if n > 0 => Some(Val::Integer(n - 1)),
                    Val::Double(n) if n > 0.0 => Some(Val::Double(n - 1.0)),
                    Val::Integer(_) | Val::Double(_) => None,
                    val @ Val::String(_) | val @ Val::Boolean(_) => {
                        if val.is_truthy() {
                            Some(Val::Next(loop_addr))
                        } else {
                            None
                        }
                    }
                    Val::Next(_) => return Err(error!(TypeMismatch)),
                };
                match state {
                    Some(state) => self.stack.push(state)?,
                    None => self.pc = exit,
                }
            }
            Opcode::LoopEnd(loop_addr, reenter) => match self.stack.pop()? {
                counter @ Val::Integer(_) | counter @ Val::Double(_) => {
                    self.stack.push(counter)?;
                    self.pc = loop_addr;
                }
                Val::Next(addr) if addr == loop_addr => {
                    self.pc = loop_addr.saturating_sub(reenter);
                }
                _ => return Err(error!(InternalError; "LOOP STATE CORRUPTED")),
            },
            Opcode::Neg => self.unary(Operation::negate)?,
            Opcode::Not => self.unary(Operation::not)?,
            Opcode::Mul => self.binary(Operation::multiply)?,
            Opcode::Div => self.binary(Operation::divide)?,
            Opcode::Mod => self.binary(Operation::modulo)?,
            Opcode::Add => self.binary(Operation::sum)?,
            Opcode::Sub => self.binary(Operation::subtract)?,
            Opcode::Eq => self.binary(Operation::equal)?,
            Opcode::NotEq => self.binary(Operation::not_equal)?,
            Opcode::Lt => self.binary(Operation::less)?,
            Opcode::LtEq => self.binary(Operation::less_equal)?,
            Opcode::Gt => self.binary(Operation::greater)?,
            Opcode::GtEq => self.binary(Operation::greater_equal)?,
            Opcode::And => self.binary(Operation::and)?,
            Opcode::Or => self.binary(Operation::or)?,
            Opcode::Stdin => match self.input.pop_front() {
                Some(token) => self.stack.push(Function::input(&token))?,
                None => {
                    self.pc -= 1;
                    self.state = State::Input;
                    return Ok(Some(Event::Input));
                }
            },
            Opcode::Rand => {
                let bound = self.stack.pop()?;
                let val = Function::rand(bound, &mut self.rng)?;
                self.stack.push(val)?;
            }
            Opcode::Exit => {
                self.stop();
                return Ok(Some(Event::Stopped));
            }
        }
        Ok(None)
    }
}
