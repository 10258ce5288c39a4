use crate::lang::parse;
use crate::mach::{Config, ErrorPolicy, Event, Opcode, Program, Runtime, Val};

fn run(runtime: &mut Runtime) -> String {
    run_cycles(runtime, 5000)
}

fn run_cycles(runtime: &mut Runtime, cycles: usize) -> String {
    let mut s = String::new();
    let mut prev_running = false;
    loop {
        let event = runtime.execute(cycles);
        match &event {
            Event::Stopped | Event::Input => {
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
        }
        prev_running = event == Event::Running;
    }
    s
}

fn compile(source: &str) -> Program {
    let ast = parse(source).unwrap();
    let mut program = Program::new();
    program.compile(&ast).unwrap();
    program
}

fn listing(source: &str) -> Vec<String> {
    compile(source).listing()
}

fn compile_errors(source: &str) -> Vec<String> {
    let ast = parse(source).unwrap();
    let mut program = Program::new();
    match program.compile(&ast) {
        Ok(()) => vec![],
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    }
}

#[test]
fn test_listing_precedence() {
    assert_eq!(
        listing("1 + 2 * 3;"),
        vec!["CONST 1", "CONST 2", "CONST 3", "MUL", "ADD", "POP", "EXIT"]
    );
}

#[test]
fn test_listing_var_and_increment() {
    assert_eq!(
        listing("var x = 5; x++;"),
        vec![
            "CONST \"x\"",
            "CONST 5",
            "VAR_DECL",
            "CONST \"x\"",
            "INC",
            "POP",
            "EXIT"
        ]
    );
}

#[test]
fn test_listing_if_else() {
    assert_eq!(
        listing("if (0) { 1; } else { 2; }"),
        vec![
            "CONST 0",
            "IF 5",
            "CONST 1",
            "POP",
            "ELSE 7",
            "CONST 2",
            "POP",
            "JUMP_END",
            "EXIT"
        ]
    );
}

#[test]
fn test_listing_if_without_else() {
    assert_eq!(
        listing("if (true) { 1; }"),
        vec!["CONST true", "IF 4", "CONST 1", "POP", "JUMP_END", "EXIT"]
    );
}

#[test]
fn test_listing_loop() {
    assert_eq!(
        listing("loop (3) { 1; }"),
        vec!["CONST 3", "LOOP 5", "CONST 1", "POP", "LOOP_END 1", "EXIT"]
    );
}

#[test]
fn test_loop_end_reenters_condition() {
    let program = compile("var i = 0; loop (i < 3) { i++; }");
    let ops = program.ops();
    let loop_addr = ops
        .iter()
        .position(|op| matches!(op, Opcode::Loop(_)))
        .unwrap();
    let end = ops
        .iter()
        .find_map(|op| match op {
            Opcode::LoopEnd(addr, reenter) => Some((*addr, *reenter)),
            _ => None,
        })
        .unwrap();
    assert_eq!(end.0, loop_addr);
    match ops[loop_addr - end.1] {
        Opcode::Const(idx) => assert_eq!(program.constant(idx), Some(&Val::String("i".into()))),
        op => panic!("{}", op),
    }
    assert_eq!(ops[loop_addr - 1], Opcode::Lt);
}

#[test]
fn test_constant_indices_follow_relocation() {
    let program = compile("var a = 1; if (a) { a + 2; } loop (a) { 3; }");
    let indices: Vec<usize> = program
        .ops()
        .iter()
        .filter_map(|op| match op {
            Opcode::Const(idx) => Some(*idx),
            _ => None,
        })
        .collect();
    let expected: Vec<usize> = (0..program.constants().len()).collect();
    assert_eq!(indices, expected);
    assert_eq!(program.constants()[4], Val::Integer(2));
}

#[test]
fn test_nested_jumps_resolve() {
    let program = compile("loop (2) { if (1) { loop (3) { 4; } } else { 5; } }");
    let len = program.len();
    for op in program.ops() {
        match op {
            Opcode::If(addr) | Opcode::Else(addr) | Opcode::Loop(addr) => assert!(addr < len),
            Opcode::LoopEnd(addr, _) => {
                assert!(matches!(program.op(addr), Some(Opcode::Loop(_))))
            }
            _ => {}
        }
    }
}

#[test]
fn test_assignment_as_value_is_rejected() {
    assert_eq!(
        compile_errors("1 + (x = 2);"),
        vec!["SYNTAX ERROR IN 1:8; ASSIGNMENT CANNOT BE USED AS A VALUE"]
    );
    assert_eq!(
        compile_errors("if (x = 1) { }"),
        vec!["SYNTAX ERROR IN 1:7; ASSIGNMENT CANNOT BE USED AS A VALUE"]
    );
    assert_eq!(
        compile_errors("var y = x = 1;"),
        vec!["SYNTAX ERROR IN 1:11; ASSIGNMENT CANNOT BE USED AS A VALUE"]
    );
}

#[test]
fn test_invalid_assignment_target() {
    assert_eq!(
        compile_errors("1 = 2;"),
        vec!["SYNTAX ERROR IN 1:3; INVALID ASSIGNMENT TARGET"]
    );
}

#[test]
fn test_chained_assignment_statement_is_rejected() {
    assert_eq!(compile_errors("x = y = 1;").len(), 1);
    assert!(compile_errors("x = 1;").is_empty());
}

#[test]
fn test_nested_loops_keep_their_counters() {
    let mut r = Runtime::default();
    r.enter("var n = 0; loop (3) { loop (4) { n = n + 1; } } n;");
    assert_eq!(run(&mut r), "12\n");
}

#[test]
fn test_error_inside_loop_keeps_counter() {
    let mut r = Runtime::default();
    r.enter("var n = 0; loop (3) { n = n + 1; 1 / 0; } n;");
    assert_eq!(
        run(&mut r),
        "DIVISION BY ZERO IN 1:34\n".repeat(3) + "3\n"
    );
}

#[test]
fn test_halt_policy_stops_program() {
    let mut r = Runtime::new(Config {
        on_error: ErrorPolicy::Halt,
        ..Config::default()
    });
    r.enter("1; y; 2;");
    assert_eq!(run(&mut r), "1\nUNDEFINED VARIABLE IN 1:4; y\n");
}

#[test]
fn test_infinite_loop_keeps_running() {
    let mut r = Runtime::default();
    r.enter("loop (true) { }");
    assert_eq!(run_cycles(&mut r, 100), "\n100 Execution cycles exceeded.\n");
    r.interrupt();
    assert_eq!(run(&mut r), "BREAK IN 1:1\n");
}

#[test]
fn test_stack_limit() {
    let mut r = Runtime::new(Config {
        stack_limit: 2,
        ..Config::default()
    });
    r.enter("loop (1) { loop (1) { loop (1) { 7; } } } 8;");
    let out = run(&mut r);
    assert!(out.starts_with("OUT OF MEMORY IN 1:"));
    assert!(out.ends_with("8\n"));
}
