mod common;
use common::*;
use phantom::mach::{Event, Runtime, Val};

#[test]
fn test_stdin_waits_for_input() {
    let mut r = Runtime::default();
    assert!(!r.enter("var a = stdin; var b = stdin; a + b;"));
    assert_eq!(exec(&mut r), "? ");
    assert_eq!(r.execute(10), Event::Input);
    assert!(r.enter("3 4"));
    assert_eq!(exec(&mut r), "7\n");
}

#[test]
fn test_stdin_reads_one_line_at_a_time() {
    let mut r = Runtime::default();
    r.enter("var a = stdin; var b = stdin; a * b;");
    assert_eq!(exec(&mut r), "? ");
    r.enter("6");
    assert_eq!(exec(&mut r), "? ");
    r.enter("7");
    assert_eq!(exec(&mut r), "42\n");
}

#[test]
fn test_stdin_values() {
    let mut r = Runtime::default();
    r.enter("stdin; stdin; stdin;");
    assert_eq!(exec(&mut r), "? ");
    r.enter("-12 hello 2.5");
    assert_eq!(exec(&mut r), "-12\nhello\n2.5\n");
}

#[test]
fn test_blank_input_keeps_waiting() {
    let mut r = Runtime::default();
    r.enter("var n = stdin;");
    assert_eq!(exec(&mut r), "? ");
    r.enter("   ");
    assert_eq!(exec(&mut r), "? ");
    r.enter("5");
    assert_eq!(exec(&mut r), "");
    assert_eq!(r.var("n"), Some(&Val::Integer(5)));
}

#[test]
fn test_unused_input_is_kept_for_later() {
    let mut r = Runtime::default();
    r.enter("stdin;");
    assert_eq!(exec(&mut r), "? ");
    r.enter("1 2");
    assert_eq!(exec(&mut r), "1\n");
    r.enter("stdin;");
    assert_eq!(exec(&mut r), "2\n");
}

#[test]
fn test_interrupt_while_waiting() {
    let mut r = Runtime::default();
    r.enter("1;\nstdin;");
    assert_eq!(exec(&mut r), "1\n? ");
    r.interrupt();
    assert_eq!(exec(&mut r), "BREAK IN 2:1\n");
    assert!(!r.enter("2;"));
    assert_eq!(exec(&mut r), "2\n");
}

#[test]
fn test_stdin_in_loop() {
    let mut r = Runtime::default();
    r.enter("var total = 0; loop (3) { total = total + stdin; } total;");
    assert_eq!(exec(&mut r), "? ");
    r.enter("1 2 3");
    assert_eq!(exec(&mut r), "6\n");
}
