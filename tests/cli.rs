//! End-to-end scenarios run against the built binary.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn program_path(name: &str) -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "tests", "programs", name]
        .iter()
        .collect()
}

fn run_program(name: &str, stdin: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_brainforge"))
        .arg(program_path(name))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn brainforge");

    child
        .stdin
        .as_mut()
        .expect("stdin was piped")
        .write_all(stdin)
        .expect("failed to feed stdin");

    child.wait_with_output().expect("brainforge did not exit")
}

#[test]
fn prints_a() {
    let output = run_program("print_a.bf", b"");
    assert!(output.status.success());
    assert_eq!(output.stdout, b"A");
}

#[test]
fn hello_world() {
    let output = run_program("hello.bf", b"");
    assert!(output.status.success());
    assert_eq!(output.stdout, b"Hello World!\n");
}

#[test]
fn echoes_one_byte_from_stdin() {
    let output = run_program("echo.bf", b"Z");
    assert!(output.status.success());
    assert_eq!(output.stdout, b"Z");
}

#[test]
fn nested_loop_counter_prints_byte_six() {
    let output = run_program("nested.bf", b"");
    assert!(output.status.success());
    assert_eq!(output.stdout, [6]);
}

#[test]
fn pointer_motion_prints_the_first_cell() {
    let output = run_program("motion.bf", b"");
    assert!(output.status.success());
    assert_eq!(output.stdout, [1]);
}

#[test]
fn unmatched_open_bracket_fails_without_output() {
    let output = run_program("unmatched_open.bf", b"");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn unmatched_close_bracket_fails_without_output() {
    let output = run_program("unmatched_close.bf", b"");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn missing_source_file_fails() {
    let output = run_program("does_not_exist.bf", b"");
    assert!(!output.status.success());
}

#[test]
fn matches_the_reference_interpreter_on_hello_world() {
    let source = fs::read(program_path("hello.bf")).unwrap();
    let expected = interpret(&source, b"");

    let output = run_program("hello.bf", b"");
    assert_eq!(output.stdout, expected);
}

#[test]
fn matches_the_reference_interpreter_on_piped_input() {
    let source = fs::read(program_path("echo.bf")).unwrap();
    let expected = interpret(&source, b"Q");

    let output = run_program("echo.bf", b"Q");
    assert_eq!(output.stdout, expected);
}

/// Reference interpreter the JIT output is cross-checked against.
fn interpret(source: &[u8], mut input: &[u8]) -> Vec<u8> {
    let code: Vec<u8> = source
        .iter()
        .copied()
        .filter(|b| b"+-><.,[]".contains(b))
        .collect();

    let mut tape = vec![0u8; 50_000];
    let mut cell = 0usize;
    let mut pc = 0usize;
    let mut out = Vec::new();

    while pc < code.len() {
        match code[pc] {
            b'+' => tape[cell] = tape[cell].wrapping_add(1),
            b'-' => tape[cell] = tape[cell].wrapping_sub(1),
            b'>' => cell += 1,
            b'<' => cell -= 1,
            b'.' => out.push(tape[cell]),
            b',' => {
                // EOF leaves the cell unchanged, like the compiled code
                if let Some((&first, rest)) = input.split_first() {
                    tape[cell] = first;
                    input = rest;
                }
            }
            b'[' if tape[cell] == 0 => pc = matching_close(&code, pc),
            b']' if tape[cell] != 0 => pc = matching_open(&code, pc),
            _ => {}
        }
        pc += 1;
    }

    out
}

fn matching_close(code: &[u8], open: usize) -> usize {
    let mut depth = 0;
    for (i, &byte) in code.iter().enumerate().skip(open) {
        match byte {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
    }
    panic!("unbalanced test fixture");
}

fn matching_open(code: &[u8], close: usize) -> usize {
    let mut depth = 0;
    for i in (0..=close).rev() {
        match code[i] {
            b']' => depth += 1,
            b'[' => {
                depth -= 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
    }
    panic!("unbalanced test fixture");
}
