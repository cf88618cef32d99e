use super::*;
use crate::morse::asm::encode_line;
use crate::morse::console::BufferConsole;
use crate::morse::errors::{LoadError, LoadErrorKind};
use crate::morse::exec::{run, HaltReason};
use crate::morse::instruction::{Cond, Operand, Target};
use crate::morse::registers::{Cpu, Register};
use crate::morse::{codec, Memory};

fn to_morse(asm: &str) -> String {
    asm.lines().map(encode_line).collect::<Vec<_>>().join("\n")
}

fn run_morse(morse: &str) -> (Cpu, String, HaltReason) {
    let prog = load_morse(morse, false).expect("load");
    let mut cpu = Cpu::default();
    let mut mem = Memory::default();
    let mut console = BufferConsole::new();
    let summary = run(&mut cpu, &mut mem, &prog, &mut console, None).expect("run");
    (cpu, console.output, summary.reason)
}

#[test]
fn labels_on_their_own_line_and_inline() {
    let prog = load_text("start:\nMOV AX, 1\nloop: DEC AX\nJNZ loop\nend:", false).unwrap();
    assert_eq!(prog.len(), 3);
    assert_eq!(prog.label("start"), Some(0));
    assert_eq!(prog.label("loop"), Some(1));
    assert_eq!(prog.label("end"), Some(3));
    assert_eq!(prog.lines, vec![2, 3, 4]);
}

#[test]
fn forward_references_resolve() {
    let prog = load_text("JE done\nHLT\ndone: HLT", false).unwrap();
    assert_eq!(
        prog.instructions[0],
        Instruction::Jcc {
            cond: Cond::Zero,
            target: Target::Resolved { label: "done".into(), index: 2 },
        }
    );
}

#[test]
fn labels_are_case_sensitive() {
    let prog = load_text("Top: HLT\nJMP top", false).unwrap();
    assert_eq!(prog.instructions[1], Instruction::Jmp { target: Target::Unresolved("top".into()) });
}

#[test]
fn commas_and_whitespace_tokenize() {
    let prog = load_text("  mov   ax ,bx  ", false).unwrap();
    assert_eq!(
        prog.instructions[0],
        Instruction::Mov { dest: Operand::Reg(Register::Ax), src: Operand::Reg(Register::Bx) }
    );
}

#[test]
fn blank_and_undecodable_lines_are_skipped() {
    let prog = load_morse("\n   \n...---...\n.... .-.. -\r\n", false).unwrap();
    assert_eq!(prog.instructions, vec![Instruction::Hlt]);
    assert_eq!(prog.lines, vec![4]);
}

#[test]
fn arity_errors_carry_the_line() {
    let err = load_text("HLT\n\nMOV AX", false).unwrap_err();
    assert_eq!(
        err,
        LoadError {
            line: 3,
            kind: LoadErrorKind::Arity { mnemonic: "MOV", expected: 2, found: 1 },
        }
    );
    assert_eq!(err.to_string(), "line 3: MOV expects 2 operand(s), got 1");
}

#[test]
fn lenient_mode_tolerates_what_strict_mode_rejects() {
    let src = "a: NOP\na: HLT\nJMP b";
    let prog = load_text(src, false).unwrap();
    assert_eq!(prog.label("a"), Some(1));
    assert!(matches!(prog.instructions[0], Instruction::Unrecognized { .. }));

    let err = load_text(src, true).unwrap_err();
    assert_eq!(err.kind, LoadErrorKind::UnknownMnemonic("NOP".into()));

    let err = load_text("a: HLT\na: HLT", true).unwrap_err();
    assert_eq!(err, LoadError { line: 2, kind: LoadErrorKind::DuplicateLabel("a".into()) });

    let err = load_text("HLT\nJMP b", true).unwrap_err();
    assert_eq!(err, LoadError { line: 2, kind: LoadErrorKind::UndefinedLabel("b".into()) });
}

#[test]
fn text_after_first_colon_is_the_instruction() {
    let prog = load_text("x: y: HLT", false).unwrap();
    assert_eq!(prog.label("x"), Some(0));
    assert_eq!(prog.instructions, vec![Instruction::Unrecognized { mnemonic: "Y:".into() }]);
}

#[test]
fn morse_program_prints_a() {
    let morse = to_morse("MOV AX, 65\nOUT AX\nHLT");
    let (cpu, out, reason) = run_morse(&morse);
    assert_eq!(out, "A");
    assert_eq!(reason, HaltReason::Hlt);
    assert_eq!(cpu.read(Register::Ax), 65);
}

#[test]
fn morse_countdown_loop() {
    let morse = to_morse("MOV CX, 3\nloop: DEC CX\nOUT 42\nJNZ loop\nHLT");
    let (cpu, out, _) = run_morse(&morse);
    assert_eq!(out, "***");
    assert_eq!(cpu.read(Register::Cx), 0);
}

#[test]
fn morse_unknown_mnemonic_then_halt() {
    let morse = format!("{}\n{}", codec::encode("FOO AX"), codec::encode("HLT"));
    let (_, out, reason) = run_morse(&morse);
    assert_eq!(out, "");
    assert_eq!(reason, HaltReason::Hlt);
}

#[test]
fn hand_written_morse_loads() {
    // MOV AX , 72 / OUT AX
    let morse = "-- --- ...- / .- -..- / --..-- / --... ..---\n--- ..- - / .- -..-";
    let (_, out, reason) = run_morse(morse);
    assert_eq!(out, "H");
    assert_eq!(reason, HaltReason::EndOfProgram);
}

#[test]
fn assembled_source_loads_like_the_text() {
    let src = "START: MOV AX, 18446744073709551617\nLOOP: DEC AX\nJNZ LOOP\nOUT -1\nHLT";
    let morse = crate::morse::asm::assemble(src, true).expect("assemble").join("\n");
    let from_morse = load_morse(&morse, true).expect("load morse");
    let from_text = load_text(src, true).expect("load text");
    assert_eq!(from_morse.instructions, from_text.instructions);
    assert_eq!(from_morse.labels, from_text.labels);
    assert_eq!(from_morse.instructions[0].to_string(), "MOV AX, 4294967297");
}
