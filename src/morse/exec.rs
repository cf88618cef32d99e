//! Fetch-decode-execute loop.
//!
//! Arithmetic is done in `i128` on the operand values. Flags come from that
//! unmasked result; the register write then reduces it mod 2^32.

use tracing::{debug, trace};

use crate::morse::console::Console;
use crate::morse::errors::ExecError;
use crate::morse::instruction::{parse_int, Cond, Instruction, Operand, Target};
use crate::morse::memory::Memory;
use crate::morse::program::Program;
use crate::morse::registers::{Cpu, Register};

/// A documented recovery taken while executing one instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// Operand is neither a register nor a literal; read as 0.
    InvalidOperand(String),
    /// Destination is not a register; the result was discarded.
    NotARegister(String),
    /// `POP` on an empty stack.
    EmptyStack,
    /// `DIV` by zero; nothing changed.
    DivideByZero,
    /// Jump to a label that does not exist; no jump.
    UnknownLabel(String),
    /// `IN` read a line that is not an integer; stored 0.
    BadInput(String),
    /// `IN` hit end of input; stored 0.
    EndOfInput,
    /// `LOAD`/`STORE` outside the memory region; nothing changed.
    AddressOutOfRange(i64),
    /// Mnemonic outside the instruction set; skipped.
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Executed,
    Recovered(Vec<Fallback>),
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// `HLT` executed.
    Hlt,
    /// IP moved past the last instruction.
    EndOfProgram,
    /// The configured step limit was reached.
    StepLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: u64,
    pub reason: HaltReason,
    /// Steps that completed through at least one fallback.
    pub recovered: u64,
}

enum Flow {
    Next,
    Jump(usize),
}

fn value(cpu: &Cpu, op: &Operand, fb: &mut Vec<Fallback>) -> i64 {
    match op {
        Operand::Reg(r) => cpu.read(*r) as i64,
        Operand::Imm(v) => *v,
        Operand::Invalid(s) => {
            fb.push(Fallback::InvalidOperand(s.clone()));
            0
        }
    }
}

fn store(cpu: &mut Cpu, dest: &Operand, v: i128, fb: &mut Vec<Fallback>) {
    match dest {
        Operand::Reg(r) => cpu.write(*r, v),
        other => fb.push(Fallback::NotARegister(other.to_string())),
    }
}

fn jump(target: &Target, fb: &mut Vec<Fallback>) -> Flow {
    match target {
        Target::Resolved { index, .. } => Flow::Jump(*index),
        Target::Unresolved(label) => {
            fb.push(Fallback::UnknownLabel(label.clone()));
            Flow::Next
        }
    }
}

fn floor_div(a: i128, b: i128) -> i128 {
    let q = a / b;
    if a % b != 0 && (a < 0) != (b < 0) { q - 1 } else { q }
}

/// `dest := op(dest, src)` with flags.
fn binary(
    cpu: &mut Cpu,
    dest: &Operand,
    src: &Operand,
    fb: &mut Vec<Fallback>,
    f: fn(i128, i128) -> i128,
) {
    let s = value(cpu, src, fb) as i128;
    let d = value(cpu, dest, fb) as i128;
    let r = f(d, s);
    store(cpu, dest, r, fb);
    cpu.flags.update(r);
}

/// Execute the instruction at IP. Returns `Halted` without doing anything
/// once the CPU is halted or IP is past the end of the program.
pub fn step<C: Console>(
    cpu: &mut Cpu,
    mem: &mut Memory,
    prog: &Program,
    console: &mut C,
) -> Result<StepOutcome, ExecError> {
    if cpu.halted {
        return Ok(StepOutcome::Halted);
    }
    let ip = cpu.ip();
    let Some(instr) = prog.get(ip) else {
        return Ok(StepOutcome::Halted);
    };
    trace!(ip, %instr, "exec");

    let mut fb = Vec::new();
    let mut flow = Flow::Next;

    match instr {
        Instruction::Mov { dest, src } => {
            let v = value(cpu, src, &mut fb);
            store(cpu, dest, v as i128, &mut fb);
        }
        Instruction::Push { src } => {
            let v = value(cpu, src, &mut fb);
            cpu.push(v);
        }
        Instruction::Pop { dest } => match cpu.pop() {
            Some(v) => store(cpu, dest, v as i128, &mut fb),
            None => fb.push(Fallback::EmptyStack),
        },

        Instruction::Add { dest, src } => binary(cpu, dest, src, &mut fb, |d, s| d + s),
        Instruction::Sub { dest, src } => binary(cpu, dest, src, &mut fb, |d, s| d - s),
        Instruction::And { dest, src } => binary(cpu, dest, src, &mut fb, |d, s| d & s),
        Instruction::Or { dest, src } => binary(cpu, dest, src, &mut fb, |d, s| d | s),
        Instruction::Xor { dest, src } => binary(cpu, dest, src, &mut fb, |d, s| d ^ s),
        Instruction::Inc { dest } => binary(cpu, dest, &Operand::Imm(1), &mut fb, |d, s| d + s),
        Instruction::Dec { dest } => binary(cpu, dest, &Operand::Imm(1), &mut fb, |d, s| d - s),
        Instruction::Mul { src } => {
            let v = value(cpu, src, &mut fb) as i128;
            let r = cpu.read(Register::Ax) as i128 * v;
            cpu.write(Register::Ax, r);
            cpu.flags.update(r);
        }
        Instruction::Div { src } => {
            let v = value(cpu, src, &mut fb) as i128;
            if v == 0 {
                fb.push(Fallback::DivideByZero);
            } else {
                let r = floor_div(cpu.read(Register::Ax) as i128, v);
                cpu.write(Register::Ax, r);
                cpu.flags.update(r);
            }
        }
        Instruction::Not { dest } => {
            let r = !(value(cpu, dest, &mut fb) as i128) & 0xFFFF_FFFF;
            store(cpu, dest, r, &mut fb);
            cpu.flags.update(r);
        }
        Instruction::Cmp { a, b } => {
            let r = value(cpu, a, &mut fb) as i128 - value(cpu, b, &mut fb) as i128;
            cpu.flags.update(r);
        }

        Instruction::Jmp { target } => flow = jump(target, &mut fb),
        Instruction::Jcc { cond, target } => {
            let f = cpu.flags;
            let taken = match cond {
                Cond::Zero => f.zf,
                Cond::NotZero => !f.zf,
                Cond::Greater => !f.zf && !f.sf,
                Cond::Less => f.sf,
            };
            if taken {
                flow = jump(target, &mut fb);
            }
        }
        Instruction::Hlt => cpu.halted = true,

        Instruction::Out { src } => {
            let v = value(cpu, src, &mut fb);
            match u8::try_from(v) {
                Ok(b) if b <= 127 => console.write_str((b as char).encode_utf8(&mut [0; 4]))?,
                _ => console.write_str(&v.to_string())?,
            }
        }
        Instruction::In { dest } => {
            let v = match console.read_line()? {
                Some(line) => parse_int(&line).unwrap_or_else(|| {
                    fb.push(Fallback::BadInput(line.clone()));
                    0
                }),
                None => {
                    fb.push(Fallback::EndOfInput);
                    0
                }
            };
            store(cpu, dest, v as i128, &mut fb);
        }

        Instruction::Load { dest, addr } => {
            let a = value(cpu, addr, &mut fb);
            match mem.load(a) {
                Some(v) => store(cpu, dest, v as i128, &mut fb),
                None => fb.push(Fallback::AddressOutOfRange(a)),
            }
        }
        Instruction::Store { addr, src } => {
            let a = value(cpu, addr, &mut fb);
            let v = value(cpu, src, &mut fb);
            if mem.store(a, v).is_none() {
                fb.push(Fallback::AddressOutOfRange(a));
            }
        }

        Instruction::Unrecognized { mnemonic } => {
            fb.push(Fallback::Unrecognized(mnemonic.clone()));
        }
    }

    match flow {
        Flow::Jump(target) => cpu.set_ip(target),
        Flow::Next => cpu.advance_ip(),
    }

    if cpu.halted {
        debug!(ip, "halted");
        return Ok(StepOutcome::Halted);
    }
    if fb.is_empty() {
        Ok(StepOutcome::Executed)
    } else {
        debug!(ip, fallbacks = ?fb, "recovered");
        Ok(StepOutcome::Recovered(fb))
    }
}

/// Step until halted, IP leaves the program, or `max_steps` instructions ran.
pub fn run<C: Console>(
    cpu: &mut Cpu,
    mem: &mut Memory,
    prog: &Program,
    console: &mut C,
    max_steps: Option<u64>,
) -> Result<RunSummary, ExecError> {
    let mut steps = 0;
    let mut recovered = 0;
    let reason = loop {
        if cpu.halted {
            break HaltReason::Hlt;
        }
        if cpu.ip() >= prog.len() {
            break HaltReason::EndOfProgram;
        }
        if max_steps.is_some_and(|m| steps >= m) {
            break HaltReason::StepLimit;
        }
        if let StepOutcome::Recovered(_) = step(cpu, mem, prog, console)? {
            recovered += 1;
        }
        steps += 1;
    };
    debug!(steps, recovered, ?reason, "run finished");
    Ok(RunSummary { steps, reason, recovered })
}
