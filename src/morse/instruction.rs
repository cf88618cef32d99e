use std::fmt;

use crate::morse::errors::LoadErrorKind;
use crate::morse::registers::Register;

/// One instruction operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Register-direct.
    Reg(Register),
    /// Decimal literal.
    Imm(i64),
    /// Anything else. Reads as 0; cannot be written.
    Invalid(String),
}

impl Operand {
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if let Ok(r) = token.parse::<Register>() {
            return Operand::Reg(r);
        }
        match parse_int(token) {
            Some(v) => Operand::Imm(v),
            None => Operand::Invalid(token.to_string()),
        }
    }
}

/// Parse a signed decimal integer of any length.
///
/// Values outside `i64` are reduced to `±(n mod 2^32 + 2^32)`: same residue
/// mod 2^32, same sign, never zero. That is everything a 32-bit register and
/// the flags can observe.
pub fn parse_int(s: &str) -> Option<i64> {
    const MODULUS: u64 = 1 << 32;

    let s = s.trim();
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let residue = digits
        .bytes()
        .fold(0u64, |acc, b| (acc * 10 + u64::from(b - b'0')) % MODULUS);
    let v = (residue + MODULUS) as i64;
    Some(if negative { -v } else { v })
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(r) => write!(f, "{r}"),
            Operand::Imm(v) => write!(f, "{v}"),
            Operand::Invalid(s) => write!(f, "{s}"),
        }
    }
}

/// Jump destination. Labels are looked up once the whole program is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Resolved { label: String, index: usize },
    Unresolved(String),
}

impl Target {
    pub fn label(&self) -> &str {
        match self {
            Target::Resolved { label, .. } | Target::Unresolved(label) => label,
        }
    }
}

/// Condition checked by a conditional jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    /// `JE` / `JZ`
    Zero,
    /// `JNE` / `JNZ`
    NotZero,
    /// `JG`
    Greater,
    /// `JL`
    Less,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    // Data movement
    Mov { dest: Operand, src: Operand },
    Push { src: Operand },
    Pop { dest: Operand },

    // Arithmetic
    Add { dest: Operand, src: Operand },
    Sub { dest: Operand, src: Operand },
    Mul { src: Operand },
    Div { src: Operand },
    Inc { dest: Operand },
    Dec { dest: Operand },

    // Logic
    And { dest: Operand, src: Operand },
    Or { dest: Operand, src: Operand },
    Xor { dest: Operand, src: Operand },
    Not { dest: Operand },
    Cmp { a: Operand, b: Operand },

    // Control flow
    Jmp { target: Target },
    Jcc { cond: Cond, target: Target },
    Hlt,

    // I/O
    Out { src: Operand },
    In { dest: Operand },

    // Memory
    Load { dest: Operand, addr: Operand },
    Store { addr: Operand, src: Operand },

    /// Mnemonic outside the instruction set, kept in lenient mode. No effect.
    Unrecognized { mnemonic: String },
}

/// Instruction kind, before operands are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opcode {
    Mov,
    Push,
    Pop,
    Add,
    Sub,
    Mul,
    Div,
    Inc,
    Dec,
    And,
    Or,
    Xor,
    Not,
    Cmp,
    Jmp,
    Je,
    Jne,
    Jg,
    Jl,
    Out,
    In,
    Hlt,
    Load,
    Store,
}

/// Every recognized spelling. `JZ`/`JNZ` are aliases of `JE`/`JNE`.
const MNEMONICS: &[(&str, Opcode)] = &[
    ("MOV", Opcode::Mov),
    ("PUSH", Opcode::Push),
    ("POP", Opcode::Pop),
    ("ADD", Opcode::Add),
    ("SUB", Opcode::Sub),
    ("MUL", Opcode::Mul),
    ("DIV", Opcode::Div),
    ("INC", Opcode::Inc),
    ("DEC", Opcode::Dec),
    ("AND", Opcode::And),
    ("OR", Opcode::Or),
    ("XOR", Opcode::Xor),
    ("NOT", Opcode::Not),
    ("CMP", Opcode::Cmp),
    ("JMP", Opcode::Jmp),
    ("JE", Opcode::Je),
    ("JZ", Opcode::Je),
    ("JNE", Opcode::Jne),
    ("JNZ", Opcode::Jne),
    ("JG", Opcode::Jg),
    ("JL", Opcode::Jl),
    ("OUT", Opcode::Out),
    ("IN", Opcode::In),
    ("HLT", Opcode::Hlt),
    ("LOAD", Opcode::Load),
    ("STORE", Opcode::Store),
];

impl Opcode {
    fn lookup(upper: &str) -> Option<Self> {
        MNEMONICS.iter().find(|(m, _)| *m == upper).map(|&(_, op)| op)
    }

    fn name(self) -> &'static str {
        match self {
            Opcode::Mov => "MOV",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Inc => "INC",
            Opcode::Dec => "DEC",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Xor => "XOR",
            Opcode::Not => "NOT",
            Opcode::Cmp => "CMP",
            Opcode::Jmp => "JMP",
            Opcode::Je => "JE",
            Opcode::Jne => "JNE",
            Opcode::Jg => "JG",
            Opcode::Jl => "JL",
            Opcode::Out => "OUT",
            Opcode::In => "IN",
            Opcode::Hlt => "HLT",
            Opcode::Load => "LOAD",
            Opcode::Store => "STORE",
        }
    }

    fn arity(self) -> usize {
        use Opcode::*;
        match self {
            Hlt => 0,
            Push | Pop | Mul | Div | Inc | Dec | Not | Jmp | Je | Jne | Jg | Jl | Out | In => 1,
            Mov | Add | Sub | And | Or | Xor | Cmp | Load | Store => 2,
        }
    }
}

/// Build an instruction from its mnemonic and operand tokens.
///
/// Too few operands is always an error. Extra operands and unknown
/// mnemonics are errors only when `strict` is set.
pub fn parse_instr(
    mnemonic: &str,
    ops: &[&str],
    strict: bool,
) -> Result<Instruction, LoadErrorKind> {
    let upper = mnemonic.to_ascii_uppercase();
    let Some(opcode) = Opcode::lookup(&upper) else {
        if strict {
            return Err(LoadErrorKind::UnknownMnemonic(upper));
        }
        return Ok(Instruction::Unrecognized { mnemonic: upper });
    };

    let arity = opcode.arity();
    if ops.len() < arity {
        return Err(LoadErrorKind::Arity {
            mnemonic: opcode.name(),
            expected: arity,
            found: ops.len(),
        });
    }
    if strict && ops.len() > arity {
        return Err(LoadErrorKind::ExtraOperands {
            mnemonic: opcode.name(),
            expected: arity,
            found: ops.len(),
        });
    }

    use Instruction::*;
    let op = |i: usize| Operand::parse(ops[i]);
    let target = || Target::Unresolved(ops[0].to_string());

    Ok(match opcode {
        Opcode::Mov => Mov { dest: op(0), src: op(1) },
        Opcode::Push => Push { src: op(0) },
        Opcode::Pop => Pop { dest: op(0) },
        Opcode::Add => Add { dest: op(0), src: op(1) },
        Opcode::Sub => Sub { dest: op(0), src: op(1) },
        Opcode::Mul => Mul { src: op(0) },
        Opcode::Div => Div { src: op(0) },
        Opcode::Inc => Inc { dest: op(0) },
        Opcode::Dec => Dec { dest: op(0) },
        Opcode::And => And { dest: op(0), src: op(1) },
        Opcode::Or => Or { dest: op(0), src: op(1) },
        Opcode::Xor => Xor { dest: op(0), src: op(1) },
        Opcode::Not => Not { dest: op(0) },
        Opcode::Cmp => Cmp { a: op(0), b: op(1) },
        Opcode::Jmp => Jmp { target: target() },
        Opcode::Je => Jcc { cond: Cond::Zero, target: target() },
        Opcode::Jne => Jcc { cond: Cond::NotZero, target: target() },
        Opcode::Jg => Jcc { cond: Cond::Greater, target: target() },
        Opcode::Jl => Jcc { cond: Cond::Less, target: target() },
        Opcode::Out => Out { src: op(0) },
        Opcode::In => In { dest: op(0) },
        Opcode::Hlt => Hlt,
        Opcode::Load => Load { dest: op(0), addr: op(1) },
        Opcode::Store => Store { addr: op(0), src: op(1) },
    })
}

impl Instruction {
    pub fn mnemonic(&self) -> &str {
        use Instruction::*;
        match self {
            Mov { .. } => "MOV",
            Push { .. } => "PUSH",
            Pop { .. } => "POP",
            Add { .. } => "ADD",
            Sub { .. } => "SUB",
            Mul { .. } => "MUL",
            Div { .. } => "DIV",
            Inc { .. } => "INC",
            Dec { .. } => "DEC",
            And { .. } => "AND",
            Or { .. } => "OR",
            Xor { .. } => "XOR",
            Not { .. } => "NOT",
            Cmp { .. } => "CMP",
            Jmp { .. } => "JMP",
            Jcc { cond: Cond::Zero, .. } => "JE",
            Jcc { cond: Cond::NotZero, .. } => "JNE",
            Jcc { cond: Cond::Greater, .. } => "JG",
            Jcc { cond: Cond::Less, .. } => "JL",
            Hlt => "HLT",
            Out { .. } => "OUT",
            In { .. } => "IN",
            Load { .. } => "LOAD",
            Store { .. } => "STORE",
            Unrecognized { mnemonic } => mnemonic.as_str(),
        }
    }

    /// Jump target, for instructions that have one.
    pub fn target_mut(&mut self) -> Option<&mut Target> {
        match self {
            Instruction::Jmp { target } | Instruction::Jcc { target, .. } => Some(target),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        let m = self.mnemonic();
        match self {
            Mov { dest: a, src: b }
            | Add { dest: a, src: b }
            | Sub { dest: a, src: b }
            | And { dest: a, src: b }
            | Or { dest: a, src: b }
            | Xor { dest: a, src: b }
            | Cmp { a, b }
            | Load { dest: a, addr: b }
            | Store { addr: a, src: b } => write!(f, "{m} {a}, {b}"),
            Push { src: a }
            | Pop { dest: a }
            | Mul { src: a }
            | Div { src: a }
            | Inc { dest: a }
            | Dec { dest: a }
            | Not { dest: a }
            | Out { src: a }
            | In { dest: a } => write!(f, "{m} {a}"),
            Jmp { target } | Jcc { target, .. } => write!(f, "{m} {}", target.label()),
            Hlt | Unrecognized { .. } => f.write_str(m),
        }
    }
}
