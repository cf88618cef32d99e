use std::io;

use thiserror::Error;

/// Reasons a program fails to load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// Known mnemonic given fewer operands than it reads.
    #[error("{mnemonic} expects {expected} operand(s), got {found}")]
    Arity {
        mnemonic: &'static str,
        expected: usize,
        found: usize,
    },

    /// Known mnemonic given more operands than it reads (strict mode only).
    #[error("{mnemonic} expects {expected} operand(s), got {found}")]
    ExtraOperands {
        mnemonic: &'static str,
        expected: usize,
        found: usize,
    },

    /// Mnemonic not in the instruction set (strict mode only).
    #[error("unknown mnemonic: {0}")]
    UnknownMnemonic(String),

    /// Label defined more than once (strict mode only).
    #[error("duplicate label: {0}")]
    DuplicateLabel(String),

    /// Jump to a label that is never defined (strict mode only).
    #[error("undefined label: {0}")]
    UndefinedLabel(String),
}

/// Load failure tied to its source line (1-based).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct LoadError {
    pub line: usize,
    pub kind: LoadErrorKind,
}

/// Fatal conditions while running a loaded program.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The output sink or input source failed.
    #[error("console error: {0}")]
    Console(#[from] io::Error),
}

/// Top-level error for the command-line tools.
#[derive(Error, Debug)]
pub enum MorseError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error(transparent)]
    Asm(#[from] crate::morse::asm::errors::AsmError),

    #[error("{0}")]
    Io(#[from] io::Error),
}
