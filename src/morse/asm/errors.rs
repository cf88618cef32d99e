use std::fmt;

/// Assembly failure. `line` is 0-based; it is shown 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsmError {
    pub line: usize,
    pub msg: String,
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line + 1, self.msg)
    }
}

impl std::error::Error for AsmError {}
