pub mod loader;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use crate::morse::instruction::Instruction;

pub use loader::{load_morse, load_text};

/// A loaded program: the instruction sequence and its label table.
#[derive(Debug, Default, Clone)]
pub struct Program {
    pub instructions: Vec<Instruction>,
    pub labels: HashMap<String, usize>,
    /// 1-based source line of each instruction.
    pub lines: Vec<usize>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }
}
