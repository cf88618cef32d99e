pub mod codec;
pub mod config;
pub mod console;
pub mod errors;
pub mod exec;
pub mod instruction;
pub mod memory;
pub mod registers;

pub mod asm;
pub mod program;

pub use config::VmConfig;
pub use console::{BufferConsole, Console, StdConsole};
pub use instruction::Instruction;
pub use memory::Memory;
pub use program::Program;
pub use registers::{Cpu, Register};
