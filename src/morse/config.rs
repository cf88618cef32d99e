/// Memory cells when nothing else is configured.
pub const DEFAULT_MEMORY_CELLS: usize = 1024;
/// Initial value of `SP`.
pub const DEFAULT_STACK_BASE: u32 = 1000;

/// Knobs for loading and running a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmConfig {
    /// Size of the flat memory region reachable by `LOAD`/`STORE`.
    pub memory_cells: usize,
    /// Initial `SP`.
    pub stack_base: u32,
    /// Reject unknown mnemonics, extra operands, duplicate and undefined
    /// labels at load time instead of tolerating them.
    pub strict: bool,
    /// Stop after this many executed instructions. `None` runs until halt.
    pub max_steps: Option<u64>,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            memory_cells: DEFAULT_MEMORY_CELLS,
            stack_base: DEFAULT_STACK_BASE,
            strict: false,
            max_steps: None,
        }
    }
}
