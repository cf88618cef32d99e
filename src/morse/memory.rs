use crate::morse::config::DEFAULT_MEMORY_CELLS;

/// Flat region of integer cells addressed by index.
///
/// Out-of-range accesses return `None` and leave memory untouched.
#[derive(Debug, Clone)]
pub struct Memory {
    cells: Vec<i64>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CELLS)
    }
}

impl Memory {
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![0; size],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn load(&self, addr: i64) -> Option<i64> {
        let idx = usize::try_from(addr).ok()?;
        self.cells.get(idx).copied()
    }

    pub fn store(&mut self, addr: i64, value: i64) -> Option<()> {
        let idx = usize::try_from(addr).ok()?;
        let cell = self.cells.get_mut(idx)?;
        *cell = value;
        Some(())
    }
}
