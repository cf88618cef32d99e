//! Output sink and input source used by `OUT` and `IN`.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

pub trait Console {
    /// Write text with no separator appended.
    fn write_str(&mut self, s: &str) -> io::Result<()>;

    /// Next input line without its line terminator. `Ok(None)` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Process stdin/stdout. Output is flushed before every read so prompts
/// show up before `IN` blocks.
#[derive(Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        io::stdout().lock().write_all(s.as_bytes())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

/// In-memory console: queued input lines, captured output.
#[derive(Default, Debug)]
pub struct BufferConsole {
    input: VecDeque<String>,
    pub output: String,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output: String::new(),
        }
    }

    pub fn push_input<S: Into<String>>(&mut self, line: S) {
        self.input.push_back(line.into());
    }
}

impl Console for BufferConsole {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.output.push_str(s);
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.input.pop_front())
    }
}
