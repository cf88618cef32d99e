//! Morse assembly interpreter.
//!
//! ```text
//! morseasm <file.morse> [--strict] [--max-steps N] [--memory-cells N] [--stack-base N]
//! morseasm --encode <text>...
//! morseasm --decode <morse>...
//! ```

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use morseasm::morse::errors::MorseError;
use morseasm::morse::program::load_morse;
use morseasm::morse::{codec, exec, Cpu, Memory, StdConsole, VmConfig};

#[derive(Parser, Debug)]
#[command(name = "morseasm", version, about = "Run assembly programs written in Morse code")]
struct Cli {
    /// Morse program to run.
    #[arg(required_unless_present_any = ["encode", "decode"])]
    file: Option<PathBuf>,

    /// Print the Morse encoding of TEXT and exit.
    #[arg(
        long,
        value_name = "TEXT",
        num_args = 1..,
        allow_hyphen_values = true,
        conflicts_with_all = ["file", "decode"]
    )]
    encode: Option<Vec<String>>,

    /// Print the decoding of MORSE and exit.
    #[arg(
        long,
        value_name = "MORSE",
        num_args = 1..,
        allow_hyphen_values = true,
        conflicts_with = "file"
    )]
    decode: Option<Vec<String>>,

    /// Reject unknown mnemonics, extra operands and bad labels at load time.
    #[arg(long)]
    strict: bool,

    /// Stop after N instructions.
    #[arg(long, value_name = "N")]
    max_steps: Option<u64>,

    /// Size of the LOAD/STORE memory region.
    #[arg(long, value_name = "N", default_value_t = morseasm::morse::config::DEFAULT_MEMORY_CELLS)]
    memory_cells: usize,

    /// Initial value of SP.
    #[arg(long, value_name = "N", default_value_t = morseasm::morse::config::DEFAULT_STACK_BASE)]
    stack_base: u32,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> VmConfig {
        VmConfig {
            memory_cells: self.memory_cells,
            stack_base: self.stack_base,
            strict: self.strict,
            max_steps: self.max_steps,
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run_file(path: &Path, config: &VmConfig) -> Result<(), MorseError> {
    let source = fs::read_to_string(path)?;
    let prog = load_morse(&source, config.strict)?;

    let mut cpu = Cpu::new(config.stack_base);
    let mut mem = Memory::new(config.memory_cells);
    let mut console = StdConsole;
    let summary = exec::run(&mut cpu, &mut mem, &prog, &mut console, config.max_steps)?;
    tracing::info!(steps = summary.steps, reason = ?summary.reason, "program finished");

    let mut stdout = io::stdout().lock();
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(words) = &cli.encode {
        println!("{}", codec::encode(&words.join(" ")));
        return;
    }
    if let Some(words) = &cli.decode {
        println!("{}", codec::decode(&words.join(" ")));
        return;
    }

    let Some(path) = cli.file.as_deref() else {
        return;
    };
    match run_file(path, &cli.config()) {
        Ok(()) => {}
        Err(MorseError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            println!("Error: File '{}' not found", path.display());
        }
        Err(e) => println!("Error: {e}"),
    }
}
