//! Assembly to Morse converter.
//!
//! ```text
//! assembler <input.asm> <output.morse> [--strict]
//! ```

use std::io::{self, ErrorKind};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use morseasm::morse::asm::assemble_file;
use morseasm::morse::errors::MorseError;

#[derive(Parser, Debug)]
#[command(name = "assembler", version, about = "Convert assembly source to Morse assembly")]
struct Cli {
    /// Plain assembly source.
    input: PathBuf,

    /// Where to write the Morse program.
    output: PathBuf,

    /// Fail on characters that have no Morse encoding instead of dropping them.
    #[arg(long)]
    strict: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match assemble_file(&cli.input, &cli.output, cli.strict) {
        Ok(_) => println!(
            "Successfully assembled {} -> {}",
            cli.input.display(),
            cli.output.display()
        ),
        Err(MorseError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            println!("Error: File '{}' not found", cli.input.display());
        }
        Err(e) => println!("Error: {e}"),
    }
}
