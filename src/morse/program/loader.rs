//! Turns source lines into a [`Program`].
//!
//! Loading is two passes: the first decodes every line, records labels and
//! builds instructions; the second resolves jump targets against the
//! complete label table, so forward references work.

use std::collections::hash_map::Entry;

use tracing::{debug, warn};

use crate::morse::codec;
use crate::morse::errors::{LoadError, LoadErrorKind};
use crate::morse::instruction::{parse_instr, Instruction, Target};
use crate::morse::program::Program;

/// Load a program whose lines are Morse-encoded.
pub fn load_morse(source: &str, strict: bool) -> Result<Program, LoadError> {
    let lines = source.lines().map(|l| codec::decode(l.trim()));
    load_lines(lines, strict)
}

/// Load a program from already-decoded assembly text.
pub fn load_text(source: &str, strict: bool) -> Result<Program, LoadError> {
    let lines = source.lines().map(|l| l.trim().to_string());
    load_lines(lines, strict)
}

fn load_lines<I>(lines: I, strict: bool) -> Result<Program, LoadError>
where
    I: Iterator<Item = String>,
{
    let mut prog = Program::default();

    for (i, text) in lines.enumerate() {
        let line = i + 1;
        let err = |kind| LoadError { line, kind };

        let mut body = text.trim();
        if body.is_empty() {
            continue;
        }

        if let Some((label, rest)) = body.split_once(':') {
            let label = label.trim().to_string();
            let index = prog.instructions.len();
            match prog.labels.entry(label) {
                Entry::Occupied(e) if strict => {
                    return Err(err(LoadErrorKind::DuplicateLabel(e.key().clone())));
                }
                Entry::Occupied(mut e) => {
                    warn!(line, label = %e.key(), "label redefined");
                    e.insert(index);
                }
                Entry::Vacant(e) => {
                    e.insert(index);
                }
            }
            body = rest.trim();
            if body.is_empty() {
                continue;
            }
        }

        let cleaned = body.replace(',', " ");
        let tokens: Vec<&str> = cleaned.split_whitespace().collect();
        let Some((mnemonic, ops)) = tokens.split_first() else {
            continue;
        };

        let instr = parse_instr(mnemonic, ops, strict).map_err(err)?;
        if let Instruction::Unrecognized { mnemonic } = &instr {
            warn!(line, %mnemonic, "unrecognized mnemonic, will be skipped");
        }
        prog.instructions.push(instr);
        prog.lines.push(line);
    }

    resolve_targets(&mut prog, strict)?;

    debug!(
        instructions = prog.instructions.len(),
        labels = prog.labels.len(),
        "program loaded"
    );
    Ok(prog)
}

fn resolve_targets(prog: &mut Program, strict: bool) -> Result<(), LoadError> {
    for (instr, &line) in prog.instructions.iter_mut().zip(&prog.lines) {
        let Some(target) = instr.target_mut() else {
            continue;
        };
        let label = target.label().to_string();
        match prog.labels.get(&label) {
            Some(&index) => *target = Target::Resolved { label, index },
            None if strict => {
                return Err(LoadError {
                    line,
                    kind: LoadErrorKind::UndefinedLabel(label),
                });
            }
            None => warn!(line, %label, "jump to undefined label"),
        }
    }
    Ok(())
}
