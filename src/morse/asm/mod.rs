//! Plain assembly text -> Morse wire format.
//!
//! Each source line becomes one encoded line. Words, commas and colons are
//! separate tokens joined by the codec's word separator, so
//! `loop: ADD AX, 1` encodes as `LOOP / : / ADD / AX / , / 1`.

pub mod errors;

#[cfg(test)]
mod tests;

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::morse::codec::{encode_char, encode_word, WORD_SEPARATOR};
use crate::morse::errors::MorseError;
use errors::AsmError;

/// Drop a `;` comment and surrounding whitespace.
pub(crate) fn strip_comment(line: &str) -> &str {
    line.split(';').next().unwrap_or(line).trim()
}

/// Encode one source line. Comments are removed; an empty result means the
/// line carries no code.
pub fn encode_line(line: &str) -> String {
    let code = strip_comment(line);
    let mut tokens = Vec::new();
    let mut word = String::new();

    let flush = |word: &mut String, tokens: &mut Vec<String>| {
        let encoded = encode_word(word.as_str());
        if !encoded.is_empty() {
            tokens.push(encoded);
        }
        word.clear();
    };

    for c in code.chars() {
        match c {
            ',' | ':' => {
                flush(&mut word, &mut tokens);
                tokens.extend(encode_char(c).map(str::to_string));
            }
            c if c.is_whitespace() => flush(&mut word, &mut tokens),
            c => word.push(c),
        }
    }
    flush(&mut word, &mut tokens);

    tokens.join(WORD_SEPARATOR)
}

/// Assemble a whole source text into encoded lines, skipping lines with no code.
///
/// With `strict`, a character the codec cannot represent is an error instead
/// of being dropped.
pub fn assemble(source: &str, strict: bool) -> Result<Vec<String>, AsmError> {
    let mut out = Vec::new();
    for (i, raw) in source.lines().enumerate() {
        let code = strip_comment(raw);
        if let Some(c) = code
            .chars()
            .find(|c| !c.is_whitespace() && encode_char(*c).is_none())
        {
            if strict {
                return Err(AsmError {
                    line: i,
                    msg: format!("character {c:?} has no Morse encoding"),
                });
            }
            warn!(line = i + 1, ch = ?c, "dropping character with no Morse encoding");
        }
        let encoded = encode_line(code);
        if !encoded.is_empty() {
            out.push(encoded);
        }
    }
    Ok(out)
}

/// Assemble `input` and write the encoded lines to `output`. Returns the
/// number of lines written.
pub fn assemble_file(input: &Path, output: &Path, strict: bool) -> Result<usize, MorseError> {
    let source = fs::read_to_string(input)?;
    let lines = assemble(&source, strict)?;
    fs::write(output, lines.join("\n"))?;
    info!(input = %input.display(), output = %output.display(), lines = lines.len(), "assembled");
    Ok(lines.len())
}
