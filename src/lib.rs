//! Morse assembly toolchain: a register machine whose source is written in Morse code.

pub mod morse;
