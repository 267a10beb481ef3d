//! Step log styling
//!
//! Colors are always emitted; `anstream` strips them when stdout is not a
//! terminal or `NO_COLOR` is set.

use anstream::println;
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Section header, preceded by a blank line
pub fn info(msg: impl Display) {
    println!();
    println!("{}", msg.blue().bold());
}

/// Indented detail line
pub fn details(msg: impl Display) {
    println!("  {msg}");
}

/// Indented success line
pub fn done(msg: impl Display) {
    println!("  {}", msg.green().bold());
}

pub fn warn(msg: impl Display) {
    println!("{}", msg.yellow().bold());
}

/// Fatal error line; the caller decides the exit code
pub fn fail(msg: impl Display) {
    println!("{}", msg.red().bold());
}

/// Unstyled output (event dumps, title lists)
pub fn plain(msg: impl Display) {
    println!("{msg}");
}
