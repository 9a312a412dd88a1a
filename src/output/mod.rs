//! Terminal output styling for the tfexec binary
//!
//! Status lines go to stderr with the usual pastel palette. Result data
//! (versions, addresses, workspace names) goes to stdout unstyled so it can
//! be piped into other tools.

use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Print a success message with a green checkmark
pub fn success(message: &str) {
    // Pastel mint green: RGB(152, 225, 152)
    eprintln!(
        "{} {}",
        "✓".truecolor(152, 225, 152).bold(),
        message.bright_white()
    );
}

/// Print an error message with a red X
pub fn error(message: &str) {
    // Pastel coral/salmon: RGB(255, 160, 160)
    eprintln!(
        "{} {}",
        "✗".truecolor(255, 160, 160).bold(),
        message.bright_white()
    );
}

pub fn warning(message: &str) {
    // Pastel cream/yellow: RGB(255, 230, 160)
    eprintln!(
        "{} {}",
        "⚠".truecolor(255, 230, 160).bold(),
        message.bright_white()
    );
}

/// Print a key-value pair, e.g. the file a blob was written to
pub fn key_value(key: &str, value: &str) {
    // Brighter grey: RGB(160, 160, 160)
    eprintln!(
        "  {} {}",
        format!("{}:", key).truecolor(160, 160, 160),
        value.truecolor(120, 180, 195)
    );
}

/// Plain result line on stdout
pub fn data(line: &str) {
    println!("{}", line);
}

/// Raw bytes on stdout, exactly as given
pub fn raw(bytes: &[u8]) -> io::Result<()> {
    write_raw(&mut io::stdout().lock(), bytes)
}

fn write_raw(writer: &mut impl Write, bytes: &[u8]) -> io::Result<()> {
    writer.write_all(bytes)?;
    writer.flush()
}
