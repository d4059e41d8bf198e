//! Store trace parser.
//!
//! A trace is a recorded (or hand-written) sequence of stores, one per line:
//!
//! ```text
//! # paint a red pixel, then a white word
//! sb 0xFFFF0000 0x07
//! sw 0xFFFF0004 0xFFFFFFFF
//! ```
//!
//! Mnemonics are `sb`, `sh` and `sw`. Numbers are decimal or `0x` hex.
//! Everything after `#` is a comment; blank lines are skipped.

use crate::error::{DisplayError, Result};
use crate::handler::WriteWidth;

/// One store from a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Store {
    pub address: u32,
    pub value: u32,
    pub width: WriteWidth,
}

/// Parse a whole trace.
pub fn parse_trace(text: &str) -> Result<Vec<Store>> {
    let mut stores = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        stores.push(parse_line(line).map_err(|message| DisplayError::Trace { line: i + 1, message })?);
    }
    Ok(stores)
}

fn parse_line(line: &str) -> std::result::Result<Store, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(format!("expected `<op> <address> <value>`, got {} fields", fields.len()));
    }
    let width = match fields[0].to_ascii_lowercase().as_str() {
        "sb" => WriteWidth::Byte,
        "sh" => WriteWidth::Half,
        "sw" => WriteWidth::Word,
        op => return Err(format!("unknown store `{}`", op)),
    };
    Ok(Store {
        address: parse_number(fields[1])?,
        value: parse_number(fields[2])?,
        width,
    })
}

fn parse_number(s: &str) -> std::result::Result<u32, String> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|_| ())
    } else if let Some(neg) = s.strip_prefix('-') {
        // Magnitude up to 2^31, so the result fits an i32
        neg.parse::<u32>()
            .ok()
            .filter(|&v| v <= 1 << 31)
            .map(|v| (v as i32).wrapping_neg() as u32)
            .ok_or(())
    } else {
        s.parse::<u32>().map_err(|_| ())
    };
    parsed.map_err(|_| format!("invalid number `{}`", s))
}
