//! Byte-size formatting and parsing.

use crate::error::{Error, Result};

pub const K: usize = 1024;
pub const M: usize = K * K;
pub const G: usize = M * K;

/// Unit letter for a byte count: the largest unit of which `s` is at least
/// a hundredfold.
pub fn proper_unit_for_byte_size(s: usize) -> &'static str {
    if s >= 100 * G {
        "G"
    } else if s >= 100 * M {
        "M"
    } else if s >= 100 * K {
        "K"
    } else {
        "B"
    }
}

pub fn byte_size_in_proper_unit(s: usize) -> usize {
    if s >= 100 * G {
        s / G
    } else if s >= 100 * M {
        s / M
    } else if s >= 100 * K {
        s / K
    } else {
        s
    }
}

/// `150000` -> `"146K"`, `5000` -> `"5000B"`.
pub fn format_proper(s: usize) -> String {
    format!("{}{}", byte_size_in_proper_unit(s), proper_unit_for_byte_size(s))
}

/// Parse `"4096"`, `"16k"`, `"2M"`, `"1g"` (binary units, optional trailing `b`).
pub fn parse_memory_size(input: &str) -> Result<usize> {
    let s = input.trim();
    let lower = s.to_ascii_lowercase();
    let body = lower.strip_suffix('b').unwrap_or(&lower);
    let (digits, scale) = match body.chars().last() {
        Some('k') => (&body[..body.len() - 1], K),
        Some('m') => (&body[..body.len() - 1], M),
        Some('g') => (&body[..body.len() - 1], G),
        _ => (body, 1),
    };
    let value: usize = digits
        .trim()
        .parse()
        .map_err(|_| Error::InvalidSize(s.to_string()))?;
    value
        .checked_mul(scale)
        .ok_or_else(|| Error::InvalidSize(s.to_string()))
}
