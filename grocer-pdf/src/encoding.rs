//! WinAnsi encoding utilities for the standard Type1 fonts
//!
//! The built-in fonts are declared with `/WinAnsiEncoding`, which is
//! Windows-1252 for all practical purposes.

/// Replacement byte for characters WinAnsi cannot represent
const REPLACEMENT: u8 = b'?';

/// Encode a single character, `None` if WinAnsi has no code for it
fn encode_char(c: char) -> Option<u8> {
    if c.is_ascii() {
        return Some(c as u8);
    }
    let mut buf = [0u8; 4];
    let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut buf));
    match (had_errors, bytes.as_ref()) {
        (false, [b]) => Some(*b),
        _ => None,
    }
}

/// Convert UTF-8 text to WinAnsi bytes
///
/// Characters outside Windows-1252 are replaced with `?` one by one,
/// so a single exotic character never garbles the rest of the line.
/// Line breaks and tabs become spaces; a text operator draws one line.
pub fn encode_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '\r' | '\n' | '\t' => b' ',
            c => encode_char(c).unwrap_or(REPLACEMENT),
        })
        .collect()
}

/// Whether every character of `s` prints as itself
pub fn is_win_ansi(s: &str) -> bool {
    s.chars().all(|c| encode_char(c).is_some())
}

/// Keep at most `max_chars` characters, marking the cut with `...`
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut result: String = s.chars().take(keep).collect();
    result.push_str("...");
    result
}
