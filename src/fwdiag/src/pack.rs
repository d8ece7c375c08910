//! Pack-specifier expansion.
//!
//! Descriptor files store argument specifiers in a run-length notation
//! (`"3b2h"` means five arguments: three 1-byte fields then two 2-byte
//! fields). The formatter wants one character per argument, so the
//! notation is expanded once at database build time.

/// Byte width of one packed argument field for a specifier character.
///
/// `b` = 1 byte, `h` = 2 bytes, `i`/`I` = 4 bytes, `q` = 8 bytes, all
/// little-endian on the wire. Returns `None` for anything else.
pub fn field_width(spec: char) -> Option<usize> {
    match spec {
        'b' => Some(1),
        'h' => Some(2),
        'i' | 'I' => Some(4),
        'q' => Some(8),
        _ => None,
    }
}

/// Expand a run-length-encoded pack specifier into one character per
/// argument field, bounded by `capacity`.
///
/// A run of decimal digits immediately followed by a character repeats
/// that character; a bare character is copied once. Truncates silently
/// once `capacity` characters have been produced. A digit run at the
/// end of the input repeats nothing and expands to nothing.
pub fn expand(raw_pack: &str, capacity: usize) -> String {
    let mut out = String::new();
    let mut chars = raw_pack.chars().peekable();

    while let Some(c) = chars.next() {
        if out.len() >= capacity {
            break;
        }
        if c.is_ascii_digit() {
            let mut count = (c as u8 - b'0') as usize;
            while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                count = count.saturating_mul(10).saturating_add((d as u8 - b'0') as usize);
                chars.next();
            }
            let Some(spec) = chars.next() else {
                break;
            };
            for _ in 0..count {
                if out.len() >= capacity {
                    break;
                }
                out.push(spec);
            }
        } else {
            out.push(c);
        }
    }

    out
}
