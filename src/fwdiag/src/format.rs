//! Binary-to-text rendering of packed firmware arguments.
//!
//! [`render`] is a small printf-style interpreter: it walks a format
//! template and a pack string in lock-step, pulling one little-endian
//! field out of the argument bytes per conversion and emitting text
//! through a bounded single-character writer. The pack string (one
//! character per argument, see [`crate::pack`]) is the only source of
//! field widths; the format's `l`/`ll` qualifiers merely widen masks.
//!
//! Firmware controls both the payload bytes and (indirectly) the
//! length, so every field read is bounds-checked. A field that does
//! not fit aborts the whole render call: once one field is misaligned,
//! every following field is too.

use crate::pack::field_width;

/// Scratch size for digit accumulation; 64 binary digits is the widest
/// rendering a `q` field can produce.
const NUM_SCRATCH: usize = 64;

/// Hard-coded `%p` width: firmware pointers are 32-bit on the wire.
const POINTER_HEX_DIGITS: u32 = 8;

/// Bounded single-character writer.
///
/// Replaces the callback-style `putc` of the firmware tooling this was
/// derived from: characters past `capacity` are silently dropped, so
/// the caller inspects the produced text rather than assuming
/// full-length output.
pub struct LineWriter {
    buf: String,
    written: usize,
    capacity: usize,
}

impl LineWriter {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: String::new(),
            written: 0,
            capacity,
        }
    }

    /// Append one character. Returns false once the writer is
    /// saturated.
    pub fn write(&mut self, c: char) -> bool {
        if self.written < self.capacity {
            self.buf.push(c);
            self.written += 1;
            true
        } else {
            false
        }
    }

    fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            self.write(c);
        }
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

/// Checked little-endian field reader over the argument bytes.
///
/// Each `take_*` returns `None` on underflow instead of reading past
/// the payload; the formatter turns that into a whole-call abort.
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }

    fn take(&mut self, width: usize) -> Option<&'a [u8]> {
        if self.bytes.len() < width {
            return None;
        }
        let (field, rest) = self.bytes.split_at(width);
        self.bytes = rest;
        Some(field)
    }

    pub fn take_u8(&mut self) -> Option<u64> {
        self.take(1).map(|b| b[0] as u64)
    }

    pub fn take_u16(&mut self) -> Option<u64> {
        self.take(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]) as u64)
    }

    pub fn take_u32(&mut self) -> Option<u64> {
        self.take(4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as u64)
    }

    pub fn take_u64(&mut self) -> Option<u64> {
        self.take(8).map(|b| {
            u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
        })
    }

    /// Pull one field at the width the pack character declares.
    fn take_field(&mut self, spec: char) -> Option<u64> {
        match field_width(spec)? {
            1 => self.take_u8(),
            2 => self.take_u16(),
            4 => self.take_u32(),
            _ => self.take_u64(),
        }
    }
}

/// Parsed `%`-conversion prefix: flags, width, qualifiers.
#[derive(Default)]
struct Conversion {
    left_justify: bool,
    zero_fill: bool,
    width: u32,
    is_long: bool,
    is_long_long: bool,
}

/// Render `format` against `pack`-described argument bytes into a
/// string bounded by `capacity` characters.
///
/// Recognized conversions: `d D u U x X b B c C s S p %`. Numeric and
/// character conversions consume one field from `args` at the width
/// named by the next pack character. An unknown pack character or a
/// truncated field ends the call immediately, returning the text
/// produced so far.
pub fn render(format: &str, pack: &str, args: &[u8], capacity: usize) -> String {
    let mut out = LineWriter::new(capacity);
    let mut packs = pack.chars();
    let mut cursor = ByteCursor::new(args);
    let mut fmt = format.chars();

    while let Some(c) = fmt.next() {
        if c != '%' {
            out.write(c);
            continue;
        }
        let Some(mut c) = fmt.next() else {
            break;
        };

        let mut conv = Conversion::default();
        if c == '-' {
            conv.left_justify = true;
            match fmt.next() {
                Some(n) => c = n,
                None => break,
            }
        }
        if c == '0' {
            conv.zero_fill = true;
            match fmt.next() {
                Some(n) => c = n,
                None => break,
            }
        }
        while c.is_ascii_digit() {
            conv.width = conv.width.saturating_mul(10).saturating_add((c as u8 - b'0') as u32);
            match fmt.next() {
                Some(n) => c = n,
                None => return out.into_string(),
            }
        }
        if c == '.' {
            // Right-precision is parsed for compatibility but carries
            // no effect beyond forcing zero fill, as in the firmware's
            // own printf.
            conv.zero_fill = true;
            loop {
                match fmt.next() {
                    Some(n) if n.is_ascii_digit() => {}
                    Some(n) => {
                        c = n;
                        break;
                    }
                    None => return out.into_string(),
                }
            }
        }
        if c == 'l' {
            conv.is_long = true;
            match fmt.next() {
                Some('l') => {
                    conv.is_long_long = true;
                    match fmt.next() {
                        Some(n) => c = n,
                        None => break,
                    }
                }
                Some(n) => c = n,
                None => break,
            }
        }

        if !emit_conversion(c, &conv, &mut packs, &mut cursor, &mut out) {
            // Short-circuit: a misaligned or truncated field poisons
            // every field after it.
            return out.into_string();
        }
    }

    out.into_string()
}

/// Emit one conversion. Returns false to abort the render call.
fn emit_conversion(
    conv_char: char,
    conv: &Conversion,
    packs: &mut std::str::Chars<'_>,
    cursor: &mut ByteCursor<'_>,
    out: &mut LineWriter,
) -> bool {
    match conv_char {
        'd' | 'D' => {
            let Some(spec) = packs.next() else { return false };
            let Some(raw) = cursor.take_field(spec) else {
                return false;
            };
            let width_bytes = field_width(spec).unwrap_or(8);
            let signed = sign_extend(raw, width_bytes);
            let (sign, magnitude) = if signed < 0 {
                (Some('-'), signed.unsigned_abs())
            } else {
                (None, signed as u64)
            };
            let digits = to_digits(magnitude, 10, false);
            pad_and_emit(out, &digits, sign, conv);
            true
        }
        'u' | 'U' | 'x' | 'X' => {
            let Some(spec) = packs.next() else { return false };
            let Some(raw) = cursor.take_field(spec) else {
                return false;
            };
            let val = mask_value(raw, field_width(spec).unwrap_or(8), conv);
            let digits = match conv_char {
                'u' | 'U' => to_digits(val, 10, false),
                'x' => to_digits(val, 16, false),
                _ => to_digits(val, 16, true),
            };
            pad_and_emit(out, &digits, None, conv);
            true
        }
        'p' => {
            let Some(spec) = packs.next() else { return false };
            let Some(raw) = cursor.take_field(spec) else {
                return false;
            };
            out.write('0');
            out.write('x');
            let pointer_conv = Conversion {
                zero_fill: true,
                width: POINTER_HEX_DIGITS,
                ..Conversion::default()
            };
            let digits = to_digits(raw, 16, false);
            pad_and_emit(out, &digits, None, &pointer_conv);
            true
        }
        'b' | 'B' => {
            let Some(spec) = packs.next() else { return false };
            let Some(raw) = cursor.take_field(spec) else {
                return false;
            };
            let bits = if conv.width > 0 {
                conv.width as usize
            } else {
                field_width(spec).unwrap_or(4) * 8
            };
            // LSB first, '1' for a set bit, '.' for clear.
            let mut pattern = String::with_capacity(bits);
            for i in 0..bits.min(64) {
                pattern.push(if raw & (1 << i) != 0 { '1' } else { '.' });
            }
            out.write_str(&pattern);
            true
        }
        'c' | 'C' => {
            let Some(spec) = packs.next() else { return false };
            let Some(raw) = cursor.take_field(spec) else {
                return false;
            };
            out.write((raw as u8) as char);
            true
        }
        's' | 'S' => {
            // No string data ever travels over the wire; the
            // placeholder is the defined rendering, and no pack or
            // argument bytes are consumed.
            let placeholder = "<null>";
            let text: Vec<char> = placeholder.chars().collect();
            pad_and_emit(out, &text, None, conv);
            true
        }
        '%' => {
            out.write('%');
            true
        }
        other => {
            out.write('%');
            out.write(other);
            true
        }
    }
}

/// Interpret `raw` as a signed value of `width_bytes` bytes.
fn sign_extend(raw: u64, width_bytes: usize) -> i64 {
    match width_bytes {
        1 => raw as u8 as i8 as i64,
        2 => raw as u16 as i16 as i64,
        4 => raw as u32 as i32 as i64,
        _ => raw as i64,
    }
}

/// Mask an unsigned value to its field width, widened by `l`/`ll`.
fn mask_value(raw: u64, width_bytes: usize, conv: &Conversion) -> u64 {
    let bytes = if conv.is_long_long {
        8
    } else if conv.is_long {
        width_bytes.max(4)
    } else {
        width_bytes
    };
    if bytes >= 8 {
        raw
    } else {
        raw & ((1u64 << (bytes * 8)) - 1)
    }
}

/// Base-N digit accumulation, most-significant first.
fn to_digits(mut val: u64, radix: u64, upper: bool) -> Vec<char> {
    let table: &[u8] = if upper {
        b"0123456789ABCDEF"
    } else {
        b"0123456789abcdef"
    };
    let mut scratch = [0u8; NUM_SCRATCH];
    let mut n = 0;
    if val == 0 {
        scratch[0] = b'0';
        n = 1;
    } else {
        while val > 0 {
            scratch[n] = table[(val % radix) as usize];
            val /= radix;
            n += 1;
        }
    }
    scratch[..n].iter().rev().map(|&b| b as char).collect()
}

/// Apply width/fill/justify policy around a digit sequence.
///
/// Zero fill packs a generated sign against the padding (`-007`);
/// space fill pads first, then sign, then digits (`  -7`). Left
/// justify emits the value first and pads with spaces on the right.
fn pad_and_emit(out: &mut LineWriter, text: &[char], sign: Option<char>, conv: &Conversion) {
    let mut pad = (conv.width as usize).saturating_sub(text.len());
    if sign.is_some() {
        pad = pad.saturating_sub(1);
    }

    let fill = if conv.zero_fill && !conv.left_justify {
        '0'
    } else {
        ' '
    };

    // Padding stops as soon as the writer saturates, so a huge
    // (saturated) width cannot spin.
    if conv.zero_fill && !conv.left_justify {
        if let Some(s) = sign {
            out.write(s);
        }
        for _ in 0..pad {
            if !out.write(fill) {
                break;
            }
        }
    } else if !conv.left_justify {
        for _ in 0..pad {
            if !out.write(fill) {
                break;
            }
        }
        if let Some(s) = sign {
            out.write(s);
        }
    } else if let Some(s) = sign {
        out.write(s);
    }

    for &c in text {
        out.write(c);
    }

    if conv.left_justify {
        for _ in 0..pad {
            if !out.write(' ') {
                break;
            }
        }
    }
}
