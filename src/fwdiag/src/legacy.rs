//! Structured fallback decoder for legacy firmware modules.
//!
//! A handful of firmware modules predate the descriptor file and emit
//! message ids that never appear in the database. Their payloads use a
//! fixed self-describing layout instead: an event code word, an
//! argument count word, then that many 32-bit argument words.

use crate::format::ByteCursor;

/// Message ids owned by legacy modules.
pub const MODULE_STA_PWRSAVE: u32 = 6;
pub const MODULE_WAL: u32 = 20;
pub const MODULE_NAN: u32 = 56;
pub const MODULE_IBSS_PWRSAVE: u32 = 57;

/// Payloads never carry more argument words than this.
const MAX_ARGS: u64 = 16;

/// True when `id` belongs to a module the legacy decoder understands.
pub fn is_legacy_module(id: u32) -> bool {
    matches!(
        id,
        MODULE_STA_PWRSAVE | MODULE_WAL | MODULE_NAN | MODULE_IBSS_PWRSAVE
    )
}

fn module_name(id: u32) -> &'static str {
    match id {
        MODULE_STA_PWRSAVE => "sta-pwrsave",
        MODULE_WAL => "wal",
        MODULE_NAN => "nan",
        MODULE_IBSS_PWRSAVE => "ibss-pwrsave",
        _ => "unknown",
    }
}

/// Decode a legacy module payload into a display line, or `None` when
/// the id is not a legacy module or the payload is truncated.
pub fn decode(id: u32, payload: &[u8]) -> Option<String> {
    if !is_legacy_module(id) {
        return None;
    }
    let mut cursor = ByteCursor::new(payload);
    let event = cursor.take_u32()?;
    let argc = cursor.take_u32()?.min(MAX_ARGS);

    let mut args = Vec::with_capacity(argc as usize);
    for _ in 0..argc {
        args.push(cursor.take_u32()?);
    }

    let rendered: Vec<String> = args.iter().map(|a| format!("0x{a:x}")).collect();
    Some(format!(
        "{}: event {} args [{}]",
        module_name(id),
        event,
        rendered.join(", ")
    ))
}
