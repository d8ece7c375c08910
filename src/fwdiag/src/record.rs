//! Record framing for the raw firmware buffer.
//!
//! Records carry no delimiters or count: each one declares its own
//! payload length inside a two-word header, and the dispatcher infers
//! the record boundaries by summing `payload_len + HEADER_SIZE` until
//! the buffer is exhausted. The first 32-bit word of every buffer is a
//! dropped-record counter and is skipped before parsing.
//!
//! Header bit layout (two little-endian 32-bit words):
//!
//! ```text
//! word 1: [31..28 reserved][27..24 diag type][23..0 timestamp]
//! word 2 (event/log): [31..16 id][15..0 payload len]
//! word 2 (message):   [31..16 id][15..11 vdev id][10..8 vdev level][7..0 payload len]
//! ```

/// Bytes per record header (two 32-bit words).
pub const HEADER_SIZE: usize = 8;

/// Bytes occupied by the leading dropped-record counter.
pub const DROPPED_COUNTER_SIZE: usize = 4;

// word 1 fields
const TYPE_MASK: u32 = 0x0F00_0000;
const TYPE_OFFSET: u32 = 24;
const TIMESTAMP_MASK: u32 = 0x00FF_FFFF;

// word 2 fields
const ID_MASK: u32 = 0xFFFF_0000;
const ID_OFFSET: u32 = 16;
const VDEVID_MASK: u32 = 0x0000_F800;
const VDEVID_OFFSET: u32 = 11;
const VDEVLEVEL_MASK: u32 = 0x0000_0700;
const VDEVLEVEL_OFFSET: u32 = 8;
const PAYLEN_MASK: u32 = 0x0000_00FF;
const PAYLEN16_MASK: u32 = 0x0000_FFFF;

/// Records tagged with a vdev id at or above this value carry no
/// meaningful vdev and are rendered without the `vap-N` label.
pub const MAX_VDEV_ID: u16 = 16;

/// Record kind carried in header word 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagType {
    Event,
    Log,
    Msg,
}

impl DiagType {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(DiagType::Event),
            1 => Some(DiagType::Log),
            2 => Some(DiagType::Msg),
            _ => None,
        }
    }
}

/// Message severity derived from the vdev level bits, used to route
/// lines onto the diagnostic bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Verbose,
    Info,
    Warn,
    Err,
    Fatal,
}

impl Severity {
    /// Map a raw vdev level (0..=6) to a bus severity; out-of-range
    /// levels report as fatal, matching the firmware tooling's
    /// catch-all.
    pub fn from_vdev_level(level: u16) -> Self {
        match level {
            0 => Severity::Verbose,
            1..=3 => Severity::Info,
            4 => Severity::Warn,
            5 => Severity::Err,
            _ => Severity::Fatal,
        }
    }
}

/// Decoded per-record header. Borrow-free view of the two header
/// words; the payload window is sliced separately by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub diag_type: DiagType,
    pub timestamp: u32,
    pub id: u32,
    pub payload_len: usize,
    pub vdev_id: u16,
    pub vdev_level: u16,
}

impl RecordHeader {
    /// Decode the two header words. The payload length field is 16
    /// bits for event/log records and 8 bits for message records,
    /// which also carry vdev id/level sub-fields. `Err` carries the
    /// unrecognized raw type tag.
    pub fn parse(word1: u32, word2: u32) -> Result<Self, u32> {
        let raw_type = (word1 & TYPE_MASK) >> TYPE_OFFSET;
        let diag_type = DiagType::from_raw(raw_type).ok_or(raw_type)?;
        let timestamp = word1 & TIMESTAMP_MASK;
        let id = (word2 & ID_MASK) >> ID_OFFSET;

        let header = match diag_type {
            DiagType::Event | DiagType::Log => Self {
                diag_type,
                timestamp,
                id,
                payload_len: (word2 & PAYLEN16_MASK) as usize,
                vdev_id: 0,
                vdev_level: 0,
            },
            DiagType::Msg => Self {
                diag_type,
                timestamp,
                id,
                payload_len: (word2 & PAYLEN_MASK) as usize,
                vdev_id: ((word2 & VDEVID_MASK) >> VDEVID_OFFSET) as u16,
                vdev_level: ((word2 & VDEVLEVEL_MASK) >> VDEVLEVEL_OFFSET) as u16,
            },
        };
        Ok(header)
    }
}

/// Build header word 1 from a type tag and timestamp.
pub fn header_word1(diag_type: u32, timestamp: u32) -> u32 {
    ((diag_type << TYPE_OFFSET) & TYPE_MASK) | (timestamp & TIMESTAMP_MASK)
}

/// Build header word 2 for a message record.
pub fn msg_header_word2(id: u32, vdev_id: u16, vdev_level: u16, payload_len: u8) -> u32 {
    ((id << ID_OFFSET) & ID_MASK)
        | (((vdev_id as u32) << VDEVID_OFFSET) & VDEVID_MASK)
        | (((vdev_level as u32) << VDEVLEVEL_OFFSET) & VDEVLEVEL_MASK)
        | (payload_len as u32)
}

/// Build header word 2 for an event or log record.
pub fn event_header_word2(id: u32, payload_len: u16) -> u32 {
    ((id << ID_OFFSET) & ID_MASK) | (payload_len as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_message_header() {
        let w1 = header_word1(2, 0x00AB_CDEF);
        let w2 = msg_header_word2(1000, 3, 4, 12);
        let h = RecordHeader::parse(w1, w2).unwrap();
        assert_eq!(h.diag_type, DiagType::Msg);
        assert_eq!(h.timestamp, 0x00AB_CDEF);
        assert_eq!(h.id, 1000);
        assert_eq!(h.vdev_id, 3);
        assert_eq!(h.vdev_level, 4);
        assert_eq!(h.payload_len, 12);
    }

    #[test]
    fn parses_event_header_with_wide_length() {
        let w1 = header_word1(0, 77);
        let w2 = event_header_word2(0x0123, 0xFFFF);
        let h = RecordHeader::parse(w1, w2).unwrap();
        assert_eq!(h.diag_type, DiagType::Event);
        assert_eq!(h.id, 0x0123);
        assert_eq!(h.payload_len, 0xFFFF);
        assert_eq!(h.vdev_id, 0);
    }

    #[test]
    fn rejects_unknown_type() {
        let w1 = header_word1(9, 0);
        assert_eq!(RecordHeader::parse(w1, 0), Err(9));
    }

    #[test]
    fn timestamp_is_24_bits() {
        let w1 = header_word1(1, 0xFFFF_FFFF);
        let h = RecordHeader::parse(w1, 0).unwrap();
        assert_eq!(h.timestamp, 0x00FF_FFFF);
        assert_eq!(h.diag_type, DiagType::Log);
    }

    #[test]
    fn severity_mapping() {
        assert_eq!(Severity::from_vdev_level(0), Severity::Verbose);
        assert_eq!(Severity::from_vdev_level(2), Severity::Info);
        assert_eq!(Severity::from_vdev_level(4), Severity::Warn);
        assert_eq!(Severity::from_vdev_level(5), Severity::Err);
        assert_eq!(Severity::from_vdev_level(6), Severity::Fatal);
        assert_eq!(Severity::from_vdev_level(7), Severity::Fatal);
    }
}
