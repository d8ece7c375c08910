//! Record dispatch: walks a raw firmware buffer and routes each record
//! to the event/log subsystem or through the formatter to the active
//! sinks.
//!
//! The engine is a caller-owned value wrapping a built descriptor
//! database. Re-initialization (firmware driver reload, new descriptor
//! file) is construct-new-and-swap by the caller; an engine is never
//! mutated while decode calls are outstanding.

use thiserror::Error;
use tracing::{debug, warn};

use crate::database::{DatabaseError, DescriptorDatabase};
use crate::format;
use crate::legacy;
use crate::record::{
    DiagType, RecordHeader, Severity, DROPPED_COUNTER_SIZE, HEADER_SIZE, MAX_VDEV_ID,
};
use crate::sink::OutputFlags;

/// Scratch buffer for message payloads, and the render capacity. A
/// record claiming more payload than this is truncated; a record
/// carrying less leaves the tail zeroed so under-filled conversions
/// print zero instead of garbage.
const MSG_SCRATCH: usize = 512;

/// Fixed header prepended to committed log buffers (code, length,
/// timestamp) by the subsystem's own framing.
pub const LOG_HEADER_SIZE: usize = 12;

/// Errors fatal to a whole decode call.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("buffer too short for the dropped-record counter: {len} bytes")]
    ShortBuffer { len: usize },

    #[error("sink write failed: {0}")]
    Sink(#[from] std::io::Error),
}

/// Why the walk stopped before the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFault {
    /// An unrecognized diag-type tag: the header layout (and with it
    /// the payload length) is unknown, so the next record offset
    /// cannot be computed.
    UnknownDiagType { raw: u32, offset: usize },
}

/// Result of one decode call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Records dispatched (all diag types).
    pub records: usize,
    /// Warning lines emitted (version mismatch, unknown id,
    /// allocation failure).
    pub warnings: usize,
    /// Set when the buffer was foreshortened by a stream fault; the
    /// records before the fault were still delivered.
    pub fault: Option<StreamFault>,
}

/// Decode engine: a built descriptor database plus the dispatch logic.
#[derive(Debug)]
pub struct DecodeEngine {
    db: DescriptorDatabase,
}

impl DecodeEngine {
    pub fn new(db: DescriptorDatabase) -> Self {
        Self { db }
    }

    /// Build the engine from a descriptor file on disk.
    pub fn from_descriptor_path<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, DatabaseError> {
        Ok(Self::new(DescriptorDatabase::from_path(path)?))
    }

    pub fn database(&self) -> &DescriptorDatabase {
        &self.db
    }

    /// Version declared by the loaded descriptor file.
    pub fn file_version(&self) -> i32 {
        self.db.file_version()
    }

    /// Decode one firmware buffer to completion.
    ///
    /// `version` is the firmware image's format-file version; message
    /// records are only rendered when it matches the descriptor
    /// file's. The walk advances by each record's declared payload
    /// length plus the fixed header size; there are no delimiters and
    /// no record count in the stream.
    pub fn process_buffer(
        &self,
        data: &[u8],
        version: i32,
        flags: OutputFlags,
        sinks: &mut Sinks<'_>,
    ) -> Result<DecodeSummary, DecodeError> {
        if flags.has_debug() {
            debug!(len = data.len(), dump = %hex::encode(data), "processing firmware buffer");
        }
        if data.len() < DROPPED_COUNTER_SIZE {
            return Err(DecodeError::ShortBuffer { len: data.len() });
        }
        // The first word counts records the firmware dropped; skip it.
        let body = &data[DROPPED_COUNTER_SIZE..];
        let total = body.len();

        let mut summary = DecodeSummary::default();
        let mut count = 0usize;

        while count < total {
            // Next header sits at the word-aligned stream position.
            let offset = (count >> 2) * 4;
            if offset + HEADER_SIZE > total {
                break;
            }
            let word1 = read_word(body, offset);
            let word2 = read_word(body, offset + 4);
            let header = match RecordHeader::parse(word1, word2) {
                Ok(h) => h,
                Err(raw) => {
                    self.emit_warning(
                        "****WARNING**** unrecognized diag type in stream",
                        0,
                        flags,
                        sinks,
                    )?;
                    summary.warnings += 1;
                    summary.fault = Some(StreamFault::UnknownDiagType { raw, offset });
                    break;
                }
            };
            let payload_start = offset + HEADER_SIZE;
            let payload_end = payload_start + header.payload_len.min(total - payload_start);
            let payload = &body[payload_start..payload_end];

            debug!(
                diag_type = ?header.diag_type,
                id = header.id,
                timestamp = header.timestamp,
                payload_len = header.payload_len,
                "record"
            );

            match header.diag_type {
                DiagType::Event => self.dispatch_event(&header, payload, flags, sinks),
                DiagType::Log => {
                    self.dispatch_log(&header, payload, flags, sinks, &mut summary)
                }
                DiagType::Msg => {
                    self.dispatch_msg(&header, payload, version, flags, sinks, &mut summary)?
                }
            }

            summary.records += 1;
            count += header.payload_len + HEADER_SIZE;
        }

        Ok(summary)
    }

    fn dispatch_event(
        &self,
        header: &RecordHeader,
        payload: &[u8],
        flags: OutputFlags,
        sinks: &mut Sinks<'_>,
    ) {
        if !flags.has_bus() {
            return;
        }
        if let Some(subsystem) = sinks.subsystem.as_deref_mut() {
            // Zero payload length delivers an id-only event.
            subsystem.event(header.id, payload);
        }
    }

    fn dispatch_log(
        &self,
        header: &RecordHeader,
        payload: &[u8],
        flags: OutputFlags,
        sinks: &mut Sinks<'_>,
        summary: &mut DecodeSummary,
    ) {
        if !flags.has_bus() {
            return;
        }
        let Some(subsystem) = sinks.subsystem.as_deref_mut() else {
            return;
        };
        match subsystem.allocate(header.id, LOG_HEADER_SIZE + payload.len()) {
            Some(mut buf) => {
                if buf.len() < LOG_HEADER_SIZE + payload.len() {
                    buf.resize(LOG_HEADER_SIZE + payload.len(), 0);
                }
                buf[LOG_HEADER_SIZE..LOG_HEADER_SIZE + payload.len()].copy_from_slice(payload);
                subsystem.commit(buf);
            }
            None => {
                warn!(
                    id = header.id,
                    len = payload.len(),
                    "log buffer allocation failed"
                );
                summary.warnings += 1;
            }
        }
    }

    fn dispatch_msg(
        &self,
        header: &RecordHeader,
        payload: &[u8],
        version: i32,
        flags: OutputFlags,
        sinks: &mut Sinks<'_>,
        summary: &mut DecodeSummary,
    ) -> Result<(), DecodeError> {
        if self.db.file_version() != version {
            let line = format!(
                "**ERROR** descriptor version {} does not match firmware version {} id = {}",
                self.db.file_version(),
                version,
                header.id
            );
            self.emit_warning(&line, header.timestamp, flags, sinks)?;
            summary.warnings += 1;
            return Ok(());
        }

        match self.db.lookup(header.id) {
            Some(entry) => {
                let text = if !entry.pack.is_empty() && !payload.is_empty() {
                    // Fixed zero-filled scratch: over-long payloads are
                    // truncated, short ones render zero for the
                    // missing fields.
                    let mut scratch = [0u8; MSG_SCRATCH];
                    let n = payload.len().min(MSG_SCRATCH);
                    scratch[..n].copy_from_slice(&payload[..n]);
                    format::render(&entry.format, &entry.pack, &scratch, MSG_SCRATCH)
                } else {
                    entry.format.clone()
                };
                self.emit_message(&text, header, flags, sinks)?;
            }
            None => match legacy::decode(header.id, payload) {
                Some(text) => self.emit_message(&text, header, flags, sinks)?,
                None if legacy::is_legacy_module(header.id) => {
                    let line = format!(
                        "****WARNING**** undefined legacy module event, id = {}",
                        header.id
                    );
                    self.emit_warning(&line, header.timestamp, flags, sinks)?;
                    summary.warnings += 1;
                }
                None => {
                    let line = format!("****WARNING**** FWMSG ID {} not found", header.id);
                    self.emit_warning(&line, header.timestamp, flags, sinks)?;
                    summary.warnings += 1;
                }
            },
        }
        Ok(())
    }

    /// Deliver a rendered message line to every flag-selected sink.
    fn emit_message(
        &self,
        text: &str,
        header: &RecordHeader,
        flags: OutputFlags,
        sinks: &mut Sinks<'_>,
    ) -> Result<(), DecodeError> {
        let line = compose_line(header.timestamp, Some(header.vdev_id), text);

        if flags.has_logfile() {
            if let Some(logfile) = sinks.logfile.as_deref_mut() {
                let record = logfile.record() + 1;
                if !flags.is_silent() {
                    if let Some(console) = sinks.console.as_deref_mut() {
                        console.write_line(&format!("{record}: {text}"))?;
                    }
                }
                logfile.write_line(&line)?;
            }
        }
        if flags.has_console() {
            if let Some(console) = sinks.console.as_deref_mut() {
                console.write_line(&line)?;
            }
        }
        if flags.has_bus() {
            if let Some(bus) = sinks.bus.as_deref_mut() {
                bus.write(Severity::from_vdev_level(header.vdev_level), &line)?;
            }
        }
        Ok(())
    }

    /// Warnings go to the console and bus only, never the log file.
    fn emit_warning(
        &self,
        text: &str,
        timestamp: u32,
        flags: OutputFlags,
        sinks: &mut Sinks<'_>,
    ) -> Result<(), DecodeError> {
        warn!(timestamp, "{text}");
        let line = compose_line(timestamp, None, text);
        if flags.has_console() || flags.has_logfile() {
            if let Some(console) = sinks.console.as_deref_mut() {
                console.write_line(&line)?;
            }
        }
        if flags.has_bus() {
            if let Some(bus) = sinks.bus.as_deref_mut() {
                bus.write(Severity::Warn, &line)?;
            }
        }
        Ok(())
    }
}

/// The optional sink collaborators for one decode call; which of them
/// actually receive output is decided by [`OutputFlags`].
#[derive(Default)]
pub struct Sinks<'a> {
    pub console: Option<&'a mut dyn crate::sink::LineSink>,
    pub logfile: Option<&'a mut crate::sink::LogFile>,
    pub bus: Option<&'a mut dyn crate::sink::DiagBus>,
    pub subsystem: Option<&'a mut dyn crate::sink::DiagSubsystem>,
}

/// `FWMSG: [<timestamp>] vap-<n> <text>`; the vap label is dropped for
/// out-of-range vdev ids and for warning lines.
fn compose_line(timestamp: u32, vdev_id: Option<u16>, text: &str) -> String {
    match vdev_id {
        Some(vdev) if vdev < MAX_VDEV_ID => {
            format!("FWMSG: [{timestamp}] vap-{vdev} {text}")
        }
        _ => format!("FWMSG: [{timestamp}] {text}"),
    }
}

fn read_word(body: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        body[offset],
        body[offset + 1],
        body[offset + 2],
        body[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{event_header_word2, header_word1, msg_header_word2};
    use crate::sink::{DiagBus, DiagSubsystem, MemorySink};

    const VERSION: i32 = 4324;

    const DESCRIPTOR: &str = "VERSION:4324\r\n\
        100,i,count=%d\r\n\
        101,scan started\r\n\
        102,2i,seq %d status %d\r\n\
        \r\n";

    fn engine() -> DecodeEngine {
        DecodeEngine::new(crate::database::DescriptorDatabase::from_str(DESCRIPTOR).unwrap())
    }

    /// Build a buffer: dropped counter plus the given records.
    fn buffer(records: &[(u32, u32, &[u8])]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0u32.to_le_bytes()); // dropped counter
        for (w1, w2, payload) in records {
            out.extend_from_slice(&w1.to_le_bytes());
            out.extend_from_slice(&w2.to_le_bytes());
            out.extend_from_slice(payload);
        }
        out
    }

    fn msg_record(id: u32, vdev: u16, level: u16, timestamp: u32, payload: &[u8]) -> (u32, u32) {
        (
            header_word1(2, timestamp),
            msg_header_word2(id, vdev, level, payload.len() as u8),
        )
    }

    #[derive(Default)]
    struct MockSubsystem {
        events: Vec<(u32, Vec<u8>)>,
        committed: Vec<Vec<u8>>,
        fail_alloc: bool,
    }

    impl DiagSubsystem for MockSubsystem {
        fn event(&mut self, id: u32, payload: &[u8]) {
            self.events.push((id, payload.to_vec()));
        }

        fn allocate(&mut self, _id: u32, size: usize) -> Option<Vec<u8>> {
            (!self.fail_alloc).then(|| vec![0; size])
        }

        fn commit(&mut self, buf: Vec<u8>) {
            self.committed.push(buf);
        }
    }

    #[derive(Default)]
    struct MockBus {
        lines: Vec<(Severity, String)>,
    }

    impl DiagBus for MockBus {
        fn write(&mut self, severity: Severity, line: &str) -> std::io::Result<()> {
            self.lines.push((severity, line.to_string()));
            Ok(())
        }
    }

    #[test]
    fn message_record_renders_to_console() {
        let engine = engine();
        let (w1, w2) = msg_record(100, 0, 1, 99, &[0x0A, 0, 0, 0]);
        let data = buffer(&[(w1, w2, &[0x0A, 0, 0, 0])]);

        let mut console = MemorySink::default();
        let mut sinks = Sinks {
            console: Some(&mut console),
            ..Sinks::default()
        };
        let summary = engine
            .process_buffer(&data, VERSION, OutputFlags::new().with_console(), &mut sinks)
            .unwrap();

        assert_eq!(summary.records, 1);
        assert_eq!(summary.warnings, 0);
        assert!(summary.fault.is_none());
        assert_eq!(console.lines, vec!["FWMSG: [99] vap-0 count=10"]);
    }

    #[test]
    fn literal_format_needs_no_payload() {
        let engine = engine();
        let (w1, w2) = msg_record(101, 1, 1, 5, &[]);
        let data = buffer(&[(w1, w2, &[])]);

        let mut console = MemorySink::default();
        let mut sinks = Sinks {
            console: Some(&mut console),
            ..Sinks::default()
        };
        engine
            .process_buffer(&data, VERSION, OutputFlags::new().with_console(), &mut sinks)
            .unwrap();
        assert_eq!(console.lines, vec!["FWMSG: [5] vap-1 scan started"]);
    }

    #[test]
    fn consecutive_records_are_all_dispatched() {
        let engine = engine();
        let p1 = 10u32.to_le_bytes();
        let mut p2 = Vec::new();
        p2.extend_from_slice(&7u32.to_le_bytes());
        p2.extend_from_slice(&0u32.to_le_bytes());
        let (a1, a2) = msg_record(100, 0, 1, 1, &p1);
        let (b1, b2) = msg_record(102, 2, 1, 2, &p2);
        let data = buffer(&[(a1, a2, &p1), (b1, b2, &p2)]);

        let mut console = MemorySink::default();
        let mut sinks = Sinks {
            console: Some(&mut console),
            ..Sinks::default()
        };
        let summary = engine
            .process_buffer(&data, VERSION, OutputFlags::new().with_console(), &mut sinks)
            .unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(
            console.lines,
            vec![
                "FWMSG: [1] vap-0 count=10",
                "FWMSG: [2] vap-2 seq 7 status 0"
            ]
        );
    }

    #[test]
    fn unknown_id_warns_once_without_message_line() {
        let engine = engine();
        let payload = 1u32.to_le_bytes();
        let (w1, w2) = msg_record(555, 0, 1, 7, &payload);
        let data = buffer(&[(w1, w2, &payload)]);

        let mut console = MemorySink::default();
        let mut sinks = Sinks {
            console: Some(&mut console),
            ..Sinks::default()
        };
        let summary = engine
            .process_buffer(&data, VERSION, OutputFlags::new().with_console(), &mut sinks)
            .unwrap();

        assert_eq!(summary.warnings, 1);
        assert_eq!(console.lines.len(), 1);
        assert!(console.lines[0].contains("555"));
        assert!(console.lines[0].contains("not found"));
    }

    #[test]
    fn version_mismatch_skips_record_not_stream() {
        let engine = engine();
        let payload = 10u32.to_le_bytes();
        let (a1, a2) = msg_record(100, 0, 1, 1, &payload);
        let (b1, b2) = msg_record(100, 0, 1, 2, &payload);
        let data = buffer(&[(a1, a2, &payload), (b1, b2, &payload)]);

        let mut console = MemorySink::default();
        let mut sinks = Sinks {
            console: Some(&mut console),
            ..Sinks::default()
        };
        let summary = engine
            .process_buffer(&data, VERSION + 1, OutputFlags::new().with_console(), &mut sinks)
            .unwrap();

        // Both records hit the version gate; the stream still ran to
        // the end.
        assert_eq!(summary.records, 2);
        assert_eq!(summary.warnings, 2);
        assert!(summary.fault.is_none());
        assert!(console.lines[0].contains("does not match"));
    }

    #[test]
    fn legacy_module_id_uses_fallback_decoder() {
        let engine = engine();
        let mut payload = Vec::new();
        payload.extend_from_slice(&5u32.to_le_bytes()); // event code
        payload.extend_from_slice(&1u32.to_le_bytes()); // argc
        payload.extend_from_slice(&0x2Au32.to_le_bytes());
        let (w1, w2) = msg_record(crate::legacy::MODULE_WAL, 0, 1, 3, &payload);
        let data = buffer(&[(w1, w2, &payload)]);

        let mut console = MemorySink::default();
        let mut sinks = Sinks {
            console: Some(&mut console),
            ..Sinks::default()
        };
        let summary = engine
            .process_buffer(&data, VERSION, OutputFlags::new().with_console(), &mut sinks)
            .unwrap();
        assert_eq!(summary.warnings, 0);
        assert_eq!(console.lines, vec!["FWMSG: [3] vap-0 wal: event 5 args [0x2a]"]);
    }

    #[test]
    fn event_record_reaches_subsystem() {
        let engine = engine();
        let payload = [1u8, 2, 3, 4];
        let w1 = header_word1(0, 11);
        let w2 = event_header_word2(900, payload.len() as u16);
        let data = buffer(&[(w1, w2, &payload)]);

        let mut subsystem = MockSubsystem::default();
        let mut sinks = Sinks {
            subsystem: Some(&mut subsystem),
            ..Sinks::default()
        };
        engine
            .process_buffer(&data, VERSION, OutputFlags::new().with_bus(), &mut sinks)
            .unwrap();
        assert_eq!(subsystem.events, vec![(900, payload.to_vec())]);
    }

    #[test]
    fn log_record_is_allocated_and_committed() {
        let engine = engine();
        let payload = [0xAAu8, 0xBB, 0xCC, 0xDD];
        let w1 = header_word1(1, 11);
        let w2 = event_header_word2(42, payload.len() as u16);
        let data = buffer(&[(w1, w2, &payload)]);

        let mut subsystem = MockSubsystem::default();
        let mut sinks = Sinks {
            subsystem: Some(&mut subsystem),
            ..Sinks::default()
        };
        engine
            .process_buffer(&data, VERSION, OutputFlags::new().with_bus(), &mut sinks)
            .unwrap();

        assert_eq!(subsystem.committed.len(), 1);
        let buf = &subsystem.committed[0];
        assert_eq!(buf.len(), LOG_HEADER_SIZE + payload.len());
        assert_eq!(&buf[LOG_HEADER_SIZE..], &payload);
    }

    #[test]
    fn log_allocation_failure_is_recoverable() {
        let engine = engine();
        let log_payload = [0u8; 4];
        let msg_payload = 10u32.to_le_bytes();
        let w1 = header_word1(1, 1);
        let w2 = event_header_word2(42, log_payload.len() as u16);
        let (m1, m2) = msg_record(100, 0, 1, 2, &msg_payload);
        let data = buffer(&[(w1, w2, &log_payload), (m1, m2, &msg_payload)]);

        let mut subsystem = MockSubsystem {
            fail_alloc: true,
            ..MockSubsystem::default()
        };
        let mut console = MemorySink::default();
        let mut sinks = Sinks {
            console: Some(&mut console),
            subsystem: Some(&mut subsystem),
            ..Sinks::default()
        };
        let summary = engine
            .process_buffer(
                &data,
                VERSION,
                OutputFlags::new().with_bus().with_console(),
                &mut sinks,
            )
            .unwrap();

        assert!(subsystem.committed.is_empty());
        assert_eq!(summary.warnings, 1);
        // The message record after the failed allocation still decoded.
        assert_eq!(summary.records, 2);
        assert_eq!(console.lines, vec!["FWMSG: [2] vap-0 count=10"]);
    }

    #[test]
    fn unknown_diag_type_foreshortens_buffer() {
        let engine = engine();
        let payload = 10u32.to_le_bytes();
        let bad_w1 = header_word1(9, 1);
        let (m1, m2) = msg_record(100, 0, 1, 2, &payload);
        let data = buffer(&[(bad_w1, 0, &[]), (m1, m2, &payload)]);

        let mut console = MemorySink::default();
        let mut sinks = Sinks {
            console: Some(&mut console),
            ..Sinks::default()
        };
        let summary = engine
            .process_buffer(&data, VERSION, OutputFlags::new().with_console(), &mut sinks)
            .unwrap();

        assert_eq!(summary.fault, Some(StreamFault::UnknownDiagType { raw: 9, offset: 0 }));
        // Nothing past the fault was dispatched.
        assert_eq!(summary.records, 0);
        assert_eq!(console.lines.len(), 1);
        assert!(console.lines[0].contains("WARNING"));
    }

    #[test]
    fn bus_lines_carry_severity_from_vdev_level() {
        let engine = engine();
        let payload = 10u32.to_le_bytes();
        let (w1, w2) = msg_record(100, 0, 5, 1, &payload);
        let data = buffer(&[(w1, w2, &payload)]);

        let mut bus = MockBus::default();
        let mut sinks = Sinks {
            bus: Some(&mut bus),
            ..Sinks::default()
        };
        engine
            .process_buffer(&data, VERSION, OutputFlags::new().with_bus(), &mut sinks)
            .unwrap();
        assert_eq!(bus.lines.len(), 1);
        assert_eq!(bus.lines[0].0, Severity::Err);
    }

    #[test]
    fn oversize_payload_claim_is_truncated_not_overrun() {
        let engine = engine();
        // Header claims 200 payload bytes; only 4 are present.
        let w1 = header_word1(2, 1);
        let w2 = msg_header_word2(100, 0, 1, 200);
        let data = buffer(&[(w1, w2, &10u32.to_le_bytes())]);

        let mut console = MemorySink::default();
        let mut sinks = Sinks {
            console: Some(&mut console),
            ..Sinks::default()
        };
        let summary = engine
            .process_buffer(&data, VERSION, OutputFlags::new().with_console(), &mut sinks)
            .unwrap();
        assert_eq!(summary.records, 1);
        assert_eq!(console.lines, vec!["FWMSG: [1] vap-0 count=10"]);
    }

    #[test]
    fn short_buffer_is_an_error() {
        let engine = engine();
        let mut sinks = Sinks::default();
        let err = engine
            .process_buffer(&[0u8, 1], VERSION, OutputFlags::new(), &mut sinks)
            .unwrap_err();
        assert!(matches!(err, DecodeError::ShortBuffer { len: 2 }));
    }

    #[test]
    fn logfile_path_echoes_numbered_lines_unless_silent() {
        let engine = engine();
        let payload = 10u32.to_le_bytes();
        let (w1, w2) = msg_record(100, 0, 1, 1, &payload);
        let data = buffer(&[(w1, w2, &payload)]);

        let dir = tempfile::tempdir().unwrap();
        let mut logfile = crate::sink::LogFile::create(dir.path().join("fw.log"), 100).unwrap();
        let mut console = MemorySink::default();
        let mut sinks = Sinks {
            console: Some(&mut console),
            logfile: Some(&mut logfile),
            ..Sinks::default()
        };
        engine
            .process_buffer(&data, VERSION, OutputFlags::new().with_logfile(), &mut sinks)
            .unwrap();
        assert_eq!(console.lines, vec!["1: count=10"]);
        assert_eq!(logfile.record(), 1);

        // Silent suppresses the echo but still writes the file.
        let mut console = MemorySink::default();
        let mut logfile2 = crate::sink::LogFile::create(dir.path().join("fw2.log"), 100).unwrap();
        let mut sinks = Sinks {
            console: Some(&mut console),
            logfile: Some(&mut logfile2),
            ..Sinks::default()
        };
        engine
            .process_buffer(
                &data,
                VERSION,
                OutputFlags::new().with_logfile().with_silent(),
                &mut sinks,
            )
            .unwrap();
        assert!(console.lines.is_empty());
        assert_eq!(logfile2.record(), 1);
    }
}
