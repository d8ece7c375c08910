//! Output sinks and external collaborators.
//!
//! The dispatcher fans rendered lines out to whichever sinks the
//! caller enabled: a console line writer, an append-only log file with
//! record-count wraparound, and a diagnostic bus keyed by severity.
//! Event and log records bypass rendering entirely and go to the
//! event/log subsystem through its allocate/commit interface.

use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

use crate::record::Severity;

/// Output-mode bitmask selecting the active sinks for a decode call.
///
/// More than one mode may be active at once. `SILENT` suppresses the
/// numbered console echo of the log-file path; `DEBUG` enables the
/// dispatcher's hex-dump tracing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputFlags(pub u32);

impl OutputFlags {
    const CONSOLE: u32 = 1; // bit 0 - console line writer
    const LOGFILE: u32 = 2; // bit 1 - append-only log file
    const BUS: u32 = 4; // bit 2 - diagnostic bus + event/log subsystem
    const SILENT: u32 = 8; // bit 3 - suppress numbered echo
    const DEBUG: u32 = 16; // bit 4 - hex-dump tracing

    pub fn new() -> Self {
        Self(0)
    }

    pub fn from_raw(bits: u32) -> Self {
        Self(bits)
    }

    pub fn to_raw(self) -> u32 {
        self.0
    }

    // Builder methods (chainable)

    pub fn with_console(mut self) -> Self {
        self.0 |= Self::CONSOLE;
        self
    }

    pub fn with_logfile(mut self) -> Self {
        self.0 |= Self::LOGFILE;
        self
    }

    pub fn with_bus(mut self) -> Self {
        self.0 |= Self::BUS;
        self
    }

    pub fn with_silent(mut self) -> Self {
        self.0 |= Self::SILENT;
        self
    }

    pub fn with_debug(mut self) -> Self {
        self.0 |= Self::DEBUG;
        self
    }

    // Query methods

    pub fn has_console(self) -> bool {
        self.0 & Self::CONSOLE != 0
    }

    pub fn has_logfile(self) -> bool {
        self.0 & Self::LOGFILE != 0
    }

    pub fn has_bus(self) -> bool {
        self.0 & Self::BUS != 0
    }

    pub fn is_silent(self) -> bool {
        self.0 & Self::SILENT != 0
    }

    pub fn has_debug(self) -> bool {
        self.0 & Self::DEBUG != 0
    }
}

/// One-method console/line sink.
pub trait LineSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Console sink backed by stdout.
pub struct StdoutSink;

impl LineSink for StdoutSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}")
    }
}

/// In-memory sink collecting lines; used by tests and by the CLI's
/// summary output.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub lines: Vec<String>,
}

impl LineSink for MemorySink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

/// Log-file writer with record-count wraparound.
///
/// Counts one record per line written; when the count reaches
/// `max_records` the file position rewinds to the start and the count
/// resets, recycling the file instead of growing it without bound.
pub struct LogFile {
    file: File,
    record: u32,
    max_records: u32,
}

impl LogFile {
    pub fn create<P: AsRef<Path>>(path: P, max_records: u32) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            file,
            record: 0,
            max_records,
        })
    }

    /// Current record index (wraps at `max_records`).
    pub fn record(&self) -> u32 {
        self.record
    }

    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.record += 1;
        writeln!(self.file, "{line}")?;
        if self.record >= self.max_records {
            self.record = 0;
            self.file.seek(SeekFrom::Start(0))?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Remote diagnostic-bus writer keyed by severity.
pub trait DiagBus {
    fn write(&mut self, severity: Severity, line: &str) -> io::Result<()>;
}

/// Diagnostic bus backed by the process's trace log: severity maps to
/// the matching tracing level. Stands in for a real transport when no
/// diagnostic bus is attached.
pub struct TracingBus;

impl DiagBus for TracingBus {
    fn write(&mut self, severity: Severity, line: &str) -> io::Result<()> {
        match severity {
            Severity::Verbose => tracing::trace!(target: "fwdiag::bus", "{line}"),
            Severity::Info => tracing::info!(target: "fwdiag::bus", "{line}"),
            Severity::Warn => tracing::warn!(target: "fwdiag::bus", "{line}"),
            Severity::Err | Severity::Fatal => {
                tracing::error!(target: "fwdiag::bus", "{line}")
            }
        }
        Ok(())
    }
}

/// Event/log subsystem collaborator.
///
/// Firmware event records are delivered directly; firmware log records
/// go through allocate/commit so the subsystem owns the buffer.
/// Returning `None` from [`DiagSubsystem::allocate`] is recoverable:
/// the dispatcher warns and moves to the next record.
pub trait DiagSubsystem {
    /// Deliver one firmware event. `payload` is empty for id-only
    /// events.
    fn event(&mut self, id: u32, payload: &[u8]);

    /// Request a log buffer of `size` bytes for record `id`.
    fn allocate(&mut self, id: u32, size: usize) -> Option<Vec<u8>>;

    /// Hand a filled log buffer back to the subsystem.
    fn commit(&mut self, buf: Vec<u8>);
}

/// Event/log subsystem backed by the process's trace log: events and
/// committed log buffers are hex-dumped at debug level. Allocation
/// always succeeds.
pub struct TracingSubsystem;

impl DiagSubsystem for TracingSubsystem {
    fn event(&mut self, id: u32, payload: &[u8]) {
        tracing::debug!(target: "fwdiag::subsystem", id, payload = %hex::encode(payload), "event");
    }

    fn allocate(&mut self, _id: u32, size: usize) -> Option<Vec<u8>> {
        Some(vec![0; size])
    }

    fn commit(&mut self, buf: Vec<u8>) {
        tracing::debug!(target: "fwdiag::subsystem", len = buf.len(), data = %hex::encode(&buf), "log commit");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn flags_combine_and_query() {
        let flags = OutputFlags::new().with_console().with_logfile();
        assert!(flags.has_console());
        assert!(flags.has_logfile());
        assert!(!flags.has_bus());
        assert!(!flags.is_silent());
    }

    #[test]
    fn flags_round_trip_raw() {
        let flags = OutputFlags::new().with_bus().with_debug();
        assert_eq!(OutputFlags::from_raw(flags.to_raw()), flags);
    }

    #[test]
    fn memory_sink_collects_lines() {
        let mut sink = MemorySink::default();
        sink.write_line("one").unwrap();
        sink.write_line("two").unwrap();
        assert_eq!(sink.lines, vec!["one", "two"]);
    }

    #[test]
    fn tracing_subsystem_allocates_requested_size() {
        let mut subsystem = TracingSubsystem;
        let buf = subsystem.allocate(7, 24).unwrap();
        assert_eq!(buf.len(), 24);
        subsystem.commit(buf);
        subsystem.event(7, &[1, 2, 3]);
    }

    #[test]
    fn tracing_bus_accepts_every_severity() {
        let mut bus = TracingBus;
        for severity in [
            Severity::Verbose,
            Severity::Info,
            Severity::Warn,
            Severity::Err,
            Severity::Fatal,
        ] {
            bus.write(severity, "line").unwrap();
        }
    }

    #[test]
    fn log_file_wraps_at_max_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fw.log");
        let mut log = LogFile::create(&path, 2).unwrap();

        log.write_line("aaaa").unwrap();
        assert_eq!(log.record(), 1);
        log.write_line("bbbb").unwrap();
        // Hit the cap: index resets, position rewinds.
        assert_eq!(log.record(), 0);
        log.write_line("cc").unwrap();
        assert_eq!(log.record(), 1);
        log.flush().unwrap();

        let mut contents = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        // The third line overwrote the start of the file.
        assert!(contents.starts_with("cc\n"));
    }
}
