//! # fwdiag
//!
//! Decoder for the compact binary telemetry stream emitted by
//! wireless-network firmware.
//!
//! Firmware encodes each log statement as a `(id, packed-arguments)`
//! pair instead of a literal string. A descriptor file maps every id
//! back to a printf-style format template plus a pack specifier that
//! names the width of each binary argument. This library provides:
//!
//! - Descriptor database construction and id lookup ([`database`])
//! - Run-length pack-specifier expansion ([`pack`])
//! - Binary-to-text rendering of packed arguments ([`format`])
//! - Record framing and dispatch over a raw firmware buffer
//!   ([`record`], [`dispatch`])
//!
//! ## Example
//!
//! ```no_run
//! use fwdiag::{DecodeEngine, OutputFlags, Sinks, StdoutSink};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DecodeEngine::from_descriptor_path("data.msc")?;
//!
//! let capture = std::fs::read("capture.bin")?;
//! let mut console = StdoutSink;
//! let mut sinks = Sinks::default();
//! sinks.console = Some(&mut console);
//!
//! let summary = engine.process_buffer(
//!     &capture,
//!     engine.file_version(),
//!     OutputFlags::new().with_console(),
//!     &mut sinks,
//! )?;
//! println!("decoded {} records", summary.records);
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod dispatch;
pub mod format;
pub mod legacy;
pub mod pack;
pub mod record;
pub mod sink;

// Re-export commonly used items
#[doc(inline)]
pub use database::{DatabaseError, DescriptorDatabase, DescriptorEntry};
#[doc(inline)]
pub use dispatch::{DecodeEngine, DecodeError, DecodeSummary, Sinks, StreamFault};
#[doc(inline)]
pub use format::render;
#[doc(inline)]
pub use pack::expand;
#[doc(inline)]
pub use record::{DiagType, RecordHeader, Severity};
#[doc(inline)]
pub use sink::{
    DiagBus, DiagSubsystem, LineSink, LogFile, MemorySink, OutputFlags, StdoutSink, TracingBus,
    TracingSubsystem,
};
