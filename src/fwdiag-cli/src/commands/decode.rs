//! Decode command handler.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use fwdiag::{
    DecodeEngine, LogFile, OutputFlags, Sinks, StdoutSink, TracingBus, TracingSubsystem,
};

#[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
pub fn handle(
    db: &Path,
    input: &Path,
    fw_version: Option<i32>,
    console: bool,
    logfile: Option<&Path>,
    max_records: u32,
    bus: bool,
    silent: bool,
    debug: bool,
) -> Result<()> {
    let engine = DecodeEngine::from_descriptor_path(db)
        .with_context(|| format!("failed to load descriptor file {}", db.display()))?;
    let version = fw_version.unwrap_or_else(|| engine.file_version());

    let capture = fs::read(input)
        .with_context(|| format!("failed to read capture {}", input.display()))?;

    let mut flags = OutputFlags::new();
    if console || (logfile.is_none() && !bus) {
        // Decoding with no sink selected would silently discard
        // everything; default to the console.
        flags = flags.with_console();
    }
    if logfile.is_some() {
        flags = flags.with_logfile();
    }
    if bus {
        flags = flags.with_bus();
    }
    if silent {
        flags = flags.with_silent();
    }
    if debug {
        flags = flags.with_debug();
    }

    let mut stdout = StdoutSink;
    let mut log = match logfile {
        Some(path) => Some(
            LogFile::create(path, max_records)
                .with_context(|| format!("failed to create log file {}", path.display()))?,
        ),
        None => None,
    };
    let mut diag_bus = TracingBus;
    let mut subsystem = TracingSubsystem;

    let mut sinks = Sinks {
        console: Some(&mut stdout),
        logfile: log.as_mut(),
        bus: bus.then_some(&mut diag_bus as &mut dyn fwdiag::DiagBus),
        subsystem: bus.then_some(&mut subsystem as &mut dyn fwdiag::DiagSubsystem),
    };

    let summary = engine.process_buffer(&capture, version, flags, &mut sinks)?;

    if let Some(log) = log.as_mut() {
        log.flush()?;
    }

    eprintln!(
        "decoded {} records ({} warnings)",
        summary.records, summary.warnings
    );
    if let Some(fault) = summary.fault {
        bail!("buffer foreshortened: {fault:?}");
    }
    Ok(())
}
