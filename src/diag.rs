//! Diagnostic file subsystem
//!
//! Presents one virtual file named after the capability record. Reading it
//! runs the record's `diagnostic_dump` hook; writing it drives a minimal
//! single-command protocol that toggles the debug flag.
//!
//! Two structurally different host read paths exist: a structured streaming
//! object and a raw bounded buffer with a cursor. Both are hidden behind the
//! [`DiagnosticSink`] trait so the dump hook never sees the backing choice,
//! and both produce byte-identical text for the same driver state.

use crate::capability::CapabilityRecord;
use crate::logging::ModuleLog;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Default capacity of the raw-buffer variant: one page of output.
///
/// The host contract is that one page is enough for a full dump; drivers
/// whose state can exceed it must expect truncation on this read path.
pub const PAGE_SIZE: usize = 4096;

/// Abstract formatted-append destination handed to the dump hook.
///
/// The sink lives for exactly one dump operation; the record must not
/// retain it.
pub trait DiagnosticSink {
    /// Append raw text at the cursor.
    fn append(&mut self, text: &str);

    /// Append formatted text. Formatting happens once, up front, so every
    /// backing implementation sees the same bytes.
    fn append_fmt(&mut self, args: fmt::Arguments<'_>) {
        self.append(&fmt::format(args));
    }
}

/// Structured-sink variant: forwards directly to a host streaming object.
///
/// No size limit is imposed here beyond the host's own streaming mechanism.
pub struct StreamSink<'a, W: fmt::Write> {
    out: &'a mut W,
}

impl<'a, W: fmt::Write> StreamSink<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Self { out }
    }
}

impl<W: fmt::Write> DiagnosticSink for StreamSink<'_, W> {
    fn append(&mut self, text: &str) {
        // Streaming failures are the host's concern, same as a failing log
        // sink; the dump hook has no error channel to report them on.
        let _ = self.out.write_str(text);
    }
}

/// Raw-buffer variant: bounded capacity with an explicit cursor.
///
/// Writes that would overflow are truncated at a char boundary and flagged
/// via [`truncated`](PageBuffer::truncated) instead of running past the end.
pub struct PageBuffer {
    buf: String,
    capacity: usize,
    truncated: bool,
}

impl PageBuffer {
    /// One-page buffer, the host glue's standard size.
    pub fn new() -> Self {
        Self::with_capacity(PAGE_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::new(),
            capacity,
            truncated: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Cursor position: bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// True when an append did not fit and output was cut short.
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

impl Default for PageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for PageBuffer {
    fn append(&mut self, text: &str) {
        let remaining = self.capacity - self.buf.len();
        if text.len() <= remaining {
            self.buf.push_str(text);
            return;
        }
        let mut end = remaining;
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        self.buf.push_str(&text[..end]);
        self.truncated = true;
    }
}

/// The diagnostic virtual file bound to the active record.
///
/// Created only when the record declares a `diagnostic_dump` hook. The host
/// routes the published file's operations to these handlers and serializes
/// them per session; the shim adds no locking of its own.
pub struct DiagnosticFile {
    record: Arc<CapabilityRecord>,
    log: ModuleLog,
}

impl DiagnosticFile {
    pub(crate) fn new(record: Arc<CapabilityRecord>, log: ModuleLog) -> Self {
        Self { record, log }
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Opening the diagnostic file opens the device's logical session.
    pub fn open(&self) {
        if let Some(open) = &self.record.open {
            open();
        }
    }

    /// Run the record's dump hook against the given sink.
    pub fn dump(&self, sink: &mut dyn DiagnosticSink) {
        if let Some(dump) = &self.record.diagnostic_dump {
            dump(sink);
        }
    }

    /// Interpret a written payload as a control command.
    ///
    /// `"d<digit>"` (first two bytes significant) sets the debug flag to the
    /// digit's value; anything else is accepted and ignored. The returned
    /// count always equals the payload length.
    pub fn write(&self, payload: &[u8]) -> usize {
        if payload.len() >= 2 && payload[0] == b'd' && payload[1].is_ascii_digit() {
            let level = payload[1] - b'0';
            debug!("{}: debug level set to {}", self.record.name, level);
            self.log.debug_flag().set(level);
            self.log
                .emit_debug(format_args!("debugging enabled (level {level})"));
        }
        payload.len()
    }

    pub fn release(&self) {
        if let Some(close) = &self.record.close {
            close();
        }
    }
}
