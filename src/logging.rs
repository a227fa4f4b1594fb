//! Prefix-tagged, debug-gated log emission
//!
//! Every contractual log line has the shape `"<name> (<task-id>): <message>"`
//! and goes to the host's raw log sink. Formatting work is bounded: lines
//! longer than [`MAX_LINE_LEN`] are truncated, so these helpers are safe to
//! call from any context that may invoke the dispatcher or diagnostic
//! handlers. Callers must keep individual messages within the bound or
//! accept truncation.

use crate::host::Host;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Upper bound on one formatted log line, including the prefix.
pub const MAX_LINE_LEN: usize = 256;

/// Process-wide debug level, set only through the diagnostic file's write
/// path and read only by [`ModuleLog::emit_debug`]. A single small-integer
/// cell; relaxed atomics suffice since the host serializes writers.
#[derive(Debug, Default)]
pub struct DebugFlag(AtomicU8);

impl DebugFlag {
    pub fn new() -> Self {
        Self(AtomicU8::new(0))
    }

    pub fn set(&self, level: u8) {
        self.0.store(level, Ordering::Relaxed);
    }

    pub fn get(&self) -> u8 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn enabled(&self) -> bool {
        self.get() != 0
    }
}

/// Log emitter bound to the active capability record's name.
#[derive(Clone)]
pub struct ModuleLog {
    host: Arc<dyn Host>,
    name: Arc<str>,
    debug: Arc<DebugFlag>,
}

impl ModuleLog {
    pub fn new(host: Arc<dyn Host>, name: &str, debug: Arc<DebugFlag>) -> Self {
        Self {
            host,
            name: Arc::from(name),
            debug,
        }
    }

    /// Format and emit one line unconditionally. Side effect only; a
    /// failing sink is not reported.
    pub fn emit(&self, args: fmt::Arguments<'_>) {
        let mut line = format!("{} ({}): {}", self.name, current_task_id(), args);
        if line.len() > MAX_LINE_LEN {
            let mut end = MAX_LINE_LEN;
            while !line.is_char_boundary(end) {
                end -= 1;
            }
            line.truncate(end);
        }
        self.host.log_line(&line);
    }

    /// Emit only when the debug flag is non-zero.
    pub fn emit_debug(&self, args: fmt::Arguments<'_>) {
        if self.debug.enabled() {
            self.emit(args);
        }
    }

    pub fn debug_flag(&self) -> &Arc<DebugFlag> {
        &self.debug
    }
}

#[cfg(target_os = "linux")]
fn current_task_id() -> i64 {
    // Kernel task id of the calling thread, matching the original
    // "<name> (<pid>): " prefix.
    unsafe { libc::gettid() as i64 }
}

#[cfg(not(target_os = "linux"))]
fn current_task_id() -> i64 {
    std::process::id() as i64
}
