//! Capability record: the contract a concrete driver supplies
//!
//! A driver hands the shim exactly one `CapabilityRecord` at load time. The
//! record is immutable for the module's resident lifetime and shared by
//! reference with every dispatcher and diagnostic handler; it is never
//! mutated by the framework. Each hook is independently optional — call
//! sites branch on presence and never invoke an absent hook.

use crate::diag::DiagnosticSink;
use crate::Result;
use std::os::unix::io::RawFd;

/// Driver lifecycle init hook, run once after device registration.
pub type InitHook = Box<dyn Fn() -> Result<()> + Send + Sync>;
/// Driver lifecycle cleanup hook, run once at unload.
pub type CleanupHook = Box<dyn Fn() + Send + Sync>;
/// Session open/close hook.
pub type SessionHook = Box<dyn Fn() + Send + Sync>;
/// Device control hook: `(cmd, arg) -> result`.
pub type IoctlHook = Box<dyn Fn(u32, u64) -> Result<i64> + Send + Sync>;
/// Memory-map hook: `(fd, region) -> result`.
pub type MmapHook = Box<dyn Fn(RawFd, &mut MapRegion) -> Result<()> + Send + Sync>;
/// Diagnostic dump hook; writes free-form text into the sink.
pub type DumpHook = Box<dyn Fn(&mut dyn DiagnosticSink) + Send + Sync>;

/// Requested memory mapping, as described by the host.
#[derive(Debug, Clone, Default)]
pub struct MapRegion {
    pub start: u64,
    pub len: u64,
    pub offset: u64,
}

/// Identity and optional callbacks for one driver.
///
/// At most one record is active in the process at any time; the lifecycle
/// manager enforces that by refusing a second load while one is bound.
pub struct CapabilityRecord {
    /// Device node and diagnostic file name; must be non-empty and unique
    /// within the host's namespace.
    pub name: String,
    /// Device-class identifier; `0` means the host assigns one dynamically.
    pub major: u32,
    pub init: Option<InitHook>,
    pub cleanup: Option<CleanupHook>,
    pub open: Option<SessionHook>,
    pub close: Option<SessionHook>,
    pub ioctl: Option<IoctlHook>,
    pub mmap: Option<MmapHook>,
    pub diagnostic_dump: Option<DumpHook>,
}

impl CapabilityRecord {
    /// Create a record with identity only; hooks default to absent.
    pub fn new(name: impl Into<String>, major: u32) -> Self {
        Self {
            name: name.into(),
            major,
            init: None,
            cleanup: None,
            open: None,
            close: None,
            ioctl: None,
            mmap: None,
            diagnostic_dump: None,
        }
    }
}

impl std::fmt::Debug for CapabilityRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRecord")
            .field("name", &self.name)
            .field("major", &self.major)
            .field("init", &self.init.is_some())
            .field("cleanup", &self.cleanup.is_some())
            .field("open", &self.open.is_some())
            .field("close", &self.close.is_some())
            .field("ioctl", &self.ioctl.is_some())
            .field("mmap", &self.mmap.is_some())
            .field("diagnostic_dump", &self.diagnostic_dump.is_some())
            .finish()
    }
}
