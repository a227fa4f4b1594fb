//! Host boundary: the primitives the shim needs from the surrounding OS
//!
//! Everything the framework does ultimately lands on one of these calls.
//! The trait is intentionally narrow — device-node registry, diagnostic
//! file publication, the raw log sink, and the platform mmap fallback.
//! Concurrency, per-session serialization of file operations, and the
//! ordering of load against unload are the host's responsibility.

use crate::capability::MapRegion;
use crate::{Error, Result};
use std::os::unix::io::RawFd;

pub trait Host: Send + Sync {
    /// Register a device node under `(major, name)`.
    ///
    /// A requested major of `0` asks the host to assign one; the bound
    /// major (requested or assigned) is returned.
    fn register_device(&self, major: u32, name: &str) -> Result<u32>;

    /// Remove the device node. Best-effort; never fails.
    fn unregister_device(&self, major: u32, name: &str);

    /// Expose the diagnostic virtual file keyed by `name`. The host routes
    /// the file's open/read/write/release back through the shim's
    /// [`DiagnosticFile`](crate::DiagnosticFile) handlers.
    fn publish_diagnostic(&self, name: &str) -> Result<()>;

    /// Remove the diagnostic file. Best-effort; never fails.
    fn remove_diagnostic(&self, name: &str);

    /// Raw log sink. One call per line; failure to log is not reported.
    fn log_line(&self, line: &str);

    /// Platform mmap fallback, used when the driver supplies no mmap hook.
    /// Bus-specific hosts override this with their local remapping; the
    /// default is the unconfigured case.
    fn map_region(&self, _fd: RawFd, _region: &mut MapRegion) -> Result<()> {
        Err(Error::PermissionDenied)
    }
}
