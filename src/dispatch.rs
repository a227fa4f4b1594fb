//! Device operation dispatcher
//!
//! Maps the host's generic device operations onto the active capability
//! record's optional hooks. Absence of an optional hook is a legitimate
//! silent default, not an error — except for ioctl and mmap, where "not
//! implemented" is a meaningful result the caller can branch on.

use crate::capability::{CapabilityRecord, MapRegion};
use crate::host::Host;
use crate::logging::ModuleLog;
use crate::{Error, Result};
use std::os::unix::io::RawFd;
use std::sync::Arc;
use tracing::debug;

/// Forwards generic device operations to the active record.
///
/// The record is read-only after load and the dispatcher holds no mutable
/// state, so concurrent callers need no locking here; drivers whose hooks
/// mutate shared state supply their own synchronization.
pub struct DeviceDispatcher {
    record: Arc<CapabilityRecord>,
    host: Arc<dyn Host>,
    log: ModuleLog,
}

impl DeviceDispatcher {
    pub(crate) fn new(record: Arc<CapabilityRecord>, host: Arc<dyn Host>, log: ModuleLog) -> Self {
        Self { record, host, log }
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Open a device session. Always succeeds.
    pub fn open(&self) {
        self.log.emit_debug(format_args!("open"));
        if let Some(open) = &self.record.open {
            open();
        }
    }

    /// Close a device session. Always succeeds.
    pub fn release(&self) {
        self.log.emit_debug(format_args!("release"));
        if let Some(close) = &self.record.close {
            close();
        }
    }

    /// Device control. Returns the hook's result, or `NotSupported` when
    /// the driver implements none.
    pub fn ioctl(&self, cmd: u32, arg: u64) -> Result<i64> {
        debug!("{}: ioctl(cmd={}, arg={})", self.record.name, cmd, arg);
        match &self.record.ioctl {
            Some(ioctl) => ioctl(cmd, arg),
            None => Err(Error::NotSupported),
        }
    }

    /// Compatibility ioctl entry point; semantics identical to [`ioctl`].
    ///
    /// [`ioctl`]: DeviceDispatcher::ioctl
    pub fn compat_ioctl(&self, cmd: u32, arg: u64) -> Result<i64> {
        self.ioctl(cmd, arg)
    }

    /// Map device memory. Without a driver hook this falls back to the
    /// host's bus-specific remapping, which denies by default.
    pub fn mmap(&self, fd: RawFd, region: &mut MapRegion) -> Result<()> {
        debug!(
            "{}: mmap(start={:#x}, len={:#x}, offset={:#x})",
            self.record.name, region.start, region.len, region.offset
        );
        match &self.record.mmap {
            Some(mmap) => mmap(fd, region),
            None => self.host.map_region(fd, region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::DebugFlag;
    use crate::test_support::RecordingHost;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn dispatcher(record: CapabilityRecord) -> (DeviceDispatcher, Arc<RecordingHost>) {
        let host = Arc::new(RecordingHost::new());
        let log = ModuleLog::new(
            host.clone() as Arc<dyn Host>,
            &record.name,
            Arc::new(DebugFlag::new()),
        );
        (
            DeviceDispatcher::new(Arc::new(record), host.clone(), log),
            host,
        )
    }

    #[test]
    fn test_open_release_succeed_without_hooks() {
        let (dev, _host) = dispatcher(CapabilityRecord::new("testdrv", 0));
        dev.open();
        dev.release();
    }

    #[test]
    fn test_open_release_invoke_hooks() {
        let opens = Arc::new(AtomicUsize::new(0));
        let closes = Arc::new(AtomicUsize::new(0));

        let mut record = CapabilityRecord::new("testdrv", 0);
        let o = opens.clone();
        record.open = Some(Box::new(move || {
            o.fetch_add(1, Ordering::SeqCst);
        }));
        let c = closes.clone();
        record.close = Some(Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        let (dev, _host) = dispatcher(record);
        dev.open();
        dev.open();
        dev.release();
        assert_eq!(opens.load(Ordering::SeqCst), 2);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ioctl_without_hook_is_not_supported() {
        let (dev, _host) = dispatcher(CapabilityRecord::new("testdrv", 0));
        assert!(matches!(dev.ioctl(1, 2), Err(Error::NotSupported)));
        assert!(matches!(dev.compat_ioctl(1, 2), Err(Error::NotSupported)));
    }

    #[test]
    fn test_ioctl_forwards_to_hook() {
        let mut record = CapabilityRecord::new("testdrv", 0);
        record.ioctl = Some(Box::new(|cmd, arg| Ok((cmd as i64) + (arg as i64))));
        let (dev, _host) = dispatcher(record);

        assert_eq!(dev.ioctl(7, 42).unwrap(), 49);
        assert_eq!(dev.compat_ioctl(7, 42).unwrap(), 49);
    }

    #[test]
    fn test_mmap_without_hook_uses_host_fallback() {
        let (dev, _host) = dispatcher(CapabilityRecord::new("testdrv", 0));
        let mut region = MapRegion {
            start: 0x1000,
            len: 0x2000,
            offset: 0,
        };
        // RecordingHost leaves the default fallback in place.
        assert!(matches!(
            dev.mmap(-1, &mut region),
            Err(Error::PermissionDenied)
        ));
    }

    #[test]
    fn test_mmap_forwards_to_hook() {
        let mut record = CapabilityRecord::new("testdrv", 0);
        record.mmap = Some(Box::new(|_fd, region| {
            region.start = 0xdead_0000;
            Ok(())
        }));
        let (dev, _host) = dispatcher(record);

        let mut region = MapRegion::default();
        dev.mmap(3, &mut region).unwrap();
        assert_eq!(region.start, 0xdead_0000);
    }
}
