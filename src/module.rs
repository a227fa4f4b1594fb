//! Registration and lifecycle management
//!
//! Binds exactly one capability record at a time: obtain the record from
//! the driver's factory, register the device node, run the driver's init,
//! publish the diagnostic file, and on unload take everything down in
//! strictly reverse order. Partial failures roll back what was already
//! done so no inconsistent state survives a failed load.

use crate::capability::CapabilityRecord;
use crate::diag::DiagnosticFile;
use crate::dispatch::DeviceDispatcher;
use crate::host::Host;
use crate::logging::{DebugFlag, ModuleLog};
use crate::{Error, Result};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

struct ActiveDriver {
    record: Arc<CapabilityRecord>,
    major: u32,
    device: Arc<DeviceDispatcher>,
    diag: Option<Arc<DiagnosticFile>>,
}

/// The process-wide driver module: holds the single active capability
/// record and orchestrates load/unload against the host.
///
/// The host serializes load against unload; the mutex around the active
/// binding additionally lets the manager refuse a second load while one
/// record is bound, making the singleton a construction-time guarantee
/// rather than a convention.
pub struct DriverModule {
    host: Arc<dyn Host>,
    active: Mutex<Option<ActiveDriver>>,
}

impl DriverModule {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            host,
            active: Mutex::new(None),
        }
    }

    /// Load a driver: pull its capability record from `factory`, register
    /// the device node, run `init`, and publish the diagnostic file.
    ///
    /// Returns the bound major (host-assigned when the record requested 0).
    /// On any fatal failure every step already taken is rolled back and no
    /// state survives. Diagnostic-file creation failure alone is non-fatal:
    /// the module stays loaded without diagnostics.
    pub fn load<F>(&self, factory: F) -> Result<u32>
    where
        F: FnOnce() -> Option<CapabilityRecord>,
    {
        let mut active = self.active.lock().unwrap();
        if active.is_some() {
            return Err(Error::AlreadyLoaded);
        }

        let mut record = factory().ok_or(Error::NoDevice)?;
        if record.name.is_empty() {
            return Err(Error::InvalidRecord("empty name".into()));
        }

        let major = match self.host.register_device(record.major, &record.name) {
            Ok(major) => major,
            Err(err) => {
                warn!("{}: can't get major {}: {}", record.name, record.major, err);
                return Err(err);
            }
        };
        record.major = major;
        let record = Arc::new(record);

        let debug = Arc::new(DebugFlag::new());
        let log = ModuleLog::new(self.host.clone(), &record.name, debug);

        if let Some(init) = &record.init {
            if let Err(err) = init() {
                warn!("{}: driver init failed: {}", record.name, err);
                self.host.unregister_device(major, &record.name);
                return Err(err);
            }
        }

        let diag = if record.diagnostic_dump.is_some() {
            match self.host.publish_diagnostic(&record.name) {
                Ok(()) => Some(Arc::new(DiagnosticFile::new(record.clone(), log.clone()))),
                Err(err) => {
                    // Diagnostics are auxiliary; the module loads without them.
                    warn!("{}: diagnostic file creation failed: {}", record.name, err);
                    None
                }
            }
        } else {
            None
        };

        let device = Arc::new(DeviceDispatcher::new(
            record.clone(),
            self.host.clone(),
            log,
        ));

        info!("{}: loaded with major {}", record.name, major);
        *active = Some(ActiveDriver {
            record,
            major,
            device,
            diag,
        });
        Ok(major)
    }

    /// Unload the active driver, reversing the load sequence: driver
    /// cleanup, diagnostic file removal, device-node unregistration.
    ///
    /// A no-op when nothing is loaded; every step is best-effort and no
    /// failure is exposed to the caller.
    pub fn unload(&self) {
        let mut active = self.active.lock().unwrap();
        let Some(driver) = active.take() else {
            return;
        };

        if let Some(cleanup) = &driver.record.cleanup {
            cleanup();
        }
        if driver.diag.is_some() {
            self.host.remove_diagnostic(&driver.record.name);
        }
        self.host.unregister_device(driver.major, &driver.record.name);
        info!("{}: unloaded", driver.record.name);
    }

    pub fn is_loaded(&self) -> bool {
        self.active.lock().unwrap().is_some()
    }

    /// Major the active record is bound under, if any.
    pub fn major(&self) -> Option<u32> {
        self.active.lock().unwrap().as_ref().map(|d| d.major)
    }

    /// Dispatcher handle for host-invoked device operations.
    pub fn device(&self) -> Option<Arc<DeviceDispatcher>> {
        self.active.lock().unwrap().as_ref().map(|d| d.device.clone())
    }

    /// Diagnostic file handle, present only when the record declared a
    /// dump hook and publication succeeded.
    pub fn diagnostic(&self) -> Option<Arc<DiagnosticFile>> {
        self.active.lock().unwrap().as_ref().and_then(|d| d.diag.clone())
    }
}
