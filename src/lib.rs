//! Generic driver-module shim
//!
//! This library lets an arbitrary driver implementation attach itself to a
//! host's device-node and diagnostic-file infrastructure without
//! re-implementing that plumbing per driver. The driver supplies a
//! [`CapabilityRecord`] (identity metadata plus a set of independently
//! optional callbacks); the shim registers a device node, wires the generic
//! device operations to the record's callbacks, optionally exposes a
//! diagnostic virtual file, and tears everything down symmetrically on
//! unload.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Concrete driver                            │
//! │        (capability record: init/ioctl/mmap/dump...)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                     CapabilityRecord
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  driver-module-shim                         │
//! │  ┌─────────────┐  ┌──────────────┐  ┌───────────────────┐  │
//! │  │ DriverModule│  │ Device       │  │ DiagnosticFile    │  │
//! │  │ (lifecycle) │  │ Dispatcher   │  │ (dump + debug cmd)│  │
//! │  └─────────────┘  └──────────────┘  └───────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                         Host trait
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │      Host OS (device registry, diag files, log sink)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use driver_module_shim::{CapabilityRecord, DriverModule};
//!
//! let module = DriverModule::new(host);
//! let major = module.load(|| Some(my_record()))?;
//!
//! // Host-invoked device operations go through the dispatcher
//! let device = module.device().unwrap();
//! let answer = device.ioctl(cmd, arg)?;
//!
//! module.unload();
//! ```

pub mod capability;
pub mod diag;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod logging;
pub mod module;

#[cfg(test)]
pub(crate) mod test_support;

pub use capability::{CapabilityRecord, MapRegion};
pub use diag::{DiagnosticFile, DiagnosticSink, PageBuffer, StreamSink};
pub use dispatch::DeviceDispatcher;
pub use error::Error;
pub use host::Host;
pub use logging::{DebugFlag, ModuleLog};
pub use module::DriverModule;

/// Result type for this crate
pub type Result<T> = std::result::Result<T, Error>;
