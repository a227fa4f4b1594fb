//! Error types for the driver-module shim

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no capability record available")]
    NoDevice,

    #[error("a capability record is already active")]
    AlreadyLoaded,

    #[error("invalid capability record: {0}")]
    InvalidRecord(String),

    #[error("device registration failed: {0}")]
    Registration(String),

    #[error("driver init failed: {0}")]
    Init(String),

    #[error("operation not supported")]
    NotSupported,

    #[error("permission denied")]
    PermissionDenied,

    #[error("diagnostic file error: {0}")]
    Diagnostic(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Negative status code for the host's module-load pass/fail contract.
    pub fn errno(&self) -> i32 {
        match self {
            Error::NoDevice => -libc::ENODEV,
            Error::AlreadyLoaded => -libc::EEXIST,
            Error::InvalidRecord(_) => -libc::EINVAL,
            Error::Registration(_) => -libc::EBUSY,
            Error::Init(_) => -libc::EIO,
            Error::NotSupported => -libc::ENOTTY,
            Error::PermissionDenied => -libc::EPERM,
            Error::Diagnostic(_) => -libc::EIO,
            Error::Io(_) => -libc::EIO,
        }
    }
}
