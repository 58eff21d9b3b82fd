use std::io;

use derive_more::{Display, Error, From, IsVariant};
use libc::{EEXIST, EXDEV};

use crate::error::{OsError, RawOsError};
use crate::fs::error::*;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, IsVariant)]
pub enum RenameError {
    // EEXIST
    AlreadyExists(AlreadyExistsError),
    // ENOSYS, ENOTSUP, EINVAL (for the flag only)
    Unsupported(UnsupportedError),
    // EXDEV
    CrossDevice(CrossDeviceError),
    // Rejected before reaching the OS.
    InvalidPath(InvalidPathError),
    IOFailure(OsError),
}

impl RenameError {
    /// The error number behind this error, exactly as the OS reported it.
    /// [`InvalidPath`](RenameError::InvalidPath) has none, since it never reaches the OS.
    pub const fn raw_os_error(&self) -> Option<RawOsError> {
        match self {
            RenameError::AlreadyExists(_) => Some(EEXIST),
            RenameError::Unsupported(e) => Some(e.code()),
            RenameError::CrossDevice(_) => Some(EXDEV),
            RenameError::IOFailure(e) => Some(e.code()),
            RenameError::InvalidPath(_) => None,
        }
    }
}

impl From<RenameError> for io::Error {
    fn from(value: RenameError) -> Self {
        match value {
            RenameError::AlreadyExists(_) => io::Error::from_raw_os_error(EEXIST),
            RenameError::Unsupported(e) => io::Error::new(io::ErrorKind::Unsupported, e),
            RenameError::CrossDevice(_) => io::Error::from_raw_os_error(EXDEV),
            RenameError::InvalidPath(e) => io::Error::new(io::ErrorKind::InvalidInput, e),
            RenameError::IOFailure(e) => e.into(),
        }
    }
}
