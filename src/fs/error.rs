use derive_more::{Display, Error};

use crate::error::RawOsError;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("destination already exists")]
pub struct AlreadyExistsError;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("no-replace rename is not supported by this platform or file system")]
pub struct UnsupportedError(#[error(not(source))] pub RawOsError);

impl UnsupportedError {
    /// The error number that revealed the missing support. A capability already known to be missing
    /// reports `ENOSYS`, as the kernel did when it was first found out.
    pub const fn code(&self) -> RawOsError {
        self.0
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("source and destination are on different file systems")]
pub struct CrossDeviceError;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("path contains a NUL byte or doesn't name a file")]
pub struct InvalidPathError;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("every generated temporary name was already taken")]
pub struct TempCollisionError;
