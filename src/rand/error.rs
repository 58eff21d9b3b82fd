use std::io;

use derive_more::{Display, Error, From, IsVariant};

use crate::error::{OsError, RawOsError};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("no secure source of randomness is available")]
pub struct UnavailableError;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, IsVariant)]
pub enum RandomError {
    Unavailable(UnavailableError),
    IOFailure(OsError),
}

impl RandomError {
    /// The error number reported by the OS, if there was one.
    pub const fn raw_os_error(&self) -> Option<RawOsError> {
        match self {
            RandomError::Unavailable(_) => None,
            RandomError::IOFailure(e) => Some(e.code()),
        }
    }
}

impl From<RandomError> for io::Error {
    fn from(value: RandomError) -> Self {
        match value {
            RandomError::Unavailable(e) => io::Error::new(io::ErrorKind::Unsupported, e),
            RandomError::IOFailure(e) => e.into(),
        }
    }
}
