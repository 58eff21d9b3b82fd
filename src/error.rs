//! Error types shared by every module of the crate.

use std::fmt::{self, Display, Formatter};
use std::io;

use derive_more::Error;
use libc::c_int;

/// The raw error number reported by the OS, exactly as it appeared in `errno`.
pub type RawOsError = c_int;

/// An OS failure that has no more specific meaning to this crate. The error number is kept as is
/// so that it can be inspected or turned back into an [`io::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub struct OsError(#[error(not(source))] pub RawOsError);

impl OsError {
    pub const fn code(&self) -> RawOsError {
        self.0
    }
}

impl Display for OsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", io::Error::from_raw_os_error(self.0))
    }
}

impl From<OsError> for io::Error {
    fn from(value: OsError) -> Self {
        io::Error::from_raw_os_error(value.0)
    }
}
