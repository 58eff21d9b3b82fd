use std::io;

use derive_more::{Display, Error, IsVariant};

use crate::error::{OsError, RawOsError};
use crate::fs::error::{InvalidPathError, TempCollisionError};
use crate::fs::rename::RenameError;
use crate::rand::RandomError;

/// Everything that can stop a publish, tagged with the step that failed.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error, IsVariant)]
pub enum PublishError {
    #[display("failed to name temporary file: {_0}")]
    Random(RandomError),
    InvalidPath(InvalidPathError),
    TempCollision(TempCollisionError),
    #[display("failed to create temporary file: {_0}")]
    CreateTemp(OsError),
    #[display("failed to write temporary file: {_0}")]
    Write(OsError),
    #[display("failed to sync temporary file: {_0}")]
    Sync(OsError),
    #[display("failed to move temporary file into place: {_0}")]
    Rename(RenameError),
    /// The content is already at the destination, but the directory entry may not survive a crash.
    /// Publishing again would only find the destination taken.
    #[display("published, but failed to sync the directory: {_0}")]
    DirSync(OsError),
}

impl PublishError {
    /// Whether the destination was already taken, by an earlier file or a concurrent publisher.
    pub const fn is_already_exists(&self) -> bool {
        matches!(self, PublishError::Rename(RenameError::AlreadyExists(_)))
    }

    /// Whether the platform lacks a no-replace rename (and no fallback was allowed).
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, PublishError::Rename(RenameError::Unsupported(_)))
    }

    /// Whether `dest` already holds the new content despite the error.
    pub const fn is_published(&self) -> bool {
        matches!(self, PublishError::DirSync(_))
    }

    pub const fn raw_os_error(&self) -> Option<RawOsError> {
        match self {
            PublishError::Random(e) => e.raw_os_error(),
            PublishError::CreateTemp(e)
            | PublishError::Write(e)
            | PublishError::Sync(e)
            | PublishError::DirSync(e) => Some(e.code()),
            PublishError::Rename(e) => e.raw_os_error(),
            PublishError::InvalidPath(_) | PublishError::TempCollision(_) => None,
        }
    }
}

impl From<RandomError> for PublishError {
    fn from(value: RandomError) -> Self {
        PublishError::Random(value)
    }
}

impl From<InvalidPathError> for PublishError {
    fn from(value: InvalidPathError) -> Self {
        PublishError::InvalidPath(value)
    }
}

impl From<TempCollisionError> for PublishError {
    fn from(value: TempCollisionError) -> Self {
        PublishError::TempCollision(value)
    }
}

impl From<RenameError> for PublishError {
    fn from(value: RenameError) -> Self {
        PublishError::Rename(value)
    }
}

impl From<PublishError> for io::Error {
    fn from(value: PublishError) -> Self {
        match value {
            PublishError::Random(e) => e.into(),
            PublishError::InvalidPath(e) => io::Error::new(io::ErrorKind::InvalidInput, e),
            PublishError::TempCollision(e) => io::Error::new(io::ErrorKind::AlreadyExists, e),
            PublishError::CreateTemp(e)
            | PublishError::Write(e)
            | PublishError::Sync(e)
            | PublishError::DirSync(e) => e.into(),
            PublishError::Rename(e) => e.into(),
        }
    }
}
