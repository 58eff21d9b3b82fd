use std::fmt::{self, Debug, Formatter};

use derive_more::IsVariant;

use crate::util::fmt::DebugRaw;

/// What to do when the platform has no no-replace rename.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, IsVariant)]
pub enum Fallback {
    /// Report [`Unsupported`](crate::fs::RenameError::Unsupported) and leave the choice to the
    /// caller.
    #[default]
    Refuse,
    /// Hard-link the temporary at the destination and then unlink it. `link` also refuses to
    /// replace anything, but the file can be seen under both names for a moment and file systems
    /// without hard links still report `Unsupported`.
    HardLink,
}

/// A builder for the knobs of a [`Publisher`](super::Publisher), with logical defaults.
#[derive(Clone, PartialEq, Eq)]
pub struct PublishOptions {
    pub(crate) mode: u16,
    pub(crate) durable: bool,
    pub(crate) suffix_len: usize,
    pub(crate) max_attempts: u32,
    pub(crate) fallback: Fallback,
}

impl PublishOptions {
    pub const DEFAULT_MODE: u16 = 0o644;
    pub const DEFAULT_SUFFIX_LEN: usize = 8;
    pub const MAX_SUFFIX_LEN: usize = 32;
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

    pub const fn new() -> PublishOptions {
        PublishOptions {
            mode: PublishOptions::DEFAULT_MODE,
            durable: true,
            suffix_len: PublishOptions::DEFAULT_SUFFIX_LEN,
            max_attempts: PublishOptions::DEFAULT_MAX_ATTEMPTS,
            fallback: Fallback::Refuse,
        }
    }

    /// Permission bits for the published file, before the process umask applies.
    pub const fn mode(&mut self, value: u16) -> &mut Self {
        self.mode = value & 0o7777;
        self
    }

    /// Whether to `fsync` the content before the rename and the parent directory after it.
    pub const fn durable(&mut self, value: bool) -> &mut Self {
        self.durable = value;
        self
    }

    /// How many random bytes go into a temporary name, between 1 and [`Self::MAX_SUFFIX_LEN`].
    pub const fn suffix_len(&mut self, value: usize) -> &mut Self {
        self.suffix_len = if value == 0 {
            1
        } else if value > PublishOptions::MAX_SUFFIX_LEN {
            PublishOptions::MAX_SUFFIX_LEN
        } else {
            value
        };
        self
    }

    /// How many temporary names to try before giving up with
    /// [`TempCollision`](super::PublishError::TempCollision). At least one is always tried.
    pub const fn max_attempts(&mut self, value: u32) -> &mut Self {
        self.max_attempts = if value == 0 { 1 } else { value };
        self
    }

    pub const fn fallback(&mut self, value: Fallback) -> &mut Self {
        self.fallback = value;
        self
    }
}

impl Default for PublishOptions {
    fn default() -> Self {
        PublishOptions::new()
    }
}

impl Debug for PublishOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishOptions")
            .field("mode", &DebugRaw(format!("0o{:o}", self.mode)))
            .field("durable", &self.durable)
            .field("suffix_len", &self.suffix_len)
            .field("max_attempts", &self.max_attempts)
            .field("fallback", &self.fallback)
            .finish()
    }
}
