use std::path::{Path, PathBuf};

use libc::{EEXIST, EINVAL, O_CREAT, O_DIRECTORY, O_EXCL, O_RDONLY, O_WRONLY, c_uint};
use log::{debug, trace};

use super::guard::TempGuard;
use super::{PublishError, PublishOptions, temp_path_for};
use crate::error::OsError;
use crate::fs::error::{InvalidPathError, TempCollisionError};
use crate::fs::rename::{self, NoReplaceRename, RenameCapability, RenameError, SystemRename};
use crate::rand::{RandomSource, SystemRandom};
use crate::util::fd::Fd;
use crate::util::fs::to_c_path;

/// Publishes files through a no-replace rename, with a random source for naming temporaries.
///
/// Both are swappable so that the workflow can be exercised against platforms it isn't running
/// on; [`Publisher::new`] uses the real ones.
#[derive(Debug, Clone, Default)]
pub struct Publisher<R: NoReplaceRename = SystemRename, S: RandomSource = SystemRandom> {
    rename: R,
    random: S,
    options: PublishOptions,
}

impl Publisher {
    pub fn new() -> Publisher {
        Publisher::default()
    }
}

impl<R: NoReplaceRename, S: RandomSource> Publisher<R, S> {
    pub fn with_backends(rename: R, random: S) -> Publisher<R, S> {
        Publisher {
            rename,
            random,
            options: PublishOptions::new(),
        }
    }

    pub fn with_options(mut self, options: PublishOptions) -> Publisher<R, S> {
        self.options = options;
        self
    }

    pub const fn options(&self) -> &PublishOptions {
        &self.options
    }

    pub const fn options_mut(&mut self) -> &mut PublishOptions {
        &mut self.options
    }

    pub fn capability(&self) -> RenameCapability {
        self.rename.capability()
    }

    /// Writes `contents` to `dest`, provided nothing exists there yet, and returns the published
    /// path.
    ///
    /// Readers of `dest` see either nothing or the complete content. If another file (or another
    /// publisher) got there first, the result is an error for which
    /// [`PublishError::is_already_exists`] holds and `dest` is left as it was. The temporary file
    /// is removed whenever the publish fails. The one failure that leaves `dest` changed is
    /// [`PublishError::DirSync`], which comes after the rename.
    pub fn publish<P: AsRef<Path>>(&self, dest: P, contents: &[u8]) -> Result<PathBuf, PublishError> {
        let dest = dest.as_ref();
        let (mut guard, file) = self.create_temp(dest)?;
        trace!("writing {} bytes to {}", contents.len(), guard.path().display());

        file.write_all(contents).map_err(|e| PublishError::Write(OsError(e)))?;
        if self.options.durable {
            file.sync().map_err(|e| PublishError::Sync(OsError(e)))?;
        }
        // Some file systems only report failed writes on close.
        file.close().map_err(|e| PublishError::Write(OsError(e)))?;

        self.move_into_place(&mut guard, dest)?;

        if self.options.durable {
            sync_parent(dest).map_err(PublishError::DirSync)?;
        }
        debug!("published {}", dest.display());
        Ok(dest.to_path_buf())
    }

    fn create_temp(&self, dest: &Path) -> Result<(TempGuard, Fd), PublishError> {
        let mode = c_uint::from(self.options.mode);

        for attempt in 1..=self.options.max_attempts {
            let suffix = self.random.random_bytes(self.options.suffix_len)?;
            let path = temp_path_for(dest, &suffix)?;
            let c_path = to_c_path(&path).ok_or(InvalidPathError)?;

            match Fd::open(&c_path, O_WRONLY | O_CREAT | O_EXCL, mode) {
                Ok(file) => return Ok((TempGuard::new(path, c_path), file)),
                // Someone else's file; try another name rather than touching it.
                Err(EEXIST) => trace!("temporary {} taken on attempt {attempt}", path.display()),
                Err(e) => return Err(PublishError::CreateTemp(OsError(e))),
            }
        }
        Err(TempCollisionError.into())
    }

    fn move_into_place(&self, guard: &mut TempGuard, dest: &Path) -> Result<(), PublishError> {
        match self.rename.rename_noreplace(guard.path(), dest) {
            Ok(()) => {
                guard.disarm();
                Ok(())
            },
            Err(RenameError::Unsupported(_)) if self.options.fallback.is_hard_link() => {
                debug!("no-replace rename unsupported, linking {} instead", dest.display());
                // The guard stays armed and removes the temporary name afterwards.
                Ok(rename::link_noreplace(guard.path(), dest)?)
            },
            Err(e) => {
                trace!("rename to {} refused: {e}", dest.display());
                Err(e.into())
            },
        }
    }
}

fn sync_parent(dest: &Path) -> Result<(), OsError> {
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A prefix of a path that already converted can't hold a NUL.
    let c_parent = to_c_path(parent).ok_or(OsError(EINVAL))?;
    let dir = Fd::open(&c_parent, O_RDONLY | O_DIRECTORY, 0).map_err(OsError)?;

    match dir.sync() {
        // Some file systems can't sync directories at all.
        Ok(()) | Err(EINVAL) => Ok(()),
        Err(e) => Err(OsError(e)),
    }
}

/// Publishes `contents` at `dest` with the system backends and default options.
pub fn publish<P: AsRef<Path>>(dest: P, contents: &[u8]) -> Result<PathBuf, PublishError> {
    Publisher::new().publish(dest, contents)
}
