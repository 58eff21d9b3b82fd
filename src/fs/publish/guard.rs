use std::ffi::CString;
use std::path::{Path, PathBuf};

use log::warn;

use crate::fs::syscall;

/// Removes a temporary file on drop unless disarmed, so that every early return cleans up.
pub(crate) struct TempGuard {
    path: PathBuf,
    c_path: CString,
    armed: bool,
}

impl TempGuard {
    pub const fn new(path: PathBuf, c_path: CString) -> TempGuard {
        TempGuard { path, c_path, armed: true }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Call once the temporary no longer exists under its own name.
    pub const fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = syscall::unlink(&self.c_path) {
            // Nothing can be returned from here and the original error matters more.
            warn!("failed to remove temporary file {} (os error {e})", self.path.display());
        }
    }
}
