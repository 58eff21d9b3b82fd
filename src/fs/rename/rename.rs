use std::ffi::CStr;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use derive_more::IsVariant;
use libc::{EEXIST, EFAULT, EINVAL, ENOSYS, ENOTSUP, EOPNOTSUPP, EPERM, EXDEV};

use super::RenameError;
use crate::error::{OsError, RawOsError};
use crate::fs::error::{AlreadyExistsError, CrossDeviceError, InvalidPathError, UnsupportedError};
use crate::fs::syscall;
use crate::util::fs::to_c_path;
use crate::util::panic::{BadAddrPanic, Panic};

/// Which no-replace rename the current process can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum RenameCapability {
    /// `renameat2` with `RENAME_NOREPLACE` (Linux 3.15 and later).
    RenameAt2,
    /// `renamex_np` with `RENAME_EXCL` (Apple platforms).
    RenameExcl,
    /// Neither this build nor the running kernel offers one.
    Unsupported,
}

// Set once the kernel answers ENOSYS, so that later calls don't keep asking.
static KERNEL_LACKS_RENAME: AtomicBool = AtomicBool::new(false);

impl RenameCapability {
    pub fn current() -> RenameCapability {
        RenameCapability::given(&KERNEL_LACKS_RENAME)
    }

    pub(crate) fn given(kernel_lacks_rename: &AtomicBool) -> RenameCapability {
        if kernel_lacks_rename.load(Ordering::Relaxed) {
            RenameCapability::Unsupported
        } else {
            syscall::NATIVE_RENAME
        }
    }
}

/// A rename that refuses to replace an existing destination.
///
/// [`SystemRename`] is the real thing; other implementations exist to stand in for platforms the
/// code isn't currently running on.
pub trait NoReplaceRename {
    fn rename_noreplace(&self, from: &Path, to: &Path) -> Result<(), RenameError>;

    fn capability(&self) -> RenameCapability;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemRename;

impl NoReplaceRename for SystemRename {
    fn rename_noreplace(&self, from: &Path, to: &Path) -> Result<(), RenameError> {
        rename_noreplace(from, to)
    }

    fn capability(&self) -> RenameCapability {
        RenameCapability::current()
    }
}

/// Atomically renames `from` to `to`, failing with
/// [`AlreadyExists`](RenameError::AlreadyExists) instead of replacing anything at `to`.
///
/// Both paths should be on the same file system; otherwise the OS refuses with
/// [`CrossDevice`](RenameError::CrossDevice). When the platform can't do this atomically the result
/// is [`Unsupported`](RenameError::Unsupported), never a silent non-atomic substitute.
///
/// # Panics
/// Panics if the OS reports that a path pointer was invalid, which can only mean memory corruption.
pub fn rename_noreplace<F: AsRef<Path>, T: AsRef<Path>>(from: F, to: T) -> Result<(), RenameError> {
    rename_noreplace_with(
        &KERNEL_LACKS_RENAME,
        from.as_ref(),
        to.as_ref(),
        syscall::rename_noreplace,
    )
}

/// The body of [`rename_noreplace`], with the capability cache and the syscall passed in.
pub(crate) fn rename_noreplace_with<S>(
    kernel_lacks_rename: &AtomicBool,
    from: &Path,
    to: &Path,
    rename: S,
) -> Result<(), RenameError>
where
    S: FnOnce(&CStr, &CStr) -> Result<(), RawOsError>,
{
    let c_from = to_c_path(from).ok_or(InvalidPathError)?;
    let c_to = to_c_path(to).ok_or(InvalidPathError)?;

    if RenameCapability::given(kernel_lacks_rename).is_unsupported() {
        Err(UnsupportedError(ENOSYS))?
    }

    match rename(&c_from, &c_to) {
        Ok(()) => Ok(()),
        Err(ENOSYS) => {
            kernel_lacks_rename.store(true, Ordering::Relaxed);
            Err(UnsupportedError(ENOSYS).into())
        },
        // A directory moved below itself is refused with the same number as an unknown flag.
        Err(EINVAL) if moves_into_itself(from, to) => Err(OsError(EINVAL).into()),
        Err(e) => Err(interpret_error(e)),
    }
}

/// Whether `to` would land inside `from`, which only a directory can contain.
fn moves_into_itself(from: &Path, to: &Path) -> bool {
    let parent = match to.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (fs::canonicalize(from), fs::canonicalize(parent)) {
        (Ok(from), Ok(parent)) => from.is_dir() && parent.starts_with(from),
        _ => false,
    }
}

/// Hard-links `from` at `to`, which also refuses to replace an existing destination.
///
/// Unlike a rename this leaves `from` where it is, so the file is reachable under both names until
/// the caller unlinks `from`. It works on platforms and file systems without a no-replace rename,
/// as long as they support hard links.
///
/// # Panics
/// Panics if the OS reports that a path pointer was invalid, which can only mean memory corruption.
pub fn link_noreplace<F: AsRef<Path>, T: AsRef<Path>>(from: F, to: T) -> Result<(), RenameError> {
    let from = to_c_path(from.as_ref()).ok_or(InvalidPathError)?;
    let to = to_c_path(to.as_ref()).ok_or(InvalidPathError)?;

    syscall::link(&from, &to).map_err(|e| match e {
        // File systems without hard links (FAT, for one) answer EPERM.
        EPERM => UnsupportedError(EPERM).into(),
        e => interpret_error(e),
    })
}

pub(crate) fn interpret_error(code: RawOsError) -> RenameError {
    match code {
        EEXIST =>          AlreadyExistsError.into(),
        // EINVAL is how a file system says it doesn't understand the no-replace flag.
        ENOSYS | EINVAL => UnsupportedError(code).into(),
        e if e == ENOTSUP || e == EOPNOTSUPP => UnsupportedError(e).into(),
        EXDEV =>           CrossDeviceError.into(),
        EFAULT =>          BadAddrPanic.panic(),
        e =>               OsError(e).into(),
    }
}
