use std::ffi::CStr;

use crate::error::RawOsError;
use crate::util::fs::err_no;

pub use platform::{NATIVE_RENAME, rename_noreplace};

/// `renameat2(AT_FDCWD, from, AT_FDCWD, to, RENAME_NOREPLACE)`. The syscall number is only known
/// for some architectures.
#[cfg(all(
    any(target_os = "linux", target_os = "android"),
    any(
        target_arch = "x86_64",
        target_arch = "x86",
        target_arch = "aarch64",
        target_arch = "arm",
        target_arch = "riscv64",
    ),
))]
mod platform {
    use std::ffi::CStr;

    use libc::{AT_FDCWD, c_uint};

    use crate::error::RawOsError;
    use crate::fs::rename::RenameCapability;
    use crate::util::fs::err_no;

    // Older libc headers may not define it.
    const RENAME_NOREPLACE: c_uint = 1 << 0;

    pub const NATIVE_RENAME: RenameCapability = RenameCapability::RenameAt2;

    pub fn rename_noreplace(from: &CStr, to: &CStr) -> Result<(), RawOsError> {
        // SAFETY: Both paths are NUL-terminated and outlive the call.
        match unsafe {
            libc::syscall(
                libc::SYS_renameat2,
                AT_FDCWD,
                from.as_ptr(),
                AT_FDCWD,
                to.as_ptr(),
                RENAME_NOREPLACE,
            )
        } {
            -1 => Err(err_no()),
            _ => Ok(()),
        }
    }
}

/// `renamex_np(from, to, RENAME_EXCL)`.
#[cfg(target_vendor = "apple")]
mod platform {
    use std::ffi::CStr;

    use crate::error::RawOsError;
    use crate::fs::rename::RenameCapability;
    use crate::util::fs::err_no;

    pub const NATIVE_RENAME: RenameCapability = RenameCapability::RenameExcl;

    pub fn rename_noreplace(from: &CStr, to: &CStr) -> Result<(), RawOsError> {
        // SAFETY: Both paths are NUL-terminated and outlive the call.
        match unsafe { libc::renamex_np(from.as_ptr(), to.as_ptr(), libc::RENAME_EXCL) } {
            -1 => Err(err_no()),
            _ => Ok(()),
        }
    }
}

/// Everything else reports the primitive as missing, exactly as an old kernel would.
#[cfg(not(any(
    all(
        any(target_os = "linux", target_os = "android"),
        any(
            target_arch = "x86_64",
            target_arch = "x86",
            target_arch = "aarch64",
            target_arch = "arm",
            target_arch = "riscv64",
        ),
    ),
    target_vendor = "apple",
)))]
mod platform {
    use std::ffi::CStr;

    use crate::error::RawOsError;
    use crate::fs::rename::RenameCapability;

    pub const NATIVE_RENAME: RenameCapability = RenameCapability::Unsupported;

    pub fn rename_noreplace(_from: &CStr, _to: &CStr) -> Result<(), RawOsError> {
        Err(libc::ENOSYS)
    }
}

pub fn link(from: &CStr, to: &CStr) -> Result<(), RawOsError> {
    // SAFETY: Both paths are NUL-terminated and outlive the call.
    match unsafe { libc::link(from.as_ptr(), to.as_ptr()) } {
        -1 => Err(err_no()),
        _ => Ok(()),
    }
}

pub fn unlink(path: &CStr) -> Result<(), RawOsError> {
    // SAFETY: path is NUL-terminated and outlives the call.
    match unsafe { libc::unlink(path.as_ptr()) } {
        -1 => Err(err_no()),
        _ => Ok(()),
    }
}
