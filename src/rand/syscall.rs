use std::sync::OnceLock;

use libc::O_RDONLY;
#[cfg(any(target_os = "linux", target_os = "android", target_vendor = "apple"))]
use libc::EFAULT;
#[cfg(any(target_os = "linux", target_os = "android"))]
use libc::c_void;

use super::{GetRandomFlags, RandomError};
use crate::error::{OsError, RawOsError};
use crate::util::fd::Fd;
#[cfg(any(target_os = "linux", target_os = "android", target_vendor = "apple"))]
use crate::util::fs::err_no;
#[cfg(any(target_os = "linux", target_os = "android", target_vendor = "apple"))]
use crate::util::panic::{BadAddrPanic, Panic};

/// `getentropy` refuses requests larger than this.
#[cfg(target_vendor = "apple")]
const GETENTROPY_MAX: usize = 256;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn getrandom(buf: &mut [u8], flags: GetRandomFlags) -> Result<usize, RandomError> {
    // SAFETY: buf is valid for writes of buf.len() bytes.
    let ret = unsafe {
        libc::syscall(libc::SYS_getrandom, buf.as_mut_ptr().cast::<c_void>(), buf.len(), flags.bits())
    };
    if ret == -1 {
        match err_no() {
            EFAULT => BadAddrPanic.panic(),
            e => Err(OsError(e))?,
        }
    }
    Ok(ret as usize)
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn getrandom(_buf: &mut [u8], _flags: GetRandomFlags) -> Result<usize, RandomError> {
    Err(OsError(libc::ENOSYS).into())
}

/// Probes for the syscall with an empty request, which the kernel answers without touching the
/// buffer or blocking.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn has_getrandom() -> bool {
    // SAFETY: A zero-length request never dereferences the buffer pointer.
    let ret = unsafe {
        libc::syscall(
            libc::SYS_getrandom,
            std::ptr::null_mut::<c_void>(),
            0_usize,
            GetRandomFlags::NONBLOCK.bits(),
        )
    };
    // Seccomp filters commonly answer unknown syscalls with EPERM rather than ENOSYS.
    ret != -1 || !matches!(err_no(), libc::ENOSYS | libc::EPERM)
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub const fn has_getrandom() -> bool {
    false
}

#[cfg(target_vendor = "apple")]
pub fn getentropy(buf: &mut [u8]) -> Result<usize, RandomError> {
    let len = buf.len().min(GETENTROPY_MAX);
    // SAFETY: buf is valid for writes of at least len bytes.
    if unsafe { libc::getentropy(buf.as_mut_ptr().cast(), len) } == -1 {
        match err_no() {
            EFAULT => BadAddrPanic.panic(),
            e => Err(OsError(e))?,
        }
    }
    Ok(len)
}

#[cfg(not(target_vendor = "apple"))]
pub fn getentropy(_buf: &mut [u8]) -> Result<usize, RandomError> {
    Err(OsError(libc::ENOSYS).into())
}

/// The urandom device, opened on first use and kept open for the life of the process.
pub fn urandom() -> Result<&'static Fd, RawOsError> {
    static DEVICE: OnceLock<Result<Fd, RawOsError>> = OnceLock::new();

    DEVICE
        .get_or_init(|| Fd::open(c"/dev/urandom", O_RDONLY, 0))
        .as_ref()
        .map_err(|e| *e)
}

pub fn read_urandom(buf: &mut [u8]) -> Result<usize, RandomError> {
    let device = urandom().map_err(OsError)?;
    Ok(device.read(buf).map_err(OsError)?)
}
