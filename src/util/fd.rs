use std::ffi::CStr;
use std::fmt::{self, Debug, Formatter};
use std::mem;
use std::thread;

use libc::{EBADF, EINTR, EIO, O_CLOEXEC, c_int, c_uint};

use crate::error::RawOsError;
use crate::util::fs::err_no;
use crate::util::panic::{BadFdPanic, Panic};

/// An owned file descriptor, closed on drop.
///
/// Methods hand back raw error numbers; interpreting them is up to the caller, since the same
/// number can mean different things depending on what the descriptor is being used for.
pub(crate) struct Fd(c_int);

impl Fd {
    pub fn open(path: &CStr, flags: c_int, mode: c_uint) -> Result<Fd, RawOsError> {
        // SAFETY: path is NUL-terminated and outlives the call.
        match unsafe { libc::open(path.as_ptr(), flags | O_CLOEXEC, mode) } {
            -1 => Err(err_no()),
            fd => Ok(Fd(fd)),
        }
    }

    pub fn read(&self, buf: &mut [u8]) -> Result<usize, RawOsError> {
        // SAFETY: buf is valid for writes of buf.len() bytes.
        match unsafe { libc::read(self.0, buf.as_mut_ptr().cast(), buf.len()) } {
            -1 => Err(err_no()),
            count => Ok(count as usize),
        }
    }

    pub fn write(&self, buf: &[u8]) -> Result<usize, RawOsError> {
        // SAFETY: buf is valid for reads of buf.len() bytes.
        match unsafe { libc::write(self.0, buf.as_ptr().cast(), buf.len()) } {
            -1 => Err(err_no()),
            count => Ok(count as usize),
        }
    }

    /// Writes the entire buffer, retrying partial writes and interruptions.
    pub fn write_all(&self, mut buf: &[u8]) -> Result<(), RawOsError> {
        while !buf.is_empty() {
            match self.write(buf) {
                // A regular file never accepts zero bytes unless something is badly wrong.
                Ok(0) => return Err(EIO),
                Ok(count) => buf = &buf[count.min(buf.len())..],
                Err(EINTR) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    pub fn sync(&self) -> Result<(), RawOsError> {
        // SAFETY: No memory is shared with the OS here.
        match unsafe { libc::fsync(self.0) } {
            -1 => Err(err_no()),
            _ => Ok(()),
        }
    }

    pub fn close(self) -> Result<(), RawOsError> {
        let fd = self.0;
        // The descriptor is invalid after close regardless of the outcome, so Drop must not see it.
        mem::forget(self);
        // SAFETY: fd was owned by self, which no longer exists.
        match unsafe { libc::close(fd) } {
            -1 => match err_no() {
                EBADF => BadFdPanic.panic(),
                e => Err(e),
            },
            _ => Ok(()),
        }
    }
}

impl Drop for Fd {
    fn drop(&mut self) {
        // SAFETY: After this, the file descriptor is invalidated but we are dropping self so it
        // doesn't matter.
        if unsafe { libc::close(self.0) } == -1
            && err_no() == EBADF
            // Panic only if we aren't already, to prevent aborting an existing unwind.
            && !thread::panicking()
        {
            panic!("error while dropping file descriptor: {}", BadFdPanic);
        }
    }
}

impl Debug for Fd {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Fd({})", self.0)
    }
}
