use libc::{EINTR, EIO};

use super::{GetRandomFlags, RandomBackend, RandomBytes, RandomError};
use crate::error::OsError;

/// Something that can fill buffers with secure random bytes.
///
/// [`SystemRandom`] is the implementation everything uses by default; the trait mostly exists so
/// that code built on top of it can be exercised against a source that misbehaves on purpose.
pub trait RandomSource {
    /// Fills the whole of `buf`, or fails without any guarantee about its contents.
    fn fill(&self, buf: &mut [u8]) -> Result<(), RandomError>;

    fn random_bytes(&self, len: usize) -> Result<RandomBytes, RandomError> {
        let mut buf = vec![0_u8; len].into_boxed_slice();
        self.fill(&mut buf)?;
        Ok(RandomBytes::from_boxed(buf))
    }
}

/// The OS CSPRNG, through whichever [`RandomBackend`] this process detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemRandom {
    flags: GetRandomFlags,
}

impl SystemRandom {
    pub const fn new() -> SystemRandom {
        SystemRandom { flags: GetRandomFlags::empty() }
    }

    pub const fn with_flags(flags: GetRandomFlags) -> SystemRandom {
        SystemRandom { flags }
    }

    pub const fn flags(&self) -> GetRandomFlags {
        self.flags
    }

    pub fn backend(&self) -> RandomBackend {
        RandomBackend::current()
    }
}

impl RandomSource for SystemRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), RandomError> {
        fill(buf, self.flags)
    }
}

/// Makes a single request for random bytes and returns how many were written, which may be fewer
/// than `buf.len()`. An empty buffer succeeds immediately without asking the OS.
pub fn getrandom(buf: &mut [u8], flags: GetRandomFlags) -> Result<usize, RandomError> {
    if buf.is_empty() {
        return Ok(0);
    }
    RandomBackend::current().request(buf, flags)
}

/// Fills the whole of `buf`, repeating requests after short reads and interruptions.
pub fn fill(buf: &mut [u8], flags: GetRandomFlags) -> Result<(), RandomError> {
    fill_with(buf, |rest| getrandom(rest, flags))
}

/// Returns `len` fresh bytes from the system source, in blocking mode.
pub fn random_bytes(len: usize) -> Result<RandomBytes, RandomError> {
    SystemRandom::new().random_bytes(len)
}

pub(crate) fn fill_with<F>(buf: &mut [u8], mut request: F) -> Result<(), RandomError>
where
    F: FnMut(&mut [u8]) -> Result<usize, RandomError>,
{
    let mut filled = 0;
    while filled < buf.len() {
        match request(&mut buf[filled..]) {
            // No progress on a non-empty request would otherwise loop forever.
            Ok(0) => Err(OsError(EIO))?,
            Ok(count) => filled += count.min(buf.len() - filled),
            Err(RandomError::IOFailure(OsError(EINTR))) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
