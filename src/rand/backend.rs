use std::sync::OnceLock;

use derive_more::IsVariant;

use super::{GetRandomFlags, RandomError, UnavailableError, syscall};

/// The secure random source in use by this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum RandomBackend {
    /// The `getrandom` syscall (Linux 3.17 and later).
    GetRandom,
    /// `getentropy`, as provided by Apple platforms.
    GetEntropy,
    /// Reading from `/dev/urandom`, for kernels without a dedicated syscall.
    DevUrandom,
    /// Nothing secure could be found.
    Unavailable,
}

static BACKEND: OnceLock<RandomBackend> = OnceLock::new();

impl RandomBackend {
    /// Returns the backend for this process, detecting it on the first call.
    pub fn current() -> RandomBackend {
        *BACKEND.get_or_init(RandomBackend::detect)
    }

    fn detect() -> RandomBackend {
        if syscall::has_getrandom() {
            RandomBackend::GetRandom
        } else if cfg!(target_vendor = "apple") {
            RandomBackend::GetEntropy
        } else if syscall::urandom().is_ok() {
            RandomBackend::DevUrandom
        } else {
            RandomBackend::Unavailable
        }
    }

    /// Issues a single request, which may be satisfied only partially.
    pub(crate) fn request(
        self,
        buf: &mut [u8],
        flags: GetRandomFlags,
    ) -> Result<usize, RandomError> {
        match self {
            RandomBackend::GetRandom =>   syscall::getrandom(buf, flags),
            RandomBackend::GetEntropy =>  syscall::getentropy(buf),
            RandomBackend::DevUrandom =>  syscall::read_urandom(buf),
            RandomBackend::Unavailable => Err(UnavailableError.into()),
        }
    }
}
