//! Cryptographically secure random bytes from the operating system.
//!
//! The source is picked once per process (see [`RandomBackend`]) and never falls back to anything
//! that isn't a kernel-maintained CSPRNG. Requests that the OS only partially satisfies are
//! retried by [`fill`] until the whole buffer is written, so a caller never receives short random
//! material without an error.

mod backend;
mod bytes;
mod error;
mod flags;
mod source;
mod syscall;

pub use backend::*;
pub use bytes::*;
pub use error::*;
pub use flags::*;
pub use source::*;
