//! The no-replace rename primitive.
//!
//! [`rename_noreplace`] issues exactly one syscall. There's no existence check beforehand, because
//! that would reopen the race the syscall exists to close, and there's no cleanup afterwards: if
//! the rename fails, `from` is still there and it's up to the caller to retry, remove it or keep
//! it.

mod error;
mod rename;

pub use error::*;
pub use rename::*;
