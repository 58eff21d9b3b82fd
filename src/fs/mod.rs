//! Publishing files without ever replacing an existing one.
//!
//! [`rename`](mod@rename) holds the primitive, a single no-replace rename syscall.
//! [`publish`](mod@publish) builds the complete workflow on top of it: temporary sibling, write,
//! sync, rename and cleanup.

pub mod publish;
pub mod rename;

mod error;
mod syscall;

pub use error::*;
pub use publish::{Fallback, PublishError, PublishOptions, Publisher, publish};
pub use rename::{NoReplaceRename, RenameCapability, RenameError, SystemRename, rename_noreplace};
