//! Writing a file into place, all or nothing, without replacing anything that's already there.
//!
//! [`Publisher::publish`] creates a hidden temporary next to the destination, writes and syncs the
//! content, then moves it into place with a no-replace rename. The temporary is removed on every
//! failure, so the only way a caller observes a half-finished publish is a
//! [`Sync`](PublishError::Sync) error after the rename, where the content is in place but the
//! directory entry might not yet be durable.

mod error;
mod guard;
mod options;
mod publisher;
mod temp;
mod tests;

pub use error::*;
pub use options::*;
pub use publisher::*;
pub use temp::*;
