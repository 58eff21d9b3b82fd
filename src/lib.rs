//! This crate publishes files atomically: new content is written to a uniquely named temporary
//! sibling and then renamed into place, but only if nothing already lives at the destination.
//!
//! # Purpose
//! Rust's [`std::fs::rename`] silently replaces its destination. That's fine most of the time, but
//! it's exactly wrong when two writers race to create the same file and only one of them should
//! win. Linux has had `renameat2(RENAME_NOREPLACE)` for a long time and macOS has
//! `renamex_np(RENAME_EXCL)`, so this crate wraps those directly rather than pretending a
//! check-then-rename sequence is good enough.
//!
//! # Layout
//! - [`rand`] fills buffers from the OS CSPRNG (the `getrandom` syscall where the kernel has it,
//!   `getentropy` on Apple platforms and the urandom device everywhere else). It never falls back
//!   to a non-cryptographic generator.
//! - [`fs::rename`](mod@fs::rename) is the primitive: one syscall that either moves a file into
//!   place or refuses because the destination exists. It doesn't clean anything up; that's the
//!   caller's job.
//! - [`fs::publish`](mod@fs::publish) is that caller: it names a temporary, writes and syncs it,
//!   runs the primitive and removes the temporary whenever the rename fails.
//!
//! Platform support is decided once per process. If the rename primitive isn't available, the
//! crate says so with a distinct error instead of quietly degrading to something racy.
//!
//! # Error Handling
//! Errors are strongly typed, using enums for static dispatch rather than dynamic, with small
//! structs (often ZSTs) that implement [`Error`](std::error::Error). Any error that came straight
//! from the OS keeps its raw error number, so nothing gets translated away before the caller sees
//! it. Error numbers that can only mean memory corruption (a bad pointer or a bad file descriptor)
//! panic instead.
//!
//! # Dependencies
//! The syscall wrappers rely on `libc`. Errors use `derive_more`, syscall flags use `bitflags`,
//! and the publish workflow reports what it's doing through the `log` facade. The primitives
//! themselves never log.
#![cfg(unix)]
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod error;
#[cfg(feature = "fs")]
pub mod fs;
#[cfg(feature = "rand")]
pub mod rand;

pub(crate) mod util;
