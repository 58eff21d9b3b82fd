use libc::c_uint;

bitflags::bitflags! {
    /// Flags for a single [`getrandom`](super::getrandom) request, with the same values as the
    /// kernel's `GRND_*` constants. The empty set asks for ordinary blocking CSPRNG output.
    ///
    /// Only the `getrandom` syscall backend understands these; the other backends ignore them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GetRandomFlags: c_uint {
        /// Fail with `EAGAIN` instead of blocking while the entropy pool is still uninitialized.
        const NONBLOCK = 0x0001;
        /// Draw from the blocking pool, which is identical to the default on Linux 5.6 and up.
        const RANDOM = 0x0002;
    }
}
