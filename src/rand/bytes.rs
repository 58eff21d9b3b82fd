use std::fmt::{self, Debug, Formatter, Write};
use std::ops::Deref;

use crate::util::fmt::DebugRaw;

/// A block of random bytes owned by whoever requested it.
///
/// There's deliberately no [`Clone`] implementation: each request gets its own material, and
/// handing the same bytes to two independent operations has to be done explicitly.
pub struct RandomBytes(Box<[u8]>);

impl RandomBytes {
    pub(crate) const fn from_boxed(bytes: Box<[u8]>) -> RandomBytes {
        RandomBytes(bytes)
    }

    /// Renders the bytes as lowercase hexadecimal, two characters per byte.
    pub fn to_hex(&self) -> String {
        self.0.iter().fold(String::with_capacity(self.0.len() * 2), |mut hex, byte| {
            // Writing to a String can't fail.
            let _ = write!(hex, "{byte:02x}");
            hex
        })
    }

    pub fn into_boxed_slice(self) -> Box<[u8]> {
        self.0
    }
}

impl Deref for RandomBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for RandomBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// The contents stay out of logs and panic messages.
impl Debug for RandomBytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RandomBytes")
            .field(&DebugRaw(format!("<{} bytes>", self.0.len())))
            .finish()
    }
}
