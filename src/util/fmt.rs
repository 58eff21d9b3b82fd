use std::fmt::{self, Debug, Display, Formatter};

/// Debug-formats a value using its [`Display`] output, without the quotes a string would get.
pub struct DebugRaw<T: Display>(pub T);

impl<T: Display> Debug for DebugRaw<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
