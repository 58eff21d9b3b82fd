pub mod fd;
pub mod fmt;
pub mod fs;
pub mod panic;
