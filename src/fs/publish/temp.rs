use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::fs::error::InvalidPathError;
use crate::rand::RandomBytes;

/// The temporary sibling used while publishing to `dest`: `.{file name}.{hex suffix}.tmp` in the
/// same directory, so that the final rename never crosses a file system boundary.
pub fn temp_path_for(dest: &Path, suffix: &RandomBytes) -> Result<PathBuf, InvalidPathError> {
    let name = dest.file_name().ok_or(InvalidPathError)?;
    let hex = suffix.to_hex();

    let mut temp_name = OsString::with_capacity(name.len() + hex.len() + 6);
    temp_name.push(".");
    temp_name.push(name);
    temp_name.push(".");
    temp_name.push(hex);
    temp_name.push(".tmp");

    Ok(dest.with_file_name(temp_name))
}
