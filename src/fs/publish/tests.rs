#![cfg(test)]

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use libc::{EIO, ENOENT, ENOSYS};
use tempfile::TempDir;

use super::*;
use crate::error::OsError;
use crate::fs::error::{AlreadyExistsError, InvalidPathError, TempCollisionError, UnsupportedError};
use crate::fs::rename::{NoReplaceRename, RenameCapability, RenameError, SystemRename};
use crate::rand::{RandomError, RandomSource, SystemRandom, UnavailableError};

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// A platform without any no-replace rename, which counts how often it was asked.
#[derive(Debug)]
struct NoRename<'a>(&'a AtomicUsize);

impl NoReplaceRename for NoRename<'_> {
    fn rename_noreplace(&self, _from: &Path, _to: &Path) -> Result<(), RenameError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Err(UnsupportedError(ENOSYS).into())
    }

    fn capability(&self) -> RenameCapability {
        RenameCapability::Unsupported
    }
}

/// Renames for real, then takes the destination's directory away before it can be synced.
#[derive(Debug)]
struct VanishingDir;

impl NoReplaceRename for VanishingDir {
    fn rename_noreplace(&self, from: &Path, to: &Path) -> Result<(), RenameError> {
        let os_error = |e: std::io::Error| OsError(e.raw_os_error().unwrap_or(EIO));
        fs::rename(from, to).map_err(os_error)?;
        fs::remove_file(to).map_err(os_error)?;
        if let Some(parent) = to.parent() {
            fs::remove_dir(parent).map_err(os_error)?;
        }
        Ok(())
    }

    fn capability(&self) -> RenameCapability {
        RenameCapability::current()
    }
}

/// Always produces the same bytes, so temporary names repeat.
#[derive(Debug)]
struct FixedRandom(u8);

impl RandomSource for FixedRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), RandomError> {
        buf.fill(self.0);
        Ok(())
    }
}

#[derive(Debug)]
struct NoRandom;

impl RandomSource for NoRandom {
    fn fill(&self, _buf: &mut [u8]) -> Result<(), RandomError> {
        Err(UnavailableError.into())
    }
}

fn entries(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<Vec<_>, _>>()?;
    names.sort();
    Ok(names)
}

#[test]
fn test_publish_to_absent_destination() -> TestResult {
    let dir = TempDir::new()?;
    let dest = dir.path().join("config.toml");

    let published = Publisher::new().publish(&dest, b"answer = 42\n")?;

    assert_eq!(published, dest);
    assert_eq!(fs::read(&dest)?, b"answer = 42\n");
    assert_eq!(
        entries(dir.path())?,
        ["config.toml"],
        "No temporary file should be left behind."
    );
    Ok(())
}

#[test]
fn test_publish_refuses_existing_destination() -> TestResult {
    let dir = TempDir::new()?;
    let dest = dir.path().join("data");
    fs::write(&dest, "original")?;

    let error = publish(&dest, b"replacement").expect_err("the destination already exists");

    assert!(error.is_already_exists(), "Unexpected error: {error}");
    assert_eq!(fs::read_to_string(&dest)?, "original", "The destination should be untouched.");
    assert_eq!(
        entries(dir.path())?,
        ["data"],
        "The temporary file should be removed after a refused rename."
    );
    Ok(())
}

#[test]
fn test_publish_empty_contents() -> TestResult {
    let dir = TempDir::new()?;
    let dest = dir.path().join("empty");

    publish(&dest, b"")?;

    assert_eq!(fs::metadata(&dest)?.len(), 0);
    Ok(())
}

#[test]
fn test_publish_without_durability() -> TestResult {
    let dir = TempDir::new()?;
    let dest = dir.path().join("scratch");

    let mut options = PublishOptions::new();
    options.durable(false);
    Publisher::new().with_options(options).publish(&dest, b"fast")?;

    assert_eq!(fs::read(&dest)?, b"fast");
    assert_eq!(entries(dir.path())?, ["scratch"]);
    Ok(())
}

#[test]
fn test_publish_applies_mode() -> TestResult {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new()?;
    let dest = dir.path().join("private");

    let mut publisher = Publisher::new();
    publisher.options_mut().mode(0o600);
    publisher.publish(&dest, b"secret")?;

    assert_eq!(
        fs::metadata(&dest)?.permissions().mode() & 0o777,
        0o600,
        "A mode without group or other bits can't be widened by the umask."
    );
    Ok(())
}

#[test]
fn test_unsupported_rename_is_not_bypassed() -> TestResult {
    let dir = TempDir::new()?;
    let dest = dir.path().join("target");
    let calls = AtomicUsize::new(0);
    let publisher = Publisher::with_backends(NoRename(&calls), SystemRandom::new());

    let error = publisher.publish(&dest, b"content").expect_err("the stub can't rename");

    assert!(error.is_unsupported(), "Unexpected error: {error}");
    assert_eq!(
        error,
        PublishError::Rename(RenameError::Unsupported(UnsupportedError(ENOSYS)))
    );
    assert!(!dest.exists(), "Nothing should have been moved into place by other means.");
    assert!(entries(dir.path())?.is_empty(), "The temporary file should be removed.");
    assert_eq!(
        calls.load(Ordering::SeqCst),
        1,
        "The rename should be attempted exactly once."
    );
    assert!(publisher.capability().is_unsupported());
    Ok(())
}

#[test]
fn test_hard_link_fallback() -> TestResult {
    let dir = TempDir::new()?;
    let dest = dir.path().join("linked");

    let calls = AtomicUsize::new(0);
    let mut options = PublishOptions::new();
    options.fallback(Fallback::HardLink);
    let publisher = Publisher::with_backends(NoRename(&calls), SystemRandom::new())
        .with_options(options);

    publisher.publish(&dest, b"first")?;
    assert_eq!(fs::read(&dest)?, b"first");
    assert_eq!(
        entries(dir.path())?,
        ["linked"],
        "The temporary name should be unlinked after linking."
    );

    let error = publisher.publish(&dest, b"second").expect_err("the destination exists now");
    assert!(error.is_already_exists(), "Linking should refuse to replace, too.");
    assert_eq!(fs::read(&dest)?, b"first");
    assert_eq!(entries(dir.path())?, ["linked"]);
    assert_eq!(calls.load(Ordering::SeqCst), 2, "The rename should still be tried first.");
    Ok(())
}

#[test]
fn test_temp_name_collisions_are_retried_then_reported() -> TestResult {
    let dir = TempDir::new()?;
    let dest = dir.path().join("file");

    let mut options = PublishOptions::new();
    options.suffix_len(2).max_attempts(3);
    let publisher = Publisher::with_backends(SystemRename, FixedRandom(0xAB)).with_options(options);

    // Someone else's file happens to have the only name this source can produce.
    let squatter = dir.path().join(".file.abab.tmp");
    fs::write(&squatter, "not ours")?;

    assert_eq!(
        publisher.publish(&dest, b"content"),
        Err(PublishError::TempCollision(TempCollisionError))
    );
    assert_eq!(
        fs::read_to_string(&squatter)?,
        "not ours",
        "A colliding file belongs to someone else and must not be removed or changed."
    );
    assert!(!dest.exists());

    fs::remove_file(&squatter)?;
    publisher.publish(&dest, b"content")?;
    assert_eq!(fs::read(&dest)?, b"content");
    Ok(())
}

#[test]
fn test_random_failure_is_reported() -> TestResult {
    let dir = TempDir::new()?;
    let dest = dir.path().join("file");
    let publisher = Publisher::with_backends(SystemRename, NoRandom);

    assert_eq!(
        publisher.publish(&dest, b"content"),
        Err(PublishError::Random(RandomError::Unavailable(UnavailableError))),
        "Temporaries must never be named without a secure source."
    );
    assert!(entries(dir.path())?.is_empty());
    Ok(())
}

#[test]
fn test_missing_directory() -> TestResult {
    let dir = TempDir::new()?;
    let dest = dir.path().join("missing").join("file");

    let error = publish(&dest, b"content").expect_err("the parent directory doesn't exist");
    assert!(error.is_create_temp());
    assert_eq!(error.raw_os_error(), Some(ENOENT));
    Ok(())
}

#[test]
fn test_invalid_destinations() {
    assert_eq!(
        publish("/", b"content"),
        Err(PublishError::InvalidPath(InvalidPathError)),
        "A destination without a file name can't have a sibling."
    );
    assert_eq!(
        publish("bad\0name", b"content"),
        Err(PublishError::InvalidPath(InvalidPathError))
    );
}

#[test]
fn test_temp_path_is_hidden_sibling() -> TestResult {
    let suffix = FixedRandom(0x0F).random_bytes(4)?;
    let temp = temp_path_for(Path::new("/var/lib/app/state.json"), &suffix)?;
    assert_eq!(temp, Path::new("/var/lib/app/.state.json.0f0f0f0f.tmp"));

    let temp = temp_path_for(Path::new("relative"), &suffix)?;
    assert_eq!(temp, Path::new(".relative.0f0f0f0f.tmp"));

    assert_eq!(
        temp_path_for(Path::new("/var/.."), &suffix),
        Err(InvalidPathError)
    );
    Ok(())
}

#[test]
fn test_temp_paths_differ() -> TestResult {
    let dest = Path::new("/tmp/out");
    let first = temp_path_for(dest, &SystemRandom::new().random_bytes(8)?)?;
    let second = temp_path_for(dest, &SystemRandom::new().random_bytes(8)?)?;
    assert_ne!(first, second, "Independent temporaries should get independent names.");
    assert_eq!(first.parent(), dest.parent());
    Ok(())
}

#[test]
fn test_options() {
    let mut options = PublishOptions::default();
    assert_eq!(options, PublishOptions::new());
    assert_eq!(
        format!("{options:?}"),
        "PublishOptions { mode: 0o644, durable: true, suffix_len: 8, max_attempts: 8, fallback: Refuse }"
    );

    options.suffix_len(0).max_attempts(0).mode(0o100_600);
    assert_eq!(options.suffix_len, 1, "At least one random byte should always be used.");
    assert_eq!(options.max_attempts, 1, "At least one name should always be tried.");
    assert_eq!(options.mode, 0o600, "File type bits should be masked off.");

    options.suffix_len(1000);
    assert_eq!(options.suffix_len, PublishOptions::MAX_SUFFIX_LEN);
}

#[test]
fn test_error_messages() {
    let error = PublishError::Rename(RenameError::AlreadyExists(AlreadyExistsError));
    assert_eq!(
        error.to_string(),
        "failed to move temporary file into place: destination already exists"
    );
    assert_eq!(
        PublishError::from(TempCollisionError).to_string(),
        "every generated temporary name was already taken"
    );
}

#[test]
fn test_directory_sync_failure_is_distinct() -> TestResult {
    let dir = TempDir::new()?;
    let subdir = dir.path().join("gone");
    fs::create_dir(&subdir)?;

    let publisher = Publisher::with_backends(VanishingDir, SystemRandom::new());
    let error = publisher
        .publish(subdir.join("file"), b"content")
        .expect_err("the directory disappeared before it could be synced");

    assert_eq!(error, PublishError::DirSync(OsError(ENOENT)));
    assert!(error.is_published(), "The rename already happened, so the content was published.");
    assert!(!error.is_already_exists());
    assert_eq!(error.raw_os_error(), Some(ENOENT));

    let early = PublishError::Sync(OsError(EIO));
    assert!(!early.is_published(), "A failed file sync comes before anything is moved into place.");
    assert_ne!(early.to_string(), PublishError::DirSync(OsError(EIO)).to_string());
    Ok(())
}
