//! Atomic artifact writes.
//!
//! Every write lands in a temporary sibling file (`.{filename}.tmp`), is
//! synced, and is then renamed over the target. A reader never sees a
//! partially written artifact. Source and target must share a filesystem;
//! a crash can leave the temporary file behind.

use crate::error::{Result, SquashError};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file, creating parent directories.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    write_with_mode(path.as_ref(), content, false)
}

/// Atomically write a script and mark it executable on Unix.
pub fn atomic_write_executable<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    write_with_mode(path.as_ref(), content, true)
}

fn write_with_mode(path: &Path, content: &[u8], executable: bool) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            SquashError::WriteError(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = generate_temp_path(path)?;
    write_and_sync(&temp_path, content)?;
    if executable {
        set_executable(&temp_path)?;
    }
    replace(&temp_path, path)
}

fn generate_temp_path(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            SquashError::WriteError(format!("invalid file path '{}'", target.display()))
        })?;
    Ok(parent.join(format!(".{}.tmp", filename)))
}

fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        SquashError::WriteError(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.write_all(content)
        .and_then(|_| file.sync_all())
        .map_err(|e| {
            let _ = fs::remove_file(path);
            SquashError::WriteError(format!(
                "failed to write temporary file '{}': {}",
                path.display(),
                e
            ))
        })
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|e| {
        let _ = fs::remove_file(path);
        SquashError::WriteError(format!(
            "failed to mark '{}' executable: {}",
            path.display(),
            e
        ))
    })
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Rename `source` over `target`. Replaces an existing target on every
/// supported platform.
fn replace(source: &Path, target: &Path) -> Result<()> {
    fs::rename(source, target).map_err(|e| {
        let _ = fs::remove_file(source);
        SquashError::WriteError(format!(
            "failed to replace '{}': {}",
            target.display(),
            e
        ))
    })?;
    sync_parent(target);
    Ok(())
}

#[cfg(unix)]
fn sync_parent(target: &Path) {
    if let Some(parent) = target.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent(_target: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("CLAUDE.md");

        atomic_write(&file_path, b"# Rules\n").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "# Rules\n");
    }

    #[test]
    fn test_atomic_write_replace_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("CLAUDE.md");
        fs::write(&file_path, "stale").unwrap();

        atomic_write(&file_path, b"fresh").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "fresh");
        assert!(!temp_dir.path().join(".CLAUDE.md.tmp").exists());
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("skills").join("tdd").join("SKILL.md");

        atomic_write(&file_path, b"skill").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "skill");
    }

    #[test]
    fn test_generate_temp_path() {
        let temp = generate_temp_path(Path::new("/out/agents/reviewer.md")).unwrap();
        assert_eq!(temp, Path::new("/out/agents/.reviewer.md.tmp"));
    }

    #[cfg(unix)]
    #[test]
    fn test_executable_write_sets_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("bin").join("setup.sh");

        atomic_write_executable(&file_path, b"#!/bin/sh\n").unwrap();

        let mode = fs::metadata(&file_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
