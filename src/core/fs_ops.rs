// src/core/fs_ops.rs
//! File system helpers shared by the loader and the generator

use std::fs::{self, Permissions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub struct FsOps;

impl FsOps {
    pub fn ensure_dir_exists(path: &Path) -> io::Result<()> {
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    pub fn read_file_safe(path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    /// Write `content` to `path` through a temp file in the same directory,
    /// so readers only ever see the old file or the complete new one
    pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        Self::ensure_dir_exists(parent)?;

        let dir = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content)?;
        // The temp file starts out owner-only; keep the page world-readable
        let permissions = match fs::metadata(path) {
            Ok(meta) => Some(meta.permissions()),
            Err(_) => default_permissions(),
        };
        if let Some(permissions) = permissions {
            tmp.as_file().set_permissions(permissions)?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }

    pub fn normalize_path(base: &Path, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            base.join(relative)
        }
    }

    /// Lower-cased file extension
    pub fn get_extension(path: &Path) -> Option<String> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_creates_parent_and_replaces() {
        let dir = tempfile::tempdir().expect("temp dir");
        let target = dir.path().join("site").join("index.html");

        FsOps::write_atomic(&target, b"first").expect("first write");
        FsOps::write_atomic(&target, b"second").expect("second write");

        assert_eq!(fs::read_to_string(&target).expect("read back"), "second");
        let leftovers = fs::read_dir(target.parent().expect("parent"))
            .expect("list dir")
            .count();
        assert_eq!(leftovers, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_keeps_page_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("temp dir");
        let fresh = dir.path().join("fresh.html");
        FsOps::write_atomic(&fresh, b"new").expect("write");
        let mode = fs::metadata(&fresh).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o644);

        let existing = dir.path().join("index.html");
        fs::write(&existing, "old").expect("seed output");
        fs::set_permissions(&existing, Permissions::from_mode(0o664)).expect("chmod");
        FsOps::write_atomic(&existing, b"new").expect("rewrite");
        let mode = fs::metadata(&existing).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o664);
        assert_eq!(fs::read_to_string(&existing).expect("read back"), "new");
    }

    #[test]
    fn test_normalize_path() {
        let base = Path::new("/srv/resume");
        assert_eq!(
            FsOps::normalize_path(base, Path::new("index.html")),
            PathBuf::from("/srv/resume/index.html")
        );
        assert_eq!(
            FsOps::normalize_path(base, Path::new("/tmp/out.html")),
            PathBuf::from("/tmp/out.html")
        );
    }

    #[test]
    fn test_get_extension() {
        assert_eq!(FsOps::get_extension(Path::new("resume.YAML")), Some("yaml".to_string()));
        assert_eq!(FsOps::get_extension(Path::new("resume")), None);
    }
}
