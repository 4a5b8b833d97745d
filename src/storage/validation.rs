//! Path validation
//!
//! All client-supplied paths are virtual: rooted at "/" and mapped under the
//! account's home directory. Normalization clamps ".." at the virtual root,
//! so no resolved path can escape the save directory.

use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Rejects path components the filesystem or the log file cannot represent
/// safely.
fn is_clean_component(name: &str) -> bool {
    !name.is_empty() && !name.contains(['\0', '\r', '\n'])
}

/// Normalizes a client-supplied path against the current virtual directory.
///
/// Absolute arguments replace the current directory, relative ones extend it.
/// "." is dropped and ".." pops one level, stopping at the root.
pub fn resolve_virtual_path(current: &str, arg: &str) -> Result<String, StorageError> {
    let mut parts: Vec<&str> = if arg.starts_with('/') {
        Vec::new()
    } else {
        current.split('/').filter(|p| !p.is_empty()).collect()
    };

    for component in arg.split('/').filter(|p| !p.is_empty()) {
        match component {
            "." => {}
            ".." => {
                // Clamp at the virtual root rather than erroring; the real
                // root stays unreachable either way.
                parts.pop();
            }
            name if is_clean_component(name) => parts.push(name),
            name => return Err(StorageError::InvalidPath(name.to_string())),
        }
    }

    if parts.is_empty() {
        Ok("/".to_string())
    } else {
        Ok(format!("/{}", parts.join("/")))
    }
}

/// Maps a normalized virtual path to a real path under `root`.
pub fn virtual_to_real(root: &Path, virtual_path: &str) -> PathBuf {
    let mut real = root.to_path_buf();
    for component in virtual_path.split('/').filter(|p| !p.is_empty()) {
        real.push(component);
    }
    real
}

/// Resolves a file or directory argument to (real path, virtual path).
pub fn resolve_entry(
    root: &Path,
    current: &str,
    arg: &str,
) -> Result<(PathBuf, String), StorageError> {
    if arg.trim().is_empty() {
        return Err(StorageError::InvalidPath(arg.to_string()));
    }

    let virtual_path = resolve_virtual_path(current, arg)?;
    if virtual_path == "/" {
        // Entry operations (STOR/DELE/...) must name something below the root
        return Err(StorageError::InvalidPath(arg.to_string()));
    }

    let real_path = virtual_to_real(root, &virtual_path);
    debug_assert!(real_path.starts_with(root));
    Ok((real_path, virtual_path))
}

/// Resolves a directory argument, requiring it to exist as a directory.
pub fn resolve_directory(
    root: &Path,
    current: &str,
    arg: &str,
) -> Result<(PathBuf, String), StorageError> {
    let virtual_path = resolve_virtual_path(current, arg)?;
    let real_path = virtual_to_real(root, &virtual_path);

    if !real_path.exists() {
        return Err(StorageError::DirectoryNotFound(virtual_path));
    }
    if !real_path.is_dir() {
        return Err(StorageError::NotADirectory(virtual_path));
    }

    Ok((real_path, virtual_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_extends_current_directory() {
        assert_eq!(resolve_virtual_path("/sub", "shot.jpg").unwrap(), "/sub/shot.jpg");
    }

    #[test]
    fn absolute_path_replaces_current_directory() {
        assert_eq!(resolve_virtual_path("/sub", "/other/a.jpg").unwrap(), "/other/a.jpg");
    }

    #[test]
    fn dot_dot_clamps_at_root() {
        assert_eq!(resolve_virtual_path("/", "../../../etc/passwd").unwrap(), "/etc/passwd");
        assert_eq!(resolve_virtual_path("/a/b", "../..").unwrap(), "/");
        assert_eq!(resolve_virtual_path("/a", "../x").unwrap(), "/x");
    }

    #[test]
    fn resolved_paths_stay_under_root() {
        let root = Path::new("/app/images");
        let (real, _) = resolve_entry(root, "/", "../../../../etc/passwd").unwrap();
        assert!(real.starts_with(root));
    }

    #[test]
    fn nul_bytes_are_rejected() {
        assert!(matches!(
            resolve_virtual_path("/", "bad\0name"),
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[test]
    fn entry_must_be_below_root() {
        let root = Path::new("/app/images");
        assert!(resolve_entry(root, "/", "..").is_err());
        assert!(resolve_entry(root, "/", "   ").is_err());
    }

    #[test]
    fn virtual_to_real_joins_components() {
        let root = Path::new("/app/images");
        assert_eq!(
            virtual_to_real(root, "/sub/shot.jpg"),
            PathBuf::from("/app/images/sub/shot.jpg")
        );
        assert_eq!(virtual_to_real(root, "/"), PathBuf::from("/app/images"));
    }
}
