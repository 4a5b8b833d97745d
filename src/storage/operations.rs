//! File system operations
//!
//! Thin wrappers over std::fs returning storage errors the command handlers
//! can translate into FTP replies.

use std::fs;
use std::path::Path;

use crate::error::StorageError;

/// Lists entry names in a directory, with the "." and ".." markers the
/// listing format expects.
pub fn list_directory(real_path: &Path, at_root: bool) -> Result<Vec<String>, StorageError> {
    let entries = fs::read_dir(real_path)?;

    let mut names = vec![".".to_string()];
    if !at_root {
        names.push("..".to_string());
    }

    for entry in entries.flatten() {
        names.push(entry.file_name().to_string_lossy().to_string());
    }

    Ok(names)
}

pub fn remove_file(real_path: &Path, virtual_path: &str) -> Result<(), StorageError> {
    if !real_path.is_file() {
        return Err(StorageError::FileNotFound(virtual_path.to_string()));
    }
    fs::remove_file(real_path)?;
    Ok(())
}

pub fn make_directory(real_path: &Path, virtual_path: &str) -> Result<(), StorageError> {
    if real_path.exists() {
        return Err(StorageError::InvalidPath(format!(
            "{virtual_path} already exists"
        )));
    }
    fs::create_dir(real_path)?;
    Ok(())
}

pub fn rename_entry(from: &Path, to: &Path, virtual_from: &str) -> Result<(), StorageError> {
    if !from.exists() {
        return Err(StorageError::FileNotFound(virtual_from.to_string()));
    }
    fs::rename(from, to)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("cam-ftp-storage-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn listing_includes_dot_markers_and_entries() {
        let dir = temp_dir("list");
        File::create(dir.join("a.jpg")).unwrap();
        fs::create_dir(dir.join("sub")).unwrap();

        let root_names = list_directory(&dir, true).unwrap();
        assert!(root_names.contains(&".".to_string()));
        assert!(!root_names.contains(&"..".to_string()));
        assert!(root_names.contains(&"a.jpg".to_string()));
        assert!(root_names.contains(&"sub".to_string()));

        let sub_names = list_directory(&dir.join("sub"), false).unwrap();
        assert!(sub_names.contains(&"..".to_string()));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn remove_file_requires_existing_file() {
        let dir = temp_dir("remove");
        assert!(matches!(
            remove_file(&dir.join("missing.jpg"), "/missing.jpg"),
            Err(StorageError::FileNotFound(_))
        ));

        File::create(dir.join("a.jpg")).unwrap();
        remove_file(&dir.join("a.jpg"), "/a.jpg").unwrap();
        assert!(!dir.join("a.jpg").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn make_directory_refuses_existing_path() {
        let dir = temp_dir("mkdir");
        make_directory(&dir.join("new"), "/new").unwrap();
        assert!(dir.join("new").is_dir());
        assert!(make_directory(&dir.join("new"), "/new").is_err());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn rename_moves_entry() {
        let dir = temp_dir("rename");
        File::create(dir.join("old.jpg")).unwrap();
        rename_entry(&dir.join("old.jpg"), &dir.join("new.jpg"), "/old.jpg").unwrap();
        assert!(dir.join("new.jpg").exists());
        assert!(!dir.join("old.jpg").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
