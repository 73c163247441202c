use std::io::ErrorKind;
use std::path::Path;

use crate::error::AccessError;

/// Returns whether a filesystem entry exists at `path`.
///
/// Absence is `Ok(false)`, including a path that runs through a regular
/// file. Anything else that stops the lookup (permission denied on an
/// ancestor, I/O faults) is an [`AccessError`], never a silent `false`.
/// Symlinks are followed; a dangling link reads as absent.
pub fn is_file_exist(path: impl AsRef<Path>) -> Result<bool, AccessError> {
    let path = path.as_ref();
    match std::fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
            Ok(false)
        }
        Err(source) => {
            tracing::debug!(path = %path.display(), error = %source, "file probe failed");
            Err(AccessError {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_file_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("sample.bin");
        std::fs::write(&file, b"x").unwrap();

        assert!(is_file_exist(&file).unwrap());
        assert!(is_file_exist(dir.path()).unwrap());
    }

    #[test]
    fn absent_path_is_false() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_file_exist(dir.path().join("missing.exe")).unwrap());
    }

    #[test]
    fn path_through_regular_file_is_false() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        std::fs::write(&file, b"x").unwrap();

        assert!(!is_file_exist(file.join("child")).unwrap());
    }

    #[test]
    #[cfg(unix)]
    fn dangling_symlink_is_false() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(dir.path().join("gone"), &link).unwrap();

        assert!(!is_file_exist(&link).unwrap());
    }

    #[test]
    #[cfg(unix)]
    fn permission_denied_ancestor_is_access_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::write(locked.join("inner"), b"x").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Root bypasses directory permissions; nothing to observe there.
        let probe_is_blocked = std::fs::read_dir(&locked).is_err();
        let result = is_file_exist(locked.join("inner"));

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        if probe_is_blocked {
            let err = result.unwrap_err();
            assert_eq!(err.source.kind(), ErrorKind::PermissionDenied);
            assert_eq!(err.path, locked.join("inner"));
        } else {
            assert!(result.unwrap());
        }
    }
}
