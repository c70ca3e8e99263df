use std::io;
use std::path::{Path, PathBuf};

use nix::sys::stat::Mode;
use nix::unistd;

use crate::error::ChannelError;

/// Create the named pipe at `path`. The runtime directory is per-user, so
/// owner-only permissions are enough.
pub fn create_fifo(path: &Path) -> Result<(), ChannelError> {
    unistd::mkfifo(path, Mode::S_IRUSR | Mode::S_IWUSR).map_err(|errno| {
        ChannelError::Creation {
            path: path.to_path_buf(),
            source: io::Error::from(errno),
        }
    })
}

/// Delete the pipe object. Idempotent: a missing file is not an error, since
/// cleanup may race with external removal.
pub fn remove_fifo(path: &Path) -> Result<(), ChannelError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ChannelError::Removal {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Make a transient FIFO for a userscript at a unique path under `dir`.
///
/// The path is kept (not deleted on drop); the caller owns its lifecycle,
/// separate from the default channel's pipe.
pub fn make_temp_fifo(dir: &Path) -> io::Result<PathBuf> {
    let fifo = tempfile::Builder::new()
        .prefix("userscript-")
        .make_in(dir, |path| {
            unistd::mkfifo(path, Mode::S_IRUSR | Mode::S_IWUSR).map_err(io::Error::from)
        })?;
    fifo.into_temp_path().keep().map_err(|e| e.error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::FileTypeExt;
    use tempfile::TempDir;

    #[test]
    fn create_makes_a_fifo() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fifo");

        create_fifo(&path).unwrap();

        let file_type = std::fs::metadata(&path).unwrap().file_type();
        assert!(file_type.is_fifo());
    }

    #[test]
    fn create_fails_in_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("fifo");

        let result = create_fifo(&path);
        assert!(matches!(result, Err(ChannelError::Creation { .. })));
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fifo");

        create_fifo(&path).unwrap();
        remove_fifo(&path).unwrap();
        assert!(!path.exists());

        // Second removal finds nothing and is still Ok
        remove_fifo(&path).unwrap();
    }

    #[test]
    fn stale_entry_can_be_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fifo");

        std::fs::write(&path, "stale").unwrap();
        remove_fifo(&path).unwrap();
        create_fifo(&path).unwrap();

        let file_type = std::fs::metadata(&path).unwrap().file_type();
        assert!(file_type.is_fifo());
    }

    #[test]
    fn temp_fifo_has_userscript_prefix() {
        let dir = TempDir::new().unwrap();

        let path = make_temp_fifo(dir.path()).unwrap();

        assert_eq!(path.parent().unwrap(), dir.path());
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("userscript-"));
        let file_type = std::fs::metadata(&path).unwrap().file_type();
        assert!(file_type.is_fifo());
    }

    #[test]
    fn temp_fifos_get_unique_paths() {
        let dir = TempDir::new().unwrap();

        let first = make_temp_fifo(dir.path()).unwrap();
        let second = make_temp_fifo(dir.path()).unwrap();
        assert_ne!(first, second);
    }
}
