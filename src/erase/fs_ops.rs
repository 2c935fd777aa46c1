use std::fs;
use std::io;
use std::path::Path;

/// Filesystem mutations used by the wipe engine.
pub trait FileOps: Send + Sync {
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Clear read-only protection so a following delete can succeed
    fn make_writable(&self, path: &Path) -> io::Result<()>;
}

/// Direct host filesystem access.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostFs;

impl FileOps for HostFs {
    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    #[cfg(unix)]
    fn make_writable(&self, path: &Path) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o777))
    }

    #[cfg(not(unix))]
    fn make_writable(&self, path: &Path) -> io::Result<()> {
        let mut perms = fs::metadata(path)?.permissions();
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
        fs::set_permissions(path, perms)
    }
}
