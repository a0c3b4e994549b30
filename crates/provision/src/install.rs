use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use std::io::Write;
use std::path::Path;

/// Extract `member` from a verified archive and publish it at `destination`.
///
/// The member is staged in a temporary file next to `destination` and renamed
/// into place once complete and executable, so `destination` either keeps its
/// previous state or holds the whole binary.
pub(crate) fn install(archive: &[u8], member: &str, destination: &Path) -> Result<()> {
    let directory = destination.parent().ok_or_raise(|| ErrorKind::InvalidPath(destination.to_path_buf()))?;
    let io = || ErrorKind::Io(destination.to_path_buf());

    let mut builder = tempfile::Builder::new();
    builder.prefix(".sccache-").suffix(".partial");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }
    let mut staged = builder.tempfile_in(directory).or_raise(io)?;

    let size = ciprep_archive::extract_member(archive, member, staged.as_file_mut())
        .or_raise(|| ErrorKind::Extract(member.to_string()))?;
    staged.as_file_mut().flush().or_raise(io)?;
    staged.as_file().sync_all().or_raise(io)?;
    #[cfg(unix)]
    make_executable(staged.path())?;

    staged.persist(destination).or_raise(io)?;
    tracing::debug!(size, path = %destination.display(), "Installed binary");
    Ok(())
}

/// Add execute permission for user, group and other, keeping every other bit.
#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let io = || ErrorKind::Io(path.to_path_buf());
    let mut permissions = std::fs::metadata(path).or_raise(io)?.permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    std::fs::set_permissions(path, permissions).or_raise(io)
}
