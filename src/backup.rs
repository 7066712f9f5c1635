use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use filetime::{set_file_times, FileTime};
use tracing::{debug, info};

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `pdf-files` + timestamp => `pdf-files-backup-20240101_120000`
pub fn backup_dir_name(input_dir: &Path, now: &DateTime<Local>) -> String {
    let base = input_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "html".to_string());
    format!("{}-backup-{}", base, now.format(TIMESTAMP_FORMAT))
}

/// Creates a fresh backup directory next to `input_dir`.
///
/// An existing directory is never reused: when two runs land in the same
/// second the later one gets `_1`, `_2`, ... appended.
pub fn create_backup_dir(input_dir: &Path, now: &DateTime<Local>) -> io::Result<PathBuf> {
    let parent = input_dir.parent().unwrap_or_else(|| Path::new("."));
    let name = backup_dir_name(input_dir, now);

    let mut candidate = parent.join(&name);
    let mut suffix = 0u32;
    loop {
        match fs::create_dir(&candidate) {
            Ok(()) => {
                info!(path = %candidate.display(), "created backup directory");
                return Ok(candidate);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                suffix += 1;
                debug!(path = %candidate.display(), "backup directory taken");
                candidate = parent.join(format!("{name}_{suffix}"));
            }
            Err(e) => return Err(e),
        }
    }
}

/// Copy `src` into `dest_dir` keeping its name, permissions and timestamps.
pub fn copy_preserving(src: &Path, dest_dir: &Path) -> io::Result<PathBuf> {
    let file_name = src.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", src.display()),
        )
    })?;
    let dest = dest_dir.join(file_name);

    fs::copy(src, &dest)?;
    let meta = fs::metadata(src)?;
    set_file_times(
        &dest,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )?;

    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()
    }

    #[test]
    fn name_uses_input_dir_and_timestamp() {
        let name = backup_dir_name(Path::new("public/pdf-files"), &fixed_time());
        assert_eq!(name, "pdf-files-backup-20240309_070501");
    }

    #[test]
    fn backup_dir_is_sibling_of_input() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("pdf-files");
        fs::create_dir(&input).unwrap();

        let dir = create_backup_dir(&input, &fixed_time()).unwrap();
        assert_eq!(dir.parent(), Some(tmp.path()));
        assert!(dir.is_dir());
    }

    #[test]
    fn same_second_runs_get_distinct_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("pdf-files");
        fs::create_dir(&input).unwrap();

        let first = create_backup_dir(&input, &fixed_time()).unwrap();
        let second = create_backup_dir(&input, &fixed_time()).unwrap();
        let third = create_backup_dir(&input, &fixed_time()).unwrap();

        assert_ne!(first, second);
        assert!(second.to_string_lossy().ends_with("_1"));
        assert!(third.to_string_lossy().ends_with("_2"));
    }

    #[test]
    fn copy_keeps_bytes_and_mtime() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("a.html");
        fs::write(&src, "<style>x</style>").unwrap();
        let old = FileTime::from_unix_time(1_000_000_000, 0);
        filetime::set_file_mtime(&src, old).unwrap();

        let dest_dir = tmp.path().join("backup");
        fs::create_dir(&dest_dir).unwrap();
        let dest = copy_preserving(&src, &dest_dir).unwrap();

        assert_eq!(dest, dest_dir.join("a.html"));
        assert_eq!(fs::read(&dest).unwrap(), b"<style>x</style>");
        let copied = FileTime::from_last_modification_time(&fs::metadata(&dest).unwrap());
        assert_eq!(copied, old);
    }
}
