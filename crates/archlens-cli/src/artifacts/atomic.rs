use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{ArtifactError, ArtifactResult};

/// Replace `path` with `data` through a temporary sibling and a rename.
pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> ArtifactResult<()> {
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    std::fs::rename(&tmp_path, path)?;
    if let Some(parent) = parent {
        sync_dir(parent)?;
    }

    Ok(())
}

fn temp_path(path: &Path) -> ArtifactResult<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| ArtifactError::InvalidPath(path.display().to_string()))?;
    let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

#[cfg(unix)]
fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(path)?;
    dir.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn overwrites_existing_file_without_leaving_temp() {
        let dir = std::env::temp_dir().join(format!("archlens-atomic-{}", Uuid::new_v4()));
        let path = dir.join("nested").join("report.txt");

        write_bytes_atomic(&path, b"first run, longer content").expect("first write");
        write_bytes_atomic(&path, b"second").expect("second write");

        assert_eq!(std::fs::read_to_string(&path).expect("read"), "second");
        assert!(!path.with_file_name(".report.txt.tmp").exists());

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn rejects_paths_without_file_name() {
        let err = write_bytes_atomic(Path::new("/"), b"data").expect_err("root has no name");
        assert!(matches!(err, ArtifactError::InvalidPath(_)));
    }
}
