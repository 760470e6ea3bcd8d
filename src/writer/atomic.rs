use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::warn;

/// Output written to a temp file beside its destination and renamed into
/// place on `commit`. Dropping it uncommitted removes the temp file, so a
/// failed run never leaves partial output behind.
pub struct StagedFile {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    pub fn new(target: &Path) -> Result<Self> {
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let temp = NamedTempFile::new_in(&dir)
            .with_context(|| format!("Output directory is not writable: {:?}", dir))?;

        Ok(Self {
            temp,
            target: target.to_path_buf(),
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn commit(mut self) -> Result<()> {
        self.temp
            .flush()
            .with_context(|| format!("Failed to flush output for {:?}", self.target))?;
        self.temp
            .as_file()
            .sync_all()
            .with_context(|| format!("Failed to sync output for {:?}", self.target))?;
        self.temp
            .persist(&self.target)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to move output into place: {:?}", self.target))?;
        Ok(())
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.temp.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.temp.flush()
    }
}

/// Commit a group of staged files produced by one stage.
///
/// Renames happen one at a time. If one fails, the targets already moved
/// into place by this call are removed again and the rest are discarded,
/// so the group lands whole or not at all. A target that existed before the
/// call is removed rather than restored.
pub fn commit_all(files: Vec<StagedFile>) -> Result<()> {
    let mut committed: Vec<PathBuf> = Vec::with_capacity(files.len());
    for file in files {
        let target = file.target().to_path_buf();
        if let Err(err) = file.commit() {
            for path in &committed {
                if let Err(remove_err) = std::fs::remove_file(path) {
                    warn!(path = ?path, error = %remove_err, "could not roll back committed output");
                }
            }
            return Err(err);
        }
        committed.push(target);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_moves_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.csv");

        let mut staged = StagedFile::new(&target).unwrap();
        staged.write_all(b"a,b\n").unwrap();
        assert!(!target.exists());

        staged.commit().unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "a,b\n");
    }

    #[test]
    fn test_drop_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.csv");
        {
            let mut staged = StagedFile::new(&target).unwrap();
            staged.write_all(b"partial").unwrap();
        }
        assert!(!target.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_group_commit_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("star_catalog.csv");
        // a non-empty directory cannot be replaced by a file
        let blocked = dir.path().join("star_map.txt");
        std::fs::create_dir(&blocked).unwrap();
        std::fs::write(blocked.join("keep"), b"x").unwrap();

        let mut a = StagedFile::new(&first).unwrap();
        a.write_all(b"id\n").unwrap();
        let mut b = StagedFile::new(&blocked).unwrap();
        b.write_all(b"map").unwrap();

        assert!(commit_all(vec![a, b]).is_err());
        assert!(!first.exists());
        // only the blocking directory is left
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_unwritable_directory() {
        assert!(StagedFile::new(Path::new("/nonexistent-dir/out.csv")).is_err());
    }
}
