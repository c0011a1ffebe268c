//! Raw upload bytes on the local filesystem.
//!
//! Files are named after the MD5 of their contents plus a random suffix, so
//! two users uploading the same workbook never share (or delete) one copy.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct UploadStorage {
    root: PathBuf,
}

impl UploadStorage {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(UploadStorage { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` under the storage root and returns the path recorded on
    /// the `FileRecord`.
    pub fn save(&self, bytes: &[u8], extension: &str) -> io::Result<String> {
        let digest = md5::compute(bytes);
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let file_name = format!("{:x}-{}.{}", digest, &suffix[..8], extension);
        let path = self.root.join(file_name);

        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(bytes)?;
        writer.flush()?;

        Ok(path.to_string_lossy().into_owned())
    }

    /// Removes previously saved bytes. A missing file is not an error.
    pub fn remove(&self, path: &str) -> io::Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = UploadStorage::new(dir.path().join("uploads")).unwrap();

        let path = storage.save(b"month,sales\nJan,10\n", "csv").unwrap();
        assert!(path.ends_with(".csv"));
        assert!(path.contains(&format!("{:x}", md5::compute(b"month,sales\nJan,10\n"))));
        assert_eq!(fs::read(&path).unwrap(), b"month,sales\nJan,10\n");

        storage.remove(&path).unwrap();
        assert!(!Path::new(&path).exists());
        // second removal is a no-op
        storage.remove(&path).unwrap();
    }

    #[test]
    fn identical_uploads_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let storage = UploadStorage::new(dir.path()).unwrap();
        let first = storage.save(b"a,b\n1,2\n", "csv").unwrap();
        let second = storage.save(b"a,b\n1,2\n", "csv").unwrap();
        assert_ne!(first, second);
    }
}
