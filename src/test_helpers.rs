//! Test utilities for creating temporary files to tail.

#[cfg(test)]
use std::fs::{File, OpenOptions};
#[cfg(test)]
use std::io::Write;
#[cfg(test)]
use std::path::{Path, PathBuf};

#[cfg(test)]
pub struct TempLogFile {
    path: PathBuf,
    _temp_dir: tempfile::TempDir,
}

#[cfg(test)]
impl TempLogFile {
    /// Create an empty temporary file in its own directory.
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("test.log");

        File::create(&path)?;

        Ok(Self {
            path,
            _temp_dir: temp_dir,
        })
    }

    /// Create a temporary file holding exactly `content` (no separator added).
    pub fn with_content(content: &str) -> std::io::Result<Self> {
        let temp_file = Self::new()?;
        temp_file.append(content)?;
        Ok(temp_file)
    }

    /// Append raw bytes to the file; callers include line endings themselves.
    pub fn append(&self, content: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Delete the file, leaving its directory in place.
    pub fn remove(&self) -> std::io::Result<()> {
        std::fs::remove_file(&self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_an_empty_file() {
        let temp_file = TempLogFile::new().unwrap();
        assert!(temp_file.path().exists());
        assert_eq!(std::fs::read_to_string(temp_file.path()).unwrap(), "");
    }

    #[test]
    fn append_is_verbatim() {
        let temp_file = TempLogFile::with_content("line 1\n").unwrap();
        temp_file.append("no newline yet").unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(content, "line 1\nno newline yet");
    }

    #[test]
    fn remove_deletes_the_file() {
        let temp_file = TempLogFile::with_content("gone\n").unwrap();
        temp_file.remove().unwrap();
        assert!(!temp_file.path().exists());
    }
}
