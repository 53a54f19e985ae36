use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;

/// Writes `content` to a temporary sibling of `path`, then renames it into
/// place. Readers see either the previous file or the complete new one.
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), StorageError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| StorageError::InvalidName(path.display().to_string()))?;
    let tmp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()));

    let write_result = std::fs::File::create(&tmp_path).and_then(|mut file| {
        file.write_all(content)?;
        file.sync_all()
    });
    if let Err(e) = write_result {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(StorageError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        });
    }

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        StorageError::MoveFile {
            from: tmp_path.clone(),
            to: path.to_path_buf(),
            source: e,
        }
    })
}

/// Owns the output directory layout: aggregate artifacts at the top level,
/// one text file per image in the text subdirectory.
pub struct FileStorage {
    output_directory: PathBuf,
    text_directory: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(output_directory: P, text_dir_name: &str) -> Self {
        let output_directory = output_directory.as_ref().to_path_buf();
        let text_directory = output_directory.join(text_dir_name);
        Self {
            output_directory,
            text_directory,
        }
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn text_directory(&self) -> &Path {
        &self.text_directory
    }

    /// Creates the output directory and its text subdirectory if absent.
    pub fn prepare(&self) -> Result<(), StorageError> {
        self.ensure_directory(&self.output_directory)?;
        self.ensure_directory(&self.text_directory)
    }

    /// Path of the text file for an image, whether or not it exists yet.
    pub fn text_path(&self, base_name: &str) -> PathBuf {
        self.text_directory.join(format!("{}.txt", base_name))
    }

    /// Writes (or overwrites) the text file for one image.
    pub fn write_text(&self, base_name: &str, text: &str) -> Result<PathBuf, StorageError> {
        validate_name(base_name)?;
        let path = self.text_path(base_name);
        write_atomic(&path, text.as_bytes())?;
        Ok(path)
    }

    /// Writes (or overwrites) an aggregate artifact in the output directory.
    pub fn write_artifact(&self, file_name: &str, content: &[u8]) -> Result<PathBuf, StorageError> {
        validate_name(file_name)?;
        let path = self.output_directory.join(file_name);
        write_atomic(&path, content)?;
        Ok(path)
    }

    fn ensure_directory(&self, path: &Path) -> Result<(), StorageError> {
        if !path.is_dir() {
            std::fs::create_dir_all(path).map_err(|e| StorageError::CreateDirectory {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }
}

/// Accepts exactly one normal path component, so a name can never leave the
/// directory it is joined onto. Characters that are not separators on this
/// platform (such as `\` on Unix) are kept as part of the name.
fn validate_name(name: &str) -> Result<(), StorageError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(()),
        _ => Err(StorageError::InvalidName(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_creates_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("deep/out");
        let storage = FileStorage::new(&output, "txt");

        storage.prepare().unwrap();
        assert!(output.is_dir());
        assert!(output.join("txt").is_dir());

        // Idempotent
        storage.prepare().unwrap();
    }

    #[test]
    fn test_prepare_fails_when_output_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("taken");
        std::fs::write(&output, b"file").unwrap();

        let result = FileStorage::new(&output, "txt").prepare();
        assert!(matches!(result, Err(StorageError::CreateDirectory { .. })));
    }

    #[test]
    fn test_write_text() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), "txt");
        storage.prepare().unwrap();

        let path = storage.write_text("chat", "hello").unwrap();
        assert_eq!(path, temp_dir.path().join("txt/chat.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_write_empty_text() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), "txt");
        storage.prepare().unwrap();

        let path = storage.write_text("blank", "").unwrap();
        assert!(path.exists());
        assert!(std::fs::read(&path).unwrap().is_empty());
    }

    #[test]
    fn test_write_artifact_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), "txt");
        storage.prepare().unwrap();

        storage.write_artifact("urls.txt", b"first, longer content").unwrap();
        let path = storage.write_artifact("urls.txt", b"second").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_no_temporary_files_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), "txt");
        storage.prepare().unwrap();

        storage.write_artifact("all_text.md", b"# OCR Output\n").unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_without_prepare_fails() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("missing"), "txt");

        let result = storage.write_text("a", "text");
        assert!(matches!(result, Err(StorageError::WriteFile { .. })));
    }

    #[test]
    fn test_rejects_names_with_separators() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), "txt");
        storage.prepare().unwrap();

        for name in ["../escape", "a/b", "", "..", ".", "a/", "./a", "/abs"] {
            assert!(
                matches!(
                    storage.write_artifact(name, b"x"),
                    Err(StorageError::InvalidName(_))
                ),
                "'{}' should be rejected",
                name
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_backslash_is_an_ordinary_character() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), "txt");
        storage.prepare().unwrap();

        let path = storage.write_text("shot\\1", "text").unwrap();
        assert_eq!(path, temp_dir.path().join("txt").join("shot\\1.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "text");
    }

    #[test]
    fn test_accessors() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), "pages");

        assert_eq!(storage.output_directory(), temp_dir.path());
        assert_eq!(storage.text_directory(), temp_dir.path().join("pages"));
        assert_eq!(
            storage.text_path("x"),
            temp_dir.path().join("pages").join("x.txt")
        );
    }
}
