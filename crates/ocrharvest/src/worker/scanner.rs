use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{ImageFormat, SUPPORTED_EXTENSIONS};

pub struct ImageScanner {
    input_directory: PathBuf,
}

impl ImageScanner {
    pub fn new<P: AsRef<Path>>(input_directory: P) -> Self {
        Self {
            input_directory: input_directory.as_ref().to_path_buf(),
        }
    }

    pub fn input_directory(&self) -> &Path {
        &self.input_directory
    }

    /// Lists supported, non-hidden image files at the top level of the input
    /// directory, sorted case-insensitively by file name.
    ///
    /// A missing input directory, or one that is not a directory, yields an
    /// empty list.
    pub fn scan(&self) -> Vec<PathBuf> {
        if !self.input_directory.is_dir() {
            warn!(
                "Input directory {} does not exist or is not a directory",
                self.input_directory.display()
            );
            return Vec::new();
        }

        let mut images = Vec::new();

        for entry in WalkDir::new(&self.input_directory)
            .min_depth(1)
            .max_depth(1) // Only scan top level, not subdirectories
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();

            // Follows symlinks, so links to files count and links to directories don't
            if !path.is_file() {
                continue;
            }

            // Names need not be UTF-8; only the extension has to be
            if is_hidden(entry.file_name()) {
                continue;
            }

            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if ImageFormat::from_extension(ext).is_some() {
                    debug!("Found image: {}", path.display());
                    images.push(path.to_path_buf());
                }
            }
        }

        sort_by_file_name(&mut images);

        if images.is_empty() {
            info!(
                "No files with a supported extension ({}) in {}",
                SUPPORTED_EXTENSIONS.join(", "),
                self.input_directory.display()
            );
        }

        info!(
            "Scanned {} images in {}",
            images.len(),
            self.input_directory.display()
        );
        images
    }
}

fn is_hidden(name: &OsStr) -> bool {
    name.as_encoded_bytes().starts_with(b".")
}

fn sort_by_file_name(paths: &mut [PathBuf]) {
    paths.sort_by_cached_key(|p| {
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        (name.to_lowercase(), name)
    });
}
