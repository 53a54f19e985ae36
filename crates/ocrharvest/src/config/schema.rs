use serde::{Deserialize, Serialize};

/// Image extensions picked up by the scanner, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 8] = extension_names();

const EXTENSION_FORMATS: [(&str, ImageFormat); 8] = [
    ("png", ImageFormat::Png),
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("bmp", ImageFormat::Bmp),
    ("gif", ImageFormat::Gif),
    ("heic", ImageFormat::Heic),
];

const fn extension_names() -> [&'static str; EXTENSION_FORMATS.len()] {
    let mut names = [""; EXTENSION_FORMATS.len()];
    let mut i = 0;
    while i < EXTENSION_FORMATS.len() {
        names[i] = EXTENSION_FORMATS[i].0;
        i += 1;
    }
    names
}

/// Language hints used when none are given on the command line.
pub const DEFAULT_LANGUAGES: [&str; 2] = ["en-US", "pl-PL"];

pub const CONFIG_VERSION: &str = "1.0";

/// Run configuration, optionally loaded from a JSON file.
///
/// Values given on the command line take precedence over the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunConfig {
    #[serde(default = "default_version")]
    pub version: String,
    /// BCP-47 language hints passed to the OCR engine.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Number of OCR workers. `1` runs sequentially, `0` means one per CPU.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Name of the per-image text subdirectory inside the output directory.
    #[serde(default = "default_text_dir_name")]
    pub text_dir_name: String,
    /// Directory holding Tesseract `*.traineddata` files. Tesseract's own
    /// default location is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tessdata_dir: Option<String>,
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

pub fn default_languages() -> Vec<String> {
    DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect()
}

fn default_workers() -> usize {
    1
}

fn default_text_dir_name() -> String {
    "txt".to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            languages: default_languages(),
            workers: default_workers(),
            text_dir_name: default_text_dir_name(),
            tessdata_dir: None,
        }
    }
}

impl RunConfig {
    /// Resolves `workers == 0` to the number of logical CPUs.
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Tiff,
    Bmp,
    Gif,
    Heic,
}

impl ImageFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        EXTENSION_FORMATS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(ext))
            .map(|&(_, format)| format)
    }

    /// Whether the bundled `image` decoders can read this format.
    pub fn is_decodable(&self) -> bool {
        !matches!(self, Self::Heic)
    }
}
