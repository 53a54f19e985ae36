pub mod links;
pub mod markdown;
pub mod plain;

use std::path::PathBuf;

pub use links::{collect_occurrences, dedup_urls, UrlOccurrence};

use crate::error::StorageError;
use crate::processor::ImageResult;

pub const MARKDOWN_FILE: &str = "all_text.md";
pub const PLAIN_TEXT_FILE: &str = "all_text.txt";
pub const URL_LIST_FILE: &str = "urls.txt";
pub const URL_MAP_FILE: &str = "urls.csv";

/// Contents of the four aggregate files for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub markdown: String,
    pub plain_text: String,
    pub url_list: String,
    pub url_csv: Vec<u8>,
    pub url_count: usize,
    pub unique_url_count: usize,
}

impl Artifacts {
    /// Renders all aggregate artifacts from results in processing order.
    pub fn build(results: &[ImageResult]) -> Result<Self, StorageError> {
        let sections: Vec<String> = results.iter().map(markdown::render_section).collect();

        let occurrences = collect_occurrences(results);
        let unique = dedup_urls(&occurrences);

        Ok(Self {
            markdown: markdown::render_document(&sections),
            plain_text: plain::render_document(&sections),
            url_list: links::render_url_list(&unique),
            url_csv: links::render_url_csv(&occurrences)?,
            url_count: occurrences.len(),
            unique_url_count: unique.len(),
        })
    }
}

/// Paths of everything written by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutputs {
    pub text_dir: PathBuf,
    pub per_image: Vec<PathBuf>,
    pub markdown: PathBuf,
    pub plain_text: PathBuf,
    pub urls: PathBuf,
    pub url_map: PathBuf,
}
