use std::collections::HashSet;

use crate::error::StorageError;
use crate::processor::ImageResult;

pub const CSV_HEADER: [&str; 2] = ["file", "url"];

/// One extracted link and the image it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlOccurrence {
    pub source_base_name: String,
    pub url: String,
}

/// Every link of every image, in processing order, duplicates included.
pub fn collect_occurrences(results: &[ImageResult]) -> Vec<UrlOccurrence> {
    results
        .iter()
        .flat_map(|result| {
            result.urls.iter().map(|url| UrlOccurrence {
                source_base_name: result.source_base_name.clone(),
                url: url.clone(),
            })
        })
        .collect()
}

/// Unique links in first-seen order.
pub fn dedup_urls(occurrences: &[UrlOccurrence]) -> Vec<&str> {
    let mut seen = HashSet::new();
    occurrences
        .iter()
        .map(|o| o.url.as_str())
        .filter(|url| seen.insert(*url))
        .collect()
}

/// One link per line; the trailing newline is only present when non-empty.
pub fn render_url_list(unique_urls: &[&str]) -> String {
    if unique_urls.is_empty() {
        String::new()
    } else {
        format!("{}\n", unique_urls.join("\n"))
    }
}

/// `file,url` CSV with one row per occurrence and CRLF record terminators.
pub fn render_url_csv(occurrences: &[UrlOccurrence]) -> Result<Vec<u8>, StorageError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for occurrence in occurrences {
        writer.write_record([occurrence.source_base_name.as_str(), occurrence.url.as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|e| StorageError::Csv(csv::Error::from(e.into_error())))
}
