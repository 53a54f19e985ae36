use std::fmt::Write;
use std::path::PathBuf;

use super::runner::RunSummary;

/// Events emitted by the pipeline during a run, in discovery order.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The input directory held no eligible images; nothing was written.
    NoImages,
    Discovered {
        count: usize,
    },
    ImageDone {
        file_name: String,
        text_path: PathBuf,
        chars: usize,
        links: usize,
        failed: bool,
    },
    Completed(RunSummary),
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Prints per-image lines and the final summary to stdout.
pub struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        if let Some(text) = render_event(&event) {
            println!("{}", text);
        }
    }
}

/// User-facing text for an event, if it has any.
pub fn render_event(event: &ProgressEvent) -> Option<String> {
    match event {
        ProgressEvent::NoImages => Some("No images found.".to_string()),
        ProgressEvent::Discovered { .. } => None,
        ProgressEvent::ImageDone {
            file_name,
            text_path,
            chars,
            links,
            ..
        } => Some(format!(
            "OCR: {} -> {} ({} chars, {} links)",
            file_name,
            text_path.display(),
            chars,
            links
        )),
        ProgressEvent::Completed(summary) => Some(render_summary(summary)),
    }
}

pub fn render_summary(summary: &RunSummary) -> String {
    let outputs = &summary.outputs;
    let mut text = String::from("\nDone.\n");

    // Writing to a String cannot fail
    let _ = writeln!(text, "- Images: {}", summary.image_count);
    if summary.failed_count > 0 {
        let _ = writeln!(text, "- Failed OCR: {}", summary.failed_count);
    }
    let _ = writeln!(text, "- Per-image text: {}", outputs.text_dir.display());
    let _ = writeln!(text, "- Combined markdown: {}", outputs.markdown.display());
    let _ = writeln!(text, "- Combined text: {}", outputs.plain_text.display());
    let _ = writeln!(text, "- URLs (dedup): {}", outputs.urls.display());
    let _ = write!(text, "- URL map CSV: {}", outputs.url_map.display());

    text
}
