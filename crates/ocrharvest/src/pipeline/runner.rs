use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, info_span};

use crate::output::{
    Artifacts, RunOutputs, MARKDOWN_FILE, PLAIN_TEXT_FILE, URL_LIST_FILE, URL_MAP_FILE,
};
use crate::processor::{ImageProcessor, ImageResult, OcrEngine};
use crate::sanitize;
use crate::storage::FileStorage;
use crate::worker::{process_all, process_one, ImageScanner};

use super::config::PipelineConfig;
use super::error::PipelineError;
use super::progress::{ProgressEvent, ProgressReporter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub image_count: usize,
    pub failed_count: usize,
    pub url_count: usize,
    pub unique_url_count: usize,
    pub outputs: RunOutputs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    /// No eligible images were found; nothing was written.
    NoImages,
    Completed(RunSummary),
}

pub struct Pipeline {
    config: Arc<PipelineConfig>,
    processor: ImageProcessor,
    storage: FileStorage,
}

impl Pipeline {
    pub fn new(config: Arc<PipelineConfig>, engine: Arc<dyn OcrEngine>) -> Self {
        let processor = ImageProcessor::new(engine, &config.languages);
        let storage = FileStorage::new(&config.output_directory, &config.text_dir_name);

        Self {
            config,
            processor,
            storage,
        }
    }

    /// Processes every image in the input directory and writes all artifacts.
    ///
    /// OCR failures on individual images never abort the run; failing to
    /// write any output file does.
    pub fn run(&self, progress: &dyn ProgressReporter) -> Result<RunReport, PipelineError> {
        let run_id = uuid::Uuid::new_v4();
        let _run_span = info_span!("run",
            run_id = %run_id,
            input = %sanitize::redact_path(&self.config.input_directory),
            workers = self.config.workers,
        )
        .entered();

        let images = {
            let _step = info_span!("discover").entered();
            ImageScanner::new(&self.config.input_directory).scan()
        };

        if images.is_empty() {
            info!("No images to process");
            progress.report(ProgressEvent::NoImages);
            return Ok(RunReport::NoImages);
        }

        progress.report(ProgressEvent::Discovered {
            count: images.len(),
        });

        self.storage.prepare()?;

        let mut results = Vec::with_capacity(images.len());
        let mut per_image = Vec::with_capacity(images.len());

        {
            let _step = info_span!("recognize", images = images.len()).entered();

            if self.config.workers <= 1 {
                for path in &images {
                    let image = process_one(&self.processor, path);
                    per_image.push(self.record_image(path, &image, progress)?);
                    results.push(image);
                }
            } else {
                let recognized = process_all(&self.processor, &images, self.config.workers)?;
                for (path, image) in images.iter().zip(recognized) {
                    per_image.push(self.record_image(path, &image, progress)?);
                    results.push(image);
                }
            }
        }

        let _step = info_span!("aggregate").entered();
        let artifacts = Artifacts::build(&results)?;

        let outputs = RunOutputs {
            text_dir: self.storage.text_directory().to_path_buf(),
            per_image,
            markdown: self
                .storage
                .write_artifact(MARKDOWN_FILE, artifacts.markdown.as_bytes())?,
            plain_text: self
                .storage
                .write_artifact(PLAIN_TEXT_FILE, artifacts.plain_text.as_bytes())?,
            urls: self
                .storage
                .write_artifact(URL_LIST_FILE, artifacts.url_list.as_bytes())?,
            url_map: self.storage.write_artifact(URL_MAP_FILE, &artifacts.url_csv)?,
        };

        let summary = RunSummary {
            image_count: results.len(),
            failed_count: results.iter().filter(|r| r.is_failure()).count(),
            url_count: artifacts.url_count,
            unique_url_count: artifacts.unique_url_count,
            outputs,
        };

        info!(
            images = summary.image_count,
            failed = summary.failed_count,
            urls = summary.url_count,
            unique_urls = summary.unique_url_count,
            "Run completed"
        );
        progress.report(ProgressEvent::Completed(summary.clone()));

        Ok(RunReport::Completed(summary))
    }

    fn record_image(
        &self,
        path: &Path,
        image: &ImageResult,
        progress: &dyn ProgressReporter,
    ) -> Result<PathBuf, PipelineError> {
        let text_path = self
            .storage
            .write_text(&image.source_base_name, &image.recognized_text)?;

        debug!(
            "Wrote {} -> {}",
            sanitize::redact_path(path),
            sanitize::redact_path(&text_path)
        );

        progress.report(ProgressEvent::ImageDone {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| image.source_base_name.clone()),
            text_path: text_path.clone(),
            chars: image.char_count(),
            links: image.urls.len(),
            failed: image.is_failure(),
        });

        Ok(text_path)
    }
}
