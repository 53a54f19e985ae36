//! Isolated scratch directories plus a one-call pipeline run.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use ocrharvest::pipeline::NoopProgress;
use ocrharvest::{
    OcrEngine, Pipeline, PipelineConfig, PipelineError, ProgressEvent, ProgressReporter,
    RunReport, RunSummary,
};

/// Collects progress events so tests can assert on them.
#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<ProgressEvent>>,
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct TestHarness {
    temp_dir: TempDir,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub languages: Vec<String>,
    pub workers: usize,
}

impl TestHarness {
    /// Creates `input/` inside a fresh temp dir. `output/` is left for the
    /// pipeline to create.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let input_dir = temp_dir.path().join("input");
        let output_dir = temp_dir.path().join("output");
        std::fs::create_dir_all(&input_dir).expect("Failed to create input dir");

        Self {
            temp_dir,
            input_dir,
            output_dir,
            languages: vec!["en-US".to_string(), "pl-PL".to_string()],
            workers: 1,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes placeholder bytes; the fake engine never decodes them.
    pub fn add_images(&self, names: &[&str]) {
        for name in names {
            std::fs::write(self.input_dir.join(name), b"not really an image")
                .expect("Failed to write input file");
        }
    }

    pub fn pipeline(&self, engine: Arc<dyn OcrEngine>) -> Pipeline {
        let config = Arc::new(PipelineConfig {
            input_directory: self.input_dir.clone(),
            output_directory: self.output_dir.clone(),
            languages: self.languages.clone(),
            workers: self.workers,
            text_dir_name: "txt".to_string(),
        });
        Pipeline::new(config, engine)
    }

    pub fn try_run(&self, engine: Arc<dyn OcrEngine>) -> Result<RunReport, PipelineError> {
        self.pipeline(engine).run(&NoopProgress)
    }

    /// Runs the pipeline and expects at least one image to have been found.
    pub fn run(&self, engine: Arc<dyn OcrEngine>) -> RunSummary {
        match self.try_run(engine).expect("Pipeline run failed") {
            RunReport::Completed(summary) => summary,
            RunReport::NoImages => panic!("Expected images to be discovered"),
        }
    }

    pub fn output_file(&self, relative: &str) -> PathBuf {
        self.output_dir.join(relative)
    }

    pub fn read_output(&self, relative: &str) -> String {
        std::fs::read_to_string(self.output_file(relative))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative, e))
    }

    pub fn read_output_bytes(&self, relative: &str) -> Vec<u8> {
        std::fs::read(self.output_file(relative))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative, e))
    }
}
