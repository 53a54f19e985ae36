pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod processor;
pub mod sanitize;
pub mod storage;
pub mod worker;

pub use config::{load_config, parse_language_tags, ImageFormat, RunConfig};
pub use error::{
    ConfigError, HarvestError, ProcessError, Result, StorageError, WorkerError,
};
pub use output::{Artifacts, RunOutputs, UrlOccurrence};
pub use pipeline::{
    ConsoleProgress, Pipeline, PipelineConfig, PipelineError, ProgressEvent, ProgressReporter,
    RunReport, RunSummary,
};
pub use processor::{
    extract_urls, reconstruct, BoundingBox, ImageProcessor, ImageResult, OcrEngine, OcrOutcome,
    RecognitionStatus, TesseractEngine, TextRegion,
};
