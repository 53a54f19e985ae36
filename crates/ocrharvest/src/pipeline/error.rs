use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Writing output failed: {0}")]
    Storage(#[from] crate::error::StorageError),

    #[error("OCR workers failed: {0}")]
    Worker(#[from] crate::error::WorkerError),
}
