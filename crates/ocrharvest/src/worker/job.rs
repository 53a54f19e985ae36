use std::path::PathBuf;

use crate::processor::ImageResult;

#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    /// Position of the image in discovery order.
    pub index: usize,
    pub source_path: PathBuf,
}

impl Job {
    pub fn new(index: usize, source_path: PathBuf) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            index,
            source_path,
        }
    }

    /// Creates one job per path, indexed in the given order.
    pub fn batch(paths: &[PathBuf]) -> Vec<Self> {
        paths
            .iter()
            .enumerate()
            .map(|(index, path)| Self::new(index, path.clone()))
            .collect()
    }
}

#[derive(Debug)]
pub struct JobResult {
    pub job_id: String,
    pub index: usize,
    pub source_path: PathBuf,
    pub image: ImageResult,
}

impl JobResult {
    pub fn new(job: &Job, image: ImageResult) -> Self {
        Self {
            job_id: job.id.clone(),
            index: job.index,
            source_path: job.source_path.clone(),
            image,
        }
    }
}
