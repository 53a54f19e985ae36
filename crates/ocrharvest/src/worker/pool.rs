use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, error, info};

use crate::error::WorkerError;
use crate::processor::{base_name, ImageProcessor, ImageResult, RecognitionStatus};
use crate::worker::job::{Job, JobResult};

/// Fixed-size pool of OCR threads.
///
/// Results arrive in completion order; callers restore discovery order from
/// [`JobResult::index`]. [`process_all`] does this for a whole batch.
pub struct WorkerPool {
    job_sender: Sender<Job>,
    result_receiver: Receiver<JobResult>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(processor: ImageProcessor, worker_count: usize) -> Result<Self, WorkerError> {
        if worker_count == 0 {
            return Err(WorkerError::SpawnFailed(
                "worker_count must be > 0".to_string(),
            ));
        }

        let (job_sender, job_receiver) = bounded::<Job>(worker_count * 2);
        let (result_sender, result_receiver) = bounded::<JobResult>(worker_count * 2);

        let mut workers = Vec::with_capacity(worker_count);

        for worker_id in 0..worker_count {
            let job_rx = job_receiver.clone();
            let result_tx = result_sender.clone();
            let worker_processor = processor.clone();

            let handle = thread::Builder::new()
                .name(format!("ocr-worker-{}", worker_id))
                .spawn(move || {
                    run_worker(worker_id, job_rx, result_tx, worker_processor);
                })
                .map_err(|e| WorkerError::SpawnFailed(e.to_string()))?;

            workers.push(handle);
        }

        info!("Started {} OCR workers", worker_count);

        Ok(Self {
            job_sender,
            result_receiver,
            workers,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn submit(&self, job: Job) -> Result<(), WorkerError> {
        self.job_sender
            .send(job)
            .map_err(|_| WorkerError::ChannelClosed)
    }

    pub fn recv_result(&self) -> Option<JobResult> {
        self.result_receiver.recv().ok()
    }

    /// Closes the job queue and joins every worker once it has drained.
    pub fn wait(self) -> Result<(), WorkerError> {
        // Drop sender to signal workers to exit
        drop(self.job_sender);

        let mut first_panic = None;
        for (i, worker) in self.workers.into_iter().enumerate() {
            if let Err(e) = worker.join() {
                error!("Worker {} panicked: {:?}", i, e);
                first_panic.get_or_insert(i);
            } else {
                debug!("Worker {} finished", i);
            }
        }

        info!("All workers have stopped");
        match first_panic {
            Some(i) => Err(WorkerError::Panicked(i)),
            None => Ok(()),
        }
    }
}

fn run_worker(
    worker_id: usize,
    job_receiver: Receiver<Job>,
    result_sender: Sender<JobResult>,
    processor: ImageProcessor,
) {
    debug!("Worker {} started", worker_id);

    // Ends once the sender is dropped and the queue is drained
    for job in job_receiver.iter() {
        debug!("Worker {} processing job: {:?}", worker_id, job.source_path);

        let image = process_one(&processor, &job.source_path);
        if let Err(e) = result_sender.send(JobResult::new(&job, image)) {
            error!("Worker {} failed to send result: {}", worker_id, e);
            break;
        }
    }

    debug!("Worker {} stopped", worker_id);
}

/// Runs one image, turning a panic inside the engine into a failed result so
/// every submitted job still produces exactly one result.
pub fn process_one(processor: &ImageProcessor, path: &Path) -> ImageResult {
    match panic::catch_unwind(AssertUnwindSafe(|| processor.process(path))) {
        Ok(image) => image,
        Err(_) => {
            error!("OCR engine panicked on {}", path.display());
            ImageResult {
                source_base_name: base_name(path),
                recognized_text: String::new(),
                urls: Vec::new(),
                status: RecognitionStatus::Failed("OCR engine panicked".to_string()),
            }
        }
    }
}

/// Processes every path and returns the results in input order.
///
/// With a single worker the images are processed on the calling thread.
pub fn process_all(
    processor: &ImageProcessor,
    paths: &[PathBuf],
    worker_count: usize,
) -> Result<Vec<ImageResult>, WorkerError> {
    if worker_count <= 1 || paths.len() <= 1 {
        return Ok(paths
            .iter()
            .map(|path| process_one(processor, path))
            .collect());
    }

    let pool = WorkerPool::new(processor.clone(), worker_count.min(paths.len()))?;
    let jobs = Job::batch(paths);
    let mut slots: Vec<Option<ImageResult>> = (0..jobs.len()).map(|_| None).collect();

    let feed_result = thread::scope(|scope| {
        // Feed from a separate thread so bounded channels cannot deadlock
        let feeder = scope.spawn(|| -> Result<(), WorkerError> {
            for job in jobs {
                pool.submit(job)?;
            }
            Ok(())
        });

        let mut received = 0;
        while received < slots.len() {
            let Some(result) = pool.recv_result() else {
                break;
            };
            if let Some(slot) = slots.get_mut(result.index) {
                *slot = Some(result.image);
                received += 1;
            }
        }

        feeder.join().unwrap_or(Err(WorkerError::ChannelClosed))
    });

    pool.wait()?;
    feed_result?;

    slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| slot.ok_or(WorkerError::MissingResult(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::{BoundingBox, OcrEngine, OcrOutcome, TextRegion};
    use std::sync::Arc;
    use std::time::Duration;

    /// Echoes the file stem as text; sleeps longer for earlier files so
    /// completion order differs from input order.
    struct EchoEngine;

    impl OcrEngine for EchoEngine {
        fn recognize(&self, image_path: &Path, _language_hints: &[String]) -> OcrOutcome {
            let stem = base_name(image_path);
            let delay: u64 = stem.trim_start_matches("img").parse().unwrap_or(0);
            thread::sleep(Duration::from_millis(20u64.saturating_sub(delay)));

            if stem == "boom" {
                panic!("engine crashed");
            }

            OcrOutcome::from_regions(vec![TextRegion::new(
                BoundingBox::new(0.0, 0.5, 1.0, 0.1),
                format!("text of {} http://{}.example", stem, stem),
            )])
        }
    }

    fn processor() -> ImageProcessor {
        ImageProcessor::new(Arc::new(EchoEngine), &["en-US".to_string()])
    }

    fn paths(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("img{}.png", i))).collect()
    }

    #[test]
    fn test_worker_pool_creation() {
        let pool = WorkerPool::new(processor(), 2).unwrap();
        assert_eq!(pool.worker_count(), 2);
        pool.wait().unwrap();
    }

    #[test]
    fn test_workers_drain_queue_before_exiting() {
        let pool = WorkerPool::new(processor(), 2).unwrap();
        for (index, path) in paths(3).into_iter().enumerate() {
            pool.submit(Job::new(index, path)).unwrap();
        }

        let mut indexes: Vec<usize> = (0..3)
            .filter_map(|_| pool.recv_result())
            .map(|r| r.index)
            .collect();
        indexes.sort_unstable();
        assert_eq!(indexes, vec![0, 1, 2]);

        pool.wait().unwrap();
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            WorkerPool::new(processor(), 0),
            Err(WorkerError::SpawnFailed(_))
        ));
    }

    #[test]
    fn test_submit_and_receive() {
        let pool = WorkerPool::new(processor(), 2).unwrap();
        pool.submit(Job::new(0, PathBuf::from("img5.png"))).unwrap();

        let result = pool.recv_result().unwrap();
        assert_eq!(result.index, 0);
        assert_eq!(result.image.recognized_text, "text of img5 http://img5.example");

        pool.wait().unwrap();
    }

    #[test]
    fn test_process_all_parallel_preserves_order() {
        let inputs = paths(12);
        let results = process_all(&processor(), &inputs, 4).unwrap();

        let names: Vec<&str> = results.iter().map(|r| r.source_base_name.as_str()).collect();
        let expected: Vec<String> = (0..12).map(|i| format!("img{}", i)).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_process_all_parallel_matches_sequential() {
        let inputs = paths(9);
        let sequential = process_all(&processor(), &inputs, 1).unwrap();
        let parallel = process_all(&processor(), &inputs, 3).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_process_all_empty() {
        assert!(process_all(&processor(), &[], 4).unwrap().is_empty());
    }

    #[test]
    fn test_panicking_engine_is_isolated() {
        let inputs = vec![
            PathBuf::from("img1.png"),
            PathBuf::from("boom.png"),
            PathBuf::from("img2.png"),
        ];

        for workers in [1, 2] {
            let results = process_all(&processor(), &inputs, workers).unwrap();
            assert_eq!(results.len(), 3);
            assert!(results[1].is_failure());
            assert_eq!(results[1].source_base_name, "boom");
            assert!(!results[0].is_failure());
            assert!(!results[2].is_failure());
        }
    }
}
