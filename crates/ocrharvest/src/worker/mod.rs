pub mod job;
pub mod pool;
pub mod scanner;

pub use job::{Job, JobResult};
pub use pool::{process_all, process_one, WorkerPool};
pub use scanner::ImageScanner;
