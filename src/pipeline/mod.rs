pub mod aggregator;
pub mod pool;

pub use aggregator::{Aggregator, RunCounters};
pub use pool::{TaskSubmitter, WorkerPool, QUEUE_CAPACITY, WORKER_POOL_SIZE};
