//! Fixed-size worker pool running page extraction.
//!
//! Tasks flow through a bounded queue so a fast walk cannot run arbitrarily
//! far ahead of the workers. Extraction itself is blocking work (file I/O and
//! parsing) and runs on tokio's blocking threads; each worker task awaits one
//! extraction at a time, so at most `WORKER_POOL_SIZE` documents are open at
//! once.

use crate::error::{DocPagesError, ExtractionError, Result};
use crate::extractor::{ExtractionResult, ExtractorSet};
use crate::pipeline::aggregator::Aggregator;
use crate::scanner::{FileTask, TaskSink};
use crate::ui::OutputFormatter;
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::mpsc::error::SendTimeoutError;
use tokio::sync::{mpsc, Mutex};
use tokio::task::{self, JoinError, JoinSet};

/// Number of documents processed concurrently.
pub const WORKER_POOL_SIZE: usize = 4;

/// Submissions wait once this many tasks are queued.
pub const QUEUE_CAPACITY: usize = WORKER_POOL_SIZE * 2;

type TaskQueue = Arc<Mutex<mpsc::Receiver<FileTask>>>;

pub struct WorkerPool {
    queue: Option<mpsc::Sender<FileTask>>,
    workers: JoinSet<()>,
    aggregator: Arc<Aggregator>,
    started: Instant,
}

impl WorkerPool {
    /// Spawns the workers. Must be called from within a tokio runtime.
    pub fn start(
        extractors: Arc<ExtractorSet>,
        aggregator: Arc<Aggregator>,
        output: Arc<OutputFormatter>,
    ) -> Self {
        Self::with_size(
            WORKER_POOL_SIZE,
            QUEUE_CAPACITY,
            extractors,
            aggregator,
            output,
        )
    }

    pub(crate) fn with_size(
        size: usize,
        capacity: usize,
        extractors: Arc<ExtractorSet>,
        aggregator: Arc<Aggregator>,
        output: Arc<OutputFormatter>,
    ) -> Self {
        let size = size.max(1);
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let queue: TaskQueue = Arc::new(Mutex::new(receiver));

        let mut workers = JoinSet::new();
        for id in 0..size {
            workers.spawn(worker_loop(
                id,
                queue.clone(),
                extractors.clone(),
                aggregator.clone(),
                output.clone(),
            ));
        }

        Self {
            queue: Some(sender),
            workers,
            aggregator,
            started: Instant::now(),
        }
    }

    /// Handle for submitting tasks from a blocking thread.
    ///
    /// A submission that finds the queue full for longer than `stall_timeout`
    /// fails with [`DocPagesError::DrainTimeout`]: no worker finished a
    /// document in that time, so waiting longer could hang the run.
    pub fn submitter(&self, stall_timeout: Duration) -> Result<TaskSubmitter> {
        let queue = self.queue.clone().ok_or(DocPagesError::PoolClosed)?;
        let runtime = Handle::try_current().map_err(|e| DocPagesError::TaskFailed {
            message: format!("worker pool has no runtime: {}", e),
        })?;

        Ok(TaskSubmitter {
            queue,
            aggregator: self.aggregator.clone(),
            runtime,
            stall_timeout,
            started: self.started,
        })
    }

    /// Stops accepting work and waits for queued and in-flight tasks.
    ///
    /// The queue only closes once every [`TaskSubmitter`] has been dropped as
    /// well. If the workers are still busy when `timeout` expires they are
    /// aborted and the partial totals are returned inside the error.
    pub async fn drain(mut self, timeout: Duration) -> Result<()> {
        drop(self.queue.take());

        let workers = &mut self.workers;
        let joined = tokio::time::timeout(timeout, async move {
            while let Some(outcome) = workers.join_next().await {
                outcome.map_err(|e| DocPagesError::TaskFailed {
                    message: format!("worker stopped unexpectedly: {}", e),
                })?;
            }
            Ok(())
        })
        .await;

        match joined {
            Ok(result) => result,
            Err(_) => {
                self.workers.abort_all();
                Err(DocPagesError::DrainTimeout {
                    seconds: timeout.as_secs(),
                    counters: self.aggregator.snapshot(),
                    elapsed: self.started.elapsed(),
                })
            }
        }
    }
}

/// Sending half of the pool queue.
///
/// Counts each task as submitted once the queue has accepted it.
#[derive(Clone)]
pub struct TaskSubmitter {
    queue: mpsc::Sender<FileTask>,
    aggregator: Arc<Aggregator>,
    runtime: Handle,
    stall_timeout: Duration,
    started: Instant,
}

impl TaskSink for TaskSubmitter {
    /// Blocks while the queue is full, for at most the stall timeout. Panics
    /// if called on an async task; submit from `spawn_blocking` or a plain
    /// thread.
    fn submit(&self, task: FileTask) -> Result<()> {
        let sent = self
            .runtime
            .block_on(self.queue.send_timeout(task, self.stall_timeout));

        sent.map_err(|e| match e {
            SendTimeoutError::Timeout(_) => DocPagesError::DrainTimeout {
                seconds: self.stall_timeout.as_secs(),
                counters: self.aggregator.snapshot(),
                elapsed: self.started.elapsed(),
            },
            SendTimeoutError::Closed(_) => DocPagesError::PoolClosed,
        })?;
        self.aggregator.record_submitted();
        Ok(())
    }
}

async fn worker_loop(
    id: usize,
    queue: TaskQueue,
    extractors: Arc<ExtractorSet>,
    aggregator: Arc<Aggregator>,
    output: Arc<OutputFormatter>,
) {
    output.debug(&format!("worker-{} started", id));

    loop {
        let next = queue.lock().await.recv().await;
        let Some(task) = next else {
            break;
        };

        let result = process(task, extractors.clone()).await;
        aggregator.record(&result);
        output.document_result(&result);
    }

    output.debug(&format!("worker-{} finished", id));
}

async fn process(task: FileTask, extractors: Arc<ExtractorSet>) -> ExtractionResult {
    let path = task.path.clone();

    match task::spawn_blocking(move || extractors.extract(task)).await {
        Ok(result) => result,
        Err(e) => ExtractionResult::Failed {
            path,
            error: ExtractionError::Panicked {
                message: join_error_message(e),
            },
        },
    }
}

fn join_error_message(error: JoinError) -> String {
    if !error.is_panic() {
        return error.to_string();
    }

    let payload: Box<dyn Any + Send> = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
