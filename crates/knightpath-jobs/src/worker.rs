//! Job processing: one message in, one stored [`JobRecord`] out.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use knightpath_paths::{KnightPath, shortest_path_str};

use crate::config::ServiceConfig;
use crate::job::{Job, JobRecord, now_ms};
use crate::queue::{JobQueue, Pop};
use crate::store::{ResultStore, StoreError};

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A simple cooperative-cancellation token backed by an [`AtomicBool`].
#[derive(Clone, Debug)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Single message
// ---------------------------------------------------------------------------

/// Decode a queue message, search, and store the outcome.
///
/// A job whose squares do not parse is still stored, with no move count
/// and an empty path, so its operation id stays retrievable. Only a
/// message that is not a job at all, or a second result for an id that
/// already has one, is an error.
pub fn process_message(
    message: &str,
    store: &dyn ResultStore,
    partition_key: &str,
) -> Result<JobRecord, WorkerError> {
    log::info!("processing job message: {message}");

    let job = Job::from_message(message).map_err(|source| WorkerError::Malformed {
        message: message.to_string(),
        source,
    })?;

    let result = match shortest_path_str(&job.source, &job.target) {
        Ok(result) => result,
        Err(e) => {
            log::error!("job {}: {e}", job.id);
            KnightPath::unreachable()
        }
    };

    let record = JobRecord {
        partition_key: partition_key.to_string(),
        operation_id: job.id,
        number_of_moves: result.distance,
        shortest_path: result.path_string(),
        starting: job.source,
        ending: job.target,
        completed_at_ms: now_ms(),
    };
    store.insert(record.clone())?;

    match record.number_of_moves {
        Some(n) => log::info!("job {} done: {n} moves ({})", record.operation_id, record.shortest_path),
        None => log::info!("job {} done: no path", record.operation_id),
    }
    Ok(record)
}

/// Errors that can occur while processing one message.
#[derive(Debug)]
pub enum WorkerError {
    /// The message is not a JSON-encoded [`Job`].
    Malformed {
        message: String,
        source: serde_json::Error,
    },
    /// The result could not be stored.
    Store(StoreError),
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { message, source } => {
                write!(f, "malformed job message \u{201c}{message}\u{201d}: {source}")
            }
            Self::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for WorkerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Malformed { source, .. } => Some(source),
            Self::Store(e) => Some(e),
        }
    }
}

impl From<StoreError> for WorkerError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// WorkerPool
// ---------------------------------------------------------------------------

/// Per-worker message counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    /// Messages that produced a stored record.
    pub processed: usize,
    /// Messages rejected with a [`WorkerError`].
    pub failed: usize,
}

impl std::ops::AddAssign for WorkerStats {
    fn add_assign(&mut self, rhs: Self) {
        self.processed += rhs.processed;
        self.failed += rhs.failed;
    }
}

/// Threads draining a [`JobQueue`] into a [`ResultStore`].
///
/// Workers stop when the queue is closed and empty, or as soon as the
/// pool's [`Context`] is cancelled (leaving any remaining messages queued).
pub struct WorkerPool {
    ctx: Context,
    queue: Arc<JobQueue>,
    handles: Vec<JoinHandle<WorkerStats>>,
}

impl WorkerPool {
    /// Start `config.workers` threads.
    pub fn spawn(
        config: &ServiceConfig,
        queue: Arc<JobQueue>,
        store: Arc<dyn ResultStore>,
    ) -> std::io::Result<Self> {
        let ctx = Context::new();
        let mut handles = Vec::with_capacity(config.workers);
        for id in 0..config.workers {
            let worker = Worker {
                id,
                ctx: ctx.clone(),
                queue: Arc::clone(&queue),
                store: Arc::clone(&store),
                partition_key: config.partition_key.clone(),
                poll_interval: config.poll_interval(),
            };
            let handle = thread::Builder::new()
                .name(format!("knightpath-worker-{id}"))
                .spawn(move || worker.run())?;
            handles.push(handle);
        }
        log::info!("started {} workers on {}", handles.len(), queue.name());
        Ok(Self { ctx, queue, handles })
    }

    /// The pool's cancellation token.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Number of worker threads.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the pool has no threads.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Close the queue, let workers drain it, and join them.
    pub fn shutdown(self) -> WorkerStats {
        self.queue.close();
        self.join()
    }

    /// Cancel workers without draining the queue, and join them.
    pub fn cancel(self) -> WorkerStats {
        self.ctx.cancel();
        self.queue.close();
        self.join()
    }

    fn join(self) -> WorkerStats {
        let mut total = WorkerStats::default();
        for handle in self.handles {
            match handle.join() {
                Ok(stats) => total += stats,
                Err(_) => log::error!("a worker thread panicked"),
            }
        }
        log::info!(
            "workers stopped: {} processed, {} failed",
            total.processed,
            total.failed
        );
        total
    }
}

struct Worker {
    id: usize,
    ctx: Context,
    queue: Arc<JobQueue>,
    store: Arc<dyn ResultStore>,
    partition_key: String,
    poll_interval: Duration,
}

impl Worker {
    fn run(self) -> WorkerStats {
        let mut stats = WorkerStats::default();
        while !self.ctx.is_done() {
            match self.queue.pop(self.poll_interval) {
                Pop::Message(message) => {
                    match process_message(&message, self.store.as_ref(), &self.partition_key) {
                        Ok(_) => stats.processed += 1,
                        Err(e) => {
                            log::error!("worker {}: {e}", self.id);
                            stats.failed += 1;
                        }
                    }
                }
                Pop::Timeout => {}
                Pop::Closed => break,
            }
        }
        log::debug!("worker {} exiting", self.id);
        stats
    }
}
