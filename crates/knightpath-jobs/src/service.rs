//! Request intake and result retrieval.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use knightpath_core::{InvalidSquare, Square};
use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;
use crate::job::{Job, JobRecord, new_operation_id};
use crate::queue::{JobQueue, QueueClosed};
use crate::store::{MemoryStore, ResultStore};
use crate::worker::WorkerPool;

/// An incoming request. Both squares are required; `operation_id` is
/// generated when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnightPathRequest {
    pub source: Option<String>,
    pub target: Option<String>,
    pub operation_id: Option<String>,
}

impl KnightPathRequest {
    /// A request for `source` to `target` with a generated id.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            target: Some(target.into()),
            operation_id: None,
        }
    }

    /// Use a caller-chosen operation id.
    pub fn with_operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }
}

/// Acknowledgement of a queued request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accepted {
    pub operation_id: String,
    pub source: Square,
    pub target: Square,
}

/// A finished job as returned to callers.
///
/// `number_of_moves` is `null` when no path was computed for the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnightPathResponse {
    pub operation_id: String,
    pub starting: String,
    pub ending: String,
    pub shortest_path: String,
    pub number_of_moves: Option<u32>,
}

impl From<JobRecord> for KnightPathResponse {
    fn from(r: JobRecord) -> Self {
        Self {
            operation_id: r.operation_id,
            starting: r.starting,
            ending: r.ending,
            shortest_path: r.shortest_path,
            number_of_moves: r.number_of_moves,
        }
    }
}

/// Front door of the job pipeline: validates requests onto the queue and
/// reads results back out of the store.
pub struct KnightPathService {
    config: ServiceConfig,
    queue: Arc<JobQueue>,
    store: Arc<dyn ResultStore>,
    // ids handed out by `request`, queued or already solved
    accepted: Mutex<HashSet<String>>,
}

impl KnightPathService {
    /// Create a service with its own queue, storing into `store`.
    pub fn new(config: ServiceConfig, store: Arc<dyn ResultStore>) -> Self {
        let queue = Arc::new(JobQueue::new(config.queue_name.clone()));
        Self {
            config,
            queue,
            store,
            accepted: Mutex::new(HashSet::new()),
        }
    }

    /// Create a service backed by a fresh [`MemoryStore`].
    pub fn in_memory(config: ServiceConfig) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    /// The service's configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The queue requests are pushed onto.
    pub fn queue(&self) -> &Arc<JobQueue> {
        &self.queue
    }

    /// Where workers store results.
    pub fn store(&self) -> &Arc<dyn ResultStore> {
        &self.store
    }

    /// Start the configured number of workers on this service's queue.
    pub fn spawn_workers(&self) -> std::io::Result<WorkerPool> {
        WorkerPool::spawn(&self.config, Arc::clone(&self.queue), Arc::clone(&self.store))
    }

    /// Validate a request and queue it.
    ///
    /// Squares are trimmed and lower-cased before validation; the queued
    /// job carries them in canonical form. Nothing is queued on error.
    pub fn request(&self, req: KnightPathRequest) -> Result<Accepted, RequestError> {
        let source = req.source.ok_or(RequestError::MissingField("source"))?;
        let target = req.target.ok_or(RequestError::MissingField("target"))?;
        let source = Square::parse_normalized(&source)?;
        let target = Square::parse_normalized(&target)?;

        let operation_id = match req.operation_id {
            Some(id) if id.trim().is_empty() => return Err(RequestError::EmptyOperationId),
            Some(id) => id,
            None => new_operation_id(),
        };
        let job = Job {
            id: operation_id.clone(),
            source: source.to_string(),
            target: target.to_string(),
        };
        let message = job.to_message().map_err(RequestError::Encode)?;

        // Check, push and reserve under one lock.
        let mut accepted = self.accepted.lock().unwrap_or_else(PoisonError::into_inner);
        if accepted.contains(&operation_id)
            || self.store.contains(&self.config.partition_key, &operation_id)
        {
            return Err(RequestError::DuplicateOperationId(operation_id));
        }
        self.queue.push(message)?;
        accepted.insert(operation_id.clone());
        drop(accepted);
        log::info!("queued job {operation_id}: {source} -> {target}");

        Ok(Accepted {
            operation_id,
            source,
            target,
        })
    }

    /// Look up the result for an operation id.
    pub fn retrieve(&self, operation_id: &str) -> Result<KnightPathResponse, RetrieveError> {
        let operation_id = operation_id.trim();
        if operation_id.is_empty() {
            return Err(RetrieveError::MissingOperationId);
        }
        self.store
            .get(&self.config.partition_key, operation_id)
            .map(KnightPathResponse::from)
            .ok_or_else(|| RetrieveError::NotFound(operation_id.to_string()))
    }
}

/// Reasons a request is rejected before anything is queued.
#[derive(Debug)]
pub enum RequestError {
    /// `source` or `target` was not supplied.
    MissingField(&'static str),
    /// A square is not between a1 and h8.
    InvalidSquare(InvalidSquare),
    /// A caller-supplied operation id was blank.
    EmptyOperationId,
    /// The caller-supplied operation id is already queued or solved.
    DuplicateOperationId(String),
    /// The job could not be encoded.
    Encode(serde_json::Error),
    /// The queue no longer accepts jobs.
    QueueClosed(QueueClosed),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => {
                write!(f, "missing {field}: pass a source and target square")
            }
            Self::InvalidSquare(e) => write!(f, "{e}"),
            Self::EmptyOperationId => f.write_str("operation id must not be empty"),
            Self::DuplicateOperationId(id) => write!(f, "operation id {id} is already in use"),
            Self::Encode(e) => write!(f, "cannot encode job: {e}"),
            Self::QueueClosed(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidSquare(e) => Some(e),
            Self::Encode(e) => Some(e),
            Self::QueueClosed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InvalidSquare> for RequestError {
    fn from(e: InvalidSquare) -> Self {
        Self::InvalidSquare(e)
    }
}

impl From<QueueClosed> for RequestError {
    fn from(e: QueueClosed) -> Self {
        Self::QueueClosed(e)
    }
}

/// Reasons a result lookup fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrieveError {
    /// No operation id was given.
    MissingOperationId,
    /// Nothing is stored under this id (yet).
    NotFound(String),
}

impl fmt::Display for RetrieveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOperationId => f.write_str("please pass an operation id"),
            Self::NotFound(id) => write!(f, "operation id {id} was not found"),
        }
    }
}

impl std::error::Error for RetrieveError {}
