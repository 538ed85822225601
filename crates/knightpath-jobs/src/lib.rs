//! Asynchronous knight-path jobs around the solver in `knightpath-paths`.
//!
//! A request is validated and turned into a [`Job`] message on a
//! [`JobQueue`]; a [`WorkerPool`] drains the queue, runs the search and
//! stores exactly one [`JobRecord`] per operation id in a [`ResultStore`],
//! from which [`KnightPathService::retrieve`] answers later lookups.

pub mod config;
pub mod job;
pub mod queue;
pub mod service;
pub mod store;
pub mod worker;

pub use config::{ConfigError, ServiceConfig};
pub use job::{Job, JobRecord, new_operation_id};
pub use queue::{JobQueue, Pop, QueueClosed};
pub use service::{
    Accepted, KnightPathRequest, KnightPathResponse, KnightPathService, RequestError, RetrieveError,
};
pub use store::{MemoryStore, ResultStore, StoreError};
pub use worker::{Context, WorkerError, WorkerPool, WorkerStats, process_message};
