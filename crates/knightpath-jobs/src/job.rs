//! Queue messages and stored results.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngExt;
use serde::{Deserialize, Serialize};

/// A queued request for one knight path.
///
/// Squares are carried as text: a message pushed by something other than
/// [`KnightPathService::request`](crate::KnightPathService::request) may
/// hold anything, and the worker records such jobs with no result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Job {
    /// Encode as a queue message, e.g. `{"id":"..","source":"a1","target":"h8"}`.
    pub fn to_message(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a queue message.
    pub fn from_message(message: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(message)
    }
}

/// One stored result row, keyed by `(partition_key, operation_id)`.
///
/// `number_of_moves` is `None` (JSON `null`) when no path was computed;
/// `shortest_path` is then empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub partition_key: String,
    pub operation_id: String,
    pub number_of_moves: Option<u32>,
    pub shortest_path: String,
    pub starting: String,
    pub ending: String,
    /// Completion time, milliseconds since the Unix epoch.
    pub completed_at_ms: u64,
}

const HEX: &[u8; 16] = b"0123456789abcdef";

/// A fresh opaque operation id: 32 lowercase hex digits.
pub fn new_operation_id() -> String {
    let mut rng = rand::rng();
    (0..32).map(|_| HEX[rng.random_range(0..HEX.len())] as char).collect()
}

/// Milliseconds since the Unix epoch; 0 if the clock is before it.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
