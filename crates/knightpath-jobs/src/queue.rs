//! FIFO job queue shared between request intake and workers.
//!
//! Messages are dequeued in push order. After [`JobQueue::close`] pushes
//! fail, but messages already queued are still handed out before
//! [`Pop::Closed`] is reported.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Result of [`JobQueue::pop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pop {
    /// The oldest queued message.
    Message(String),
    /// Nothing arrived before the timeout.
    Timeout,
    /// The queue is closed and drained.
    Closed,
}

#[derive(Debug, Default)]
struct State {
    messages: VecDeque<String>,
    closed: bool,
}

/// A thread-safe FIFO of serialized [`Job`](crate::Job) messages.
#[derive(Debug)]
pub struct JobQueue {
    name: String,
    state: Mutex<State>,
    ready: Condvar,
}

impl JobQueue {
    /// Create an empty, open queue.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(State::default()),
            ready: Condvar::new(),
        }
    }

    /// The queue's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a message, waking one waiting worker.
    pub fn push(&self, message: String) -> Result<(), QueueClosed> {
        let mut state = self.lock();
        if state.closed {
            return Err(QueueClosed {
                queue: self.name.clone(),
            });
        }
        state.messages.push_back(message);
        drop(state);
        self.ready.notify_one();
        Ok(())
    }

    /// Take the oldest message, waiting up to `timeout` for one to arrive.
    pub fn pop(&self, timeout: Duration) -> Pop {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        loop {
            if let Some(message) = state.messages.pop_front() {
                return Pop::Message(message);
            }
            if state.closed {
                return Pop::Closed;
            }
            let now = Instant::now();
            if now >= deadline {
                return Pop::Timeout;
            }
            state = self
                .ready
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Take the oldest message without waiting.
    pub fn try_pop(&self) -> Option<String> {
        self.lock().messages.pop_front()
    }

    /// Refuse further pushes and wake every waiting worker.
    pub fn close(&self) {
        self.lock().closed = true;
        self.ready.notify_all();
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of queued messages.
    pub fn len(&self) -> usize {
        self.lock().messages.len()
    }

    /// Whether the queue holds no messages.
    pub fn is_empty(&self) -> bool {
        self.lock().messages.is_empty()
    }
}

/// A push was attempted on a closed queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueClosed {
    queue: String,
}

impl fmt::Display for QueueClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "queue {} is closed", self.queue)
    }
}

impl std::error::Error for QueueClosed {}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    const SHORT: Duration = Duration::from_millis(10);

    #[test]
    fn fifo_order() {
        let q = JobQueue::new("q");
        q.push("first".into()).unwrap();
        q.push("second".into()).unwrap();
        q.push("third".into()).unwrap();
        assert_eq!(q.len(), 3);

        assert_eq!(q.pop(SHORT), Pop::Message("first".into()));
        assert_eq!(q.try_pop(), Some("second".into()));
        assert_eq!(q.pop(SHORT), Pop::Message("third".into()));
        assert_eq!(q.pop(SHORT), Pop::Timeout);
        assert!(q.is_empty());
    }

    #[test]
    fn close_drains_then_reports_closed() {
        let q = JobQueue::new("q");
        q.push("left over".into()).unwrap();
        q.close();
        assert!(q.is_closed());
        assert!(q.push("late".into()).is_err());
        assert_eq!(q.pop(SHORT), Pop::Message("left over".into()));
        assert_eq!(q.pop(SHORT), Pop::Closed);
    }

    #[test]
    fn close_wakes_waiting_pop() {
        let q = Arc::new(JobQueue::new("q"));
        let waiter = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.pop(Duration::from_secs(30)))
        };
        thread::sleep(SHORT);
        q.close();
        assert_eq!(waiter.join().unwrap(), Pop::Closed);
    }

    #[test]
    fn push_wakes_waiting_pop() {
        let q = Arc::new(JobQueue::new("q"));
        let waiter = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.pop(Duration::from_secs(30)))
        };
        thread::sleep(SHORT);
        q.push("job".into()).unwrap();
        assert_eq!(waiter.join().unwrap(), Pop::Message("job".into()));
    }

    #[test]
    fn closed_error_names_queue() {
        let q = JobQueue::new("knightpath-queue");
        q.close();
        let err = q.push("x".into()).unwrap_err();
        assert_eq!(err.to_string(), "queue knightpath-queue is closed");
    }
}
