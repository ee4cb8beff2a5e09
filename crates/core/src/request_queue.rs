//! Bounded request queue for outbound calls to a shared backend.
//!
//! At most `max_concurrent` operations run at once; the rest wait ordered by
//! priority (higher first) and then arrival. Consecutive starts are spaced
//! by `min_interval`. When an operation fails because the backend is out of
//! resources, the queue lowers its limit by one and runs the operation once
//! more.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Notify;
use tokio::time::Instant;

/// Default number of operations allowed in flight.
pub const DEFAULT_MAX_CONCURRENT: usize = 2;

/// Default spacing between two operation starts.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(200);

/// Errors that can tell whether the backend ran out of capacity.
pub trait Exhaustible {
    fn is_resource_exhausted(&self) -> bool;
}

/// Snapshot of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueStatus {
    pub queued: usize,
    pub active: usize,
    pub max_concurrent: usize,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Ticket {
    priority: i32,
    seq: Reverse<u64>,
}

#[derive(Debug)]
struct State {
    waiting: BinaryHeap<Ticket>,
    active: usize,
    max_concurrent: usize,
    last_start: Option<Instant>,
    next_seq: u64,
}

#[derive(Debug)]
pub struct RequestQueue {
    state: Mutex<State>,
    changed: Notify,
    min_interval: Duration,
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT, DEFAULT_MIN_INTERVAL)
    }
}

impl RequestQueue {
    /// A limit of zero is treated as one.
    pub fn new(max_concurrent: usize, min_interval: Duration) -> Self {
        Self {
            state: Mutex::new(State {
                waiting: BinaryHeap::new(),
                active: 0,
                max_concurrent: max_concurrent.max(1),
                last_start: None,
                next_seq: 0,
            }),
            changed: Notify::new(),
            min_interval,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> QueueStatus {
        let state = self.lock();
        QueueStatus {
            queued: state.waiting.len(),
            active: state.active,
            max_concurrent: state.max_concurrent,
        }
    }

    /// Wait for a slot. The slot is released when the permit drops.
    pub async fn acquire(&self, priority: i32) -> Permit<'_> {
        let seq = {
            let mut state = self.lock();
            let seq = state.next_seq;
            state.next_seq += 1;
            state.waiting.push(Ticket {
                priority,
                seq: Reverse(seq),
            });
            seq
        };
        let mut ticket = QueuedTicket {
            queue: self,
            seq,
            admitted: false,
        };

        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            // Register before inspecting state so a release in between is not lost.
            notified.as_mut().enable();

            let delay = {
                let mut state = self.lock();
                let at_head = state.waiting.peek().map(|t| t.seq.0) == Some(seq);
                if at_head && state.active < state.max_concurrent {
                    let now = Instant::now();
                    match state.last_start {
                        Some(last) if now.duration_since(last) < self.min_interval => {
                            Some(self.min_interval - now.duration_since(last))
                        }
                        _ => {
                            state.waiting.pop();
                            state.active += 1;
                            state.last_start = Some(now);
                            ticket.admitted = true;
                            drop(state);
                            // The next ticket in line may now be at the head.
                            self.changed.notify_waiters();
                            return Permit { queue: self };
                        }
                    }
                } else {
                    None
                }
            };

            match delay {
                Some(d) => tokio::time::sleep(d).await,
                None => notified.await,
            }
        }
    }

    /// Lower the concurrency limit by one, never below one. Returns the new limit.
    pub fn back_off(&self) -> usize {
        let mut state = self.lock();
        state.max_concurrent = state.max_concurrent.saturating_sub(1).max(1);
        state.max_concurrent
    }

    /// Run `op` through the queue, retrying once after resource exhaustion.
    pub async fn run<T, E, F, Fut>(&self, priority: i32, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Exhaustible + std::fmt::Display,
    {
        let first = {
            let _permit = self.acquire(priority).await;
            op().await
        };

        match first {
            Err(e) if e.is_resource_exhausted() => {
                let limit = self.back_off();
                tracing::warn!(error = %e, max_concurrent = limit, "Backend exhausted, retrying once");
                let _permit = self.acquire(priority).await;
                op().await
            }
            other => other,
        }
    }
}

/// Removes an abandoned ticket if the waiting future is dropped.
struct QueuedTicket<'a> {
    queue: &'a RequestQueue,
    seq: u64,
    admitted: bool,
}

impl Drop for QueuedTicket<'_> {
    fn drop(&mut self) {
        if self.admitted {
            return;
        }
        let seq = self.seq;
        self.queue.lock().waiting.retain(|t| t.seq.0 != seq);
        self.queue.changed.notify_waiters();
    }
}

/// A running slot in the queue.
#[derive(Debug)]
pub struct Permit<'a> {
    queue: &'a RequestQueue,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        {
            let mut state = self.queue.lock();
            state.active = state.active.saturating_sub(1);
        }
        self.queue.changed.notify_waiters();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    enum FakeError {
        Exhausted,
        Other,
    }

    impl Exhaustible for FakeError {
        fn is_resource_exhausted(&self) -> bool {
            matches!(self, Self::Exhausted)
        }
    }

    impl std::fmt::Display for FakeError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{self:?}")
        }
    }

    #[tokio::test]
    async fn never_exceeds_the_limit() {
        let queue = Arc::new(RequestQueue::new(2, Duration::ZERO));
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let (queue, running, peak) = (queue.clone(), running.clone(), peak.clone());
            handles.push(tokio::spawn(async move {
                queue
                    .run(1, || {
                        let (running, peak) = (running.clone(), peak.clone());
                        async move {
                            let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                            peak.fetch_max(now, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(10)).await;
                            running.fetch_sub(1, Ordering::SeqCst);
                            Ok::<_, FakeError>(())
                        }
                    })
                    .await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 2);
        assert_eq!(queue.status(), QueueStatus { queued: 0, active: 0, max_concurrent: 2 });
    }

    #[tokio::test]
    async fn higher_priority_runs_first() {
        let queue = Arc::new(RequestQueue::new(1, Duration::ZERO));
        let order = Arc::new(Mutex::new(Vec::new()));

        let blocker = queue.acquire(0).await;

        let mut handles = Vec::new();
        for (label, priority) in [("low-1", 1), ("low-2", 1), ("high", 5)] {
            let (queue, order) = (queue.clone(), order.clone());
            handles.push(tokio::spawn(async move {
                let _p = queue.acquire(priority).await;
                order.lock().unwrap().push(label);
            }));
            // Let the task enqueue before the next one.
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(queue.status().queued, 3);
        drop(blocker);
        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(*order.lock().unwrap(), vec!["high", "low-1", "low-2"]);
    }

    #[tokio::test]
    async fn starts_are_spaced() {
        let queue = RequestQueue::new(4, Duration::from_millis(30));
        let started = Instant::now();
        for _ in 0..3 {
            let _p = queue.acquire(1).await;
        }
        assert!(started.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn exhaustion_backs_off_and_retries_once() {
        let queue = RequestQueue::new(3, Duration::ZERO);
        let counter = AtomicUsize::new(0);
        let attempts = &counter;

        let result = queue
            .run(1, move || async move {
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(FakeError::Exhausted)
                } else {
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(queue.status().max_concurrent, 2);
    }

    #[tokio::test]
    async fn persistent_exhaustion_fails_after_one_retry() {
        let queue = RequestQueue::new(1, Duration::ZERO);
        let counter = AtomicUsize::new(0);
        let attempts = &counter;

        let result: Result<(), _> = queue
            .run(1, move || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(FakeError::Exhausted)
            })
            .await;

        assert!(matches!(result, Err(FakeError::Exhausted)));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(queue.status().max_concurrent, 1);
    }

    #[tokio::test]
    async fn other_errors_are_not_retried() {
        let queue = RequestQueue::default();
        let counter = AtomicUsize::new(0);
        let attempts = &counter;

        let result: Result<(), _> = queue
            .run(1, move || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(FakeError::Other)
            })
            .await;

        assert!(matches!(result, Err(FakeError::Other)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(queue.status().max_concurrent, DEFAULT_MAX_CONCURRENT);
    }

    #[tokio::test]
    async fn dropped_waiter_leaves_the_queue() {
        let queue = RequestQueue::new(1, Duration::ZERO);
        let held = queue.acquire(1).await;

        let waiting = tokio::time::timeout(Duration::from_millis(10), queue.acquire(1)).await;
        assert!(waiting.is_err());
        assert_eq!(queue.status().queued, 0);

        drop(held);
        let _again = queue.acquire(1).await;
        assert_eq!(queue.status().active, 1);
    }
}
