use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub type IdleTask = Box<dyn FnOnce() + Send + 'static>;

/// Defers work to a later pass of the event loop.
///
/// Implementations must never run `task` before `schedule` returns, and must
/// run tasks scheduled from one thread in the order they were scheduled.
pub trait IdleScheduler: Send + Sync {
    fn schedule(&self, task: IdleTask);
}

/// Runs idle tasks on a worker task of the current tokio runtime.
#[derive(Clone)]
pub struct TokioIdleScheduler {
    worker_tx: UnboundedSender<IdleTask>,
}

impl TokioIdleScheduler {
    /// Spawns the worker. Panics when called outside a tokio runtime, like
    /// [`tokio::spawn`].
    pub fn start() -> Self {
        let (worker_tx, worker_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(worker_rx));
        Self { worker_tx }
    }
}

impl IdleScheduler for TokioIdleScheduler {
    fn schedule(&self, task: IdleTask) {
        if self.worker_tx.send(task).is_err() {
            tracing::warn!("idle worker has stopped; dropping scheduled task");
        }
    }
}

async fn run_worker(mut worker_rx: UnboundedReceiver<IdleTask>) {
    while let Some(task) = worker_rx.recv().await {
        // Let whatever else is ready on the loop go first.
        tokio::task::yield_now().await;
        task();
    }
}

/// Holds idle tasks until the owner of the loop drains them.
#[derive(Clone, Default)]
pub struct QueuedIdleScheduler {
    queue: Arc<Mutex<VecDeque<IdleTask>>>,
}

impl QueuedIdleScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.lock_queue().len()
    }

    /// Runs every task queued so far, returning how many ran. Tasks queued
    /// while draining wait for the next call.
    pub fn run_pending(&self) -> usize {
        let tasks: Vec<IdleTask> = self.lock_queue().drain(..).collect();
        let count = tasks.len();
        for task in tasks {
            task();
        }
        count
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, VecDeque<IdleTask>> {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl IdleScheduler for QueuedIdleScheduler {
    fn schedule(&self, task: IdleTask) {
        self.lock_queue().push_back(task);
    }
}
