//! Serialized task queue.
//!
//! One worker thread owns the [`Orchestrator`]. Tasks run to completion in
//! submission order, one at a time; callers get a [`TaskHandle`] to wait on.

use std::thread;

use anyhow::{Context, Result, anyhow};
use crossbeam::channel::{self, Receiver, Sender};

use super::Orchestrator;

type Job = Box<dyn FnOnce(&mut Orchestrator) + Send>;

/// Handle for submitting work to the orchestrator worker.
///
/// Clones share the same worker. The worker exits once every clone is dropped
/// and the backlog is drained.
#[derive(Clone)]
pub struct TaskQueue {
    tx: Sender<Job>,
}

/// Pending result of a submitted task.
#[must_use = "dropping a TaskHandle does not cancel the task"]
pub struct TaskHandle<T> {
    rx: Receiver<T>,
}

impl TaskQueue {
    /// Move the orchestrator onto a new worker thread.
    pub fn spawn(mut orchestrator: Orchestrator) -> Result<Self> {
        let (tx, rx) = channel::unbounded::<Job>();
        thread::Builder::new()
            .name("orchestrator".into())
            .spawn(move || {
                for job in rx {
                    job(&mut orchestrator);
                }
                crate::debug!("queue"; "worker stopped");
            })
            .context("failed to start orchestrator worker")?;
        Ok(Self { tx })
    }

    /// Enqueue `task`. It runs after every previously submitted task.
    pub fn submit<T, F>(&self, task: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Orchestrator) -> T + Send + 'static,
    {
        let (result_tx, result_rx) = channel::bounded(1);
        let job: Job = Box::new(move |orchestrator| {
            let _ = result_tx.send(task(orchestrator));
        });
        // On failure the job and its sender are dropped, so `wait` errors
        let _ = self.tx.send(job);
        TaskHandle { rx: result_rx }
    }

    /// Enqueue `task` without waiting for it.
    pub fn spawn_task<F>(&self, task: F)
    where
        F: FnOnce(&mut Orchestrator) + Send + 'static,
    {
        let _ = self.tx.send(Box::new(task));
    }
}

impl<T> TaskHandle<T> {
    /// Block until the task has run.
    pub fn wait(self) -> Result<T> {
        self.rx
            .recv()
            .map_err(|_| anyhow!("orchestrator worker stopped before the task completed"))
    }
}
