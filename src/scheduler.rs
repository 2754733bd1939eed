//! Fork-join task scheduling
//!
//! Work is submitted as a [`TaskBatch`] of closures and run to completion by
//! [`TaskScheduler::wait_all`], which is the only synchronization point. Tasks
//! may borrow from the caller's stack for the lifetime `'scope` since
//! `wait_all` does not return before every task has finished.
//!
//! A panicking task does not stop its siblings; the panic is re-raised on the
//! calling thread once the whole batch is done.

use std::fmt;

use crate::error::{Error, Result};

/// One unit of work
pub type Task<'scope> = Box<dyn FnOnce() + Send + 'scope>;

/// Tasks queued for a single barrier
#[derive(Default)]
pub struct TaskBatch<'scope> {
    tasks: Vec<Task<'scope>>,
}

impl<'scope> TaskBatch<'scope> {
    /// Empty batch
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Empty batch with room for `capacity` tasks
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tasks: Vec::with_capacity(capacity),
        }
    }

    /// Queue a task. Nothing runs until the batch is passed to
    /// [`TaskScheduler::wait_all`].
    pub fn submit<F>(&mut self, task: F)
    where
        F: FnOnce() + Send + 'scope,
    {
        self.tasks.push(Box::new(task));
    }

    /// Number of queued tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no task has been queued
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl fmt::Debug for TaskBatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskBatch")
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

/// Executes batches of independent tasks.
pub trait TaskScheduler: Send + Sync + fmt::Debug {
    /// Run every task in `batch` and block until all of them have finished.
    fn wait_all<'scope>(&self, batch: TaskBatch<'scope>);

    /// Number of tasks that may run at the same time
    fn concurrency(&self) -> usize;
}

/// Runs tasks on a dedicated rayon thread pool.
#[derive(Debug)]
pub struct ThreadPoolScheduler {
    pool: rayon::ThreadPool,
}

impl ThreadPoolScheduler {
    /// Start a pool with `threads` workers, or one per core when `None`.
    pub fn new(threads: Option<usize>) -> Result<Self> {
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|i| format!("swapcodec-worker-{i}"));
        if let Some(threads) = threads {
            builder = builder.num_threads(threads);
        }

        let pool = builder.build().map_err(|e| Error::SchedulerInit {
            reason: e.to_string(),
        })?;
        log::debug!(
            "started transform pool with {} threads",
            pool.current_num_threads()
        );

        Ok(Self { pool })
    }
}

impl TaskScheduler for ThreadPoolScheduler {
    fn wait_all<'scope>(&self, batch: TaskBatch<'scope>) {
        if batch.is_empty() {
            return;
        }
        self.pool.scope(|s| {
            for task in batch.tasks {
                s.spawn(move |_| task());
            }
        });
    }

    fn concurrency(&self) -> usize {
        self.pool.current_num_threads()
    }
}

/// Runs tasks one after another on the calling thread, in submission order.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineScheduler;

impl TaskScheduler for InlineScheduler {
    fn wait_all<'scope>(&self, batch: TaskBatch<'scope>) {
        for task in batch.tasks {
            task();
        }
    }

    fn concurrency(&self) -> usize {
        1
    }
}
