//! Ordered, fail-fast batch execution on per-call worker pools.
//!
//! Every batch owns its pool: the pool is built when the batch starts, all
//! tasks are submitted, the caller blocks until they finish, and the pool is
//! dropped before returning. There is no process-wide pool state.

use std::num::NonZeroUsize;

use rayon::prelude::*;

#[cfg(test)]
mod tests;

/// Errors raised by the pool itself, independent of task failures.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("Failed to build worker pool with {workers} threads: {source}")]
    Build {
        workers: usize,
        #[source]
        source: rayon::ThreadPoolBuildError,
    },
}

/// Sizing policy for a batch of independent tasks.
///
/// Results always come back in submission order, whatever the worker count
/// and whatever order the tasks finish in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    workers: NonZeroUsize,
}

impl WorkerPool {
    /// One worker per processing unit available to this process right now.
    pub fn auto() -> Self {
        let workers = std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN);
        Self { workers }
    }

    pub fn with_workers(workers: NonZeroUsize) -> Self {
        Self { workers }
    }

    /// Uses `workers` when given, otherwise falls back to [`WorkerPool::auto`].
    pub fn from_override(workers: Option<NonZeroUsize>) -> Self {
        workers.map_or_else(Self::auto, Self::with_workers)
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers.get()
    }

    /// Applies `f` to every task and returns the results in task order.
    pub fn map<T, R, F>(&self, tasks: &[T], f: F) -> Result<Vec<R>, PoolError>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync,
    {
        self.try_map(tasks, |task| Ok::<R, PoolError>(f(task)))
    }

    /// Like [`WorkerPool::map`], but `f` is fallible.
    ///
    /// Any task error fails the whole batch and no partial results are
    /// produced. When several tasks fail, which of their errors is returned
    /// is unspecified.
    pub fn try_map<T, R, E, F>(&self, tasks: &[T], f: F) -> Result<Vec<R>, E>
    where
        T: Sync,
        R: Send,
        E: From<PoolError> + Send,
        F: Fn(&T) -> Result<R, E> + Sync,
    {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let workers = self.workers();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|idx| format!("featuremaps-worker-{idx}"))
            .build()
            .map_err(|source| PoolError::Build { workers, source })?;

        tracing::debug!("Dispatching {} tasks on {} workers", tasks.len(), workers);

        // Indexed collect keeps submission order.
        pool.install(|| tasks.par_iter().map(&f).collect())
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::auto()
    }
}
