use super::error::EngineError;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

enum Backend {
    Inline,
    Pool(ThreadPool),
}

/// A bounded fork-join executor.
///
/// Work submitted to a pool runs on at most `threads` workers. Results always come
/// back in input order, so reductions over them are independent of scheduling.
/// A pool of one thread runs work inline on the calling thread.
pub struct WorkerPool {
    backend: Backend,
    threads: usize,
}

impl WorkerPool {
    /// Builds a pool bounded to `threads` workers.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] for zero threads, or
    /// [`EngineError::ThreadPool`] if the operating system refuses the threads.
    pub fn new(threads: usize, label: &'static str) -> Result<Self, EngineError> {
        if threads == 0 {
            return Err(EngineError::InvalidInput(format!(
                "{} parallelism must be at least 1",
                label
            )));
        }
        if threads == 1 {
            return Ok(Self {
                backend: Backend::Inline,
                threads,
            });
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(move |i| format!("{}-{}", label, i))
            .build()
            .map_err(|e| EngineError::ThreadPool {
                threads,
                reason: e.to_string(),
            })?;
        debug!(threads, label, "Worker pool created.");

        Ok(Self {
            backend: Backend::Pool(pool),
            threads,
        })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Index of the pool worker running the caller, in `0..threads()`.
    ///
    /// Returns 0 for an inline pool and for callers outside the pool.
    pub fn worker_index(&self) -> usize {
        match &self.backend {
            Backend::Inline => 0,
            Backend::Pool(pool) => pool.current_thread_index().unwrap_or(0),
        }
    }

    /// Applies `f` to every item and returns the results in input order.
    pub fn map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        match &self.backend {
            Backend::Inline => items.iter().map(f).collect(),
            Backend::Pool(pool) => pool.install(|| items.par_iter().map(f).collect()),
        }
    }

    /// Applies `f` to every index in `0..len` and returns the results in index order.
    pub fn map_indexed<R, F>(&self, len: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Sync + Send,
    {
        match &self.backend {
            Backend::Inline => (0..len).map(f).collect(),
            Backend::Pool(pool) => pool.install(|| (0..len).into_par_iter().map(f).collect()),
        }
    }

    /// Sums `f(i)` over `0..len`.
    ///
    /// Terms are computed concurrently but added in index order, so the result does
    /// not depend on the number of workers.
    pub fn sum_indexed<F>(&self, len: usize, f: F) -> f64
    where
        F: Fn(usize) -> f64 + Sync + Send,
    {
        self.map_indexed(len, f).into_iter().sum()
    }
}
