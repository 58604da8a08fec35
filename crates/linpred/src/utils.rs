//! Parallelism configuration and thread pool setup.

use rayon::prelude::*;

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// This is a simple flag passed down to the prediction kernel. When
/// `Parallel`, the kernel may distribute row blocks over the current `rayon`
/// pool; when `Sequential`, it must iterate in order on the calling thread.
///
/// The actual thread pool is set up at the predictor level via `n_threads`.
/// The kernel doesn't manage thread pools, it just respects this flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if rayon pool has multiple threads, sequential otherwise)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Run `f` on every item, bridging a sequential iterator into rayon when
    /// parallel.
    ///
    /// Useful for iterators that don't implement `IntoParallelIterator`, such
    /// as zipped ndarray chunk iterators.
    #[inline]
    pub fn maybe_par_bridge_for_each<T, I, F>(self, iter: I, f: F)
    where
        T: Send,
        I: Iterator<Item = T> + Send,
        F: Fn(T) + Sync + Send,
    {
        if self.is_parallel() {
            iter.par_bridge().for_each(f);
        } else {
            iter.for_each(f);
        }
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `0` = auto (use the current rayon pool)
/// - `1` = sequential (no thread pool)
/// - `n > 1` = use exactly `n` threads
///
/// If a dedicated pool cannot be created, the closure runs on the current
/// pool instead.
///
/// # Example
///
/// ```
/// use linpred::run_with_threads;
///
/// let result = run_with_threads(1, |_| 6 * 7);
/// assert_eq!(result, 42);
/// ```
#[inline]
pub fn run_with_threads<T: Send>(n_threads: usize, f: impl FnOnce(Parallelism) -> T + Send) -> T {
    let parallelism = Parallelism::from_threads(n_threads);

    if n_threads <= 1 || !parallelism.is_parallel() {
        return f(parallelism);
    }

    match rayon::ThreadPoolBuilder::new().num_threads(n_threads).build() {
        Ok(pool) => pool.install(|| f(Parallelism::Parallel)),
        Err(err) => {
            tracing::warn!(n_threads, error = %err, "thread pool creation failed, using current pool");
            f(Parallelism::Parallel)
        }
    }
}
