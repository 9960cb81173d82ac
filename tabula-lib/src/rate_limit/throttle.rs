//! Leading-edge throttler.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::GridConfig;

/// Runs a callback at most once per window.
///
/// The first call of a window runs immediately; later calls in the same
/// window are dropped. A new window opens `limit` after the last run. Used
/// for column resize drags.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use tabula_lib::rate_limit::Throttler;
///
/// let resize = Throttler::new(Duration::from_millis(16), |delta: i32| {
///     println!("resize by {delta}");
/// });
/// assert!(resize.call(4));
/// assert!(!resize.call(6)); // same window, dropped
/// ```
pub struct Throttler<T> {
    inner: Arc<ThrottlerInner<T>>,
}

struct ThrottlerInner<T> {
    limit: Duration,
    callback: Box<dyn Fn(T) + Send + Sync>,
    last_run: Mutex<Option<Instant>>,
}

impl<T> Throttler<T> {
    /// Creates a throttler that runs `callback` at most once per `limit`.
    pub fn new(limit: Duration, callback: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(ThrottlerInner {
                limit,
                callback: Box::new(callback),
                last_run: Mutex::new(None),
            }),
        }
    }

    /// Creates a throttler for column resize drags using
    /// [`GridConfig::resize_throttle`].
    pub fn resize(config: &GridConfig, callback: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self::new(config.resize_throttle, callback)
    }

    /// Runs the callback with `arg` unless it already ran in this window.
    ///
    /// Returns `true` if the callback ran.
    pub fn call(&self, arg: T) -> bool {
        let now = Instant::now();
        {
            let mut last_run = self.inner.last_run.lock().unwrap_or_else(PoisonError::into_inner);
            if last_run.is_some_and(|last| now.duration_since(last) < self.inner.limit) {
                return false;
            }
            *last_run = Some(now);
        }

        // Run outside the lock
        (self.inner.callback)(arg);
        true
    }

    /// Starts a fresh window so the next call runs.
    pub fn reset(&self) {
        *self.inner.last_run.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Returns the configured window.
    pub fn limit(&self) -> Duration {
        self.inner.limit
    }
}

impl<T> Clone for Throttler<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::advance;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_one_call_per_window() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let throttler = Throttler::new(Duration::from_millis(16), move |v: i32| sink.lock().unwrap().push(v));

        assert!(throttler.call(1));
        advance(Duration::from_millis(10)).await;
        assert!(!throttler.call(2));
        advance(Duration::from_millis(6)).await;
        assert!(throttler.call(3));
        assert!(!throttler.call(4));

        throttler.reset();
        assert!(throttler.call(5));
        assert_eq!(*calls.lock().unwrap(), vec![1, 3, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_uses_config_window() {
        let throttler = Throttler::resize(&GridConfig::default(), |_: i32| {});
        assert_eq!(throttler.limit(), Duration::from_millis(16));

        assert!(throttler.call(1));
        advance(Duration::from_millis(15)).await;
        assert!(!throttler.call(2));
        advance(Duration::from_millis(1)).await;
        assert!(throttler.call(3));
    }
}
