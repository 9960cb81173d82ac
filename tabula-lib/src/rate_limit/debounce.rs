//! Trailing-edge debouncer.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::GridConfig;

type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Delays a callback until calls stop arriving.
///
/// Each [`call`](Debouncer::call) cancels the pending invocation and starts
/// a new timer, so the callback runs once, `wait` after the last call, with
/// the last call's argument. Used for search boxes.
///
/// This debouncer is cheap to clone; clones share the pending timer.
/// Calls must be made from inside a tokio runtime.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use tabula_lib::rate_limit::Debouncer;
///
/// let search = Debouncer::new(Duration::from_millis(300), |text: String| {
///     println!("searching for {text}");
/// });
/// search.call("al".into());
/// search.call("alp".into()); // only this one runs
/// ```
pub struct Debouncer<T> {
    inner: Arc<DebouncerInner<T>>,
}

struct DebouncerInner<T> {
    wait: Duration,
    callback: Callback<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Creates a debouncer that runs `callback` `wait` after the last call.
    pub fn new(wait: Duration, callback: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(DebouncerInner {
                wait,
                callback: Arc::new(callback),
                pending: Mutex::new(None),
            }),
        }
    }

    /// Creates a debouncer for search input using
    /// [`GridConfig::search_debounce`].
    pub fn search(config: &GridConfig, callback: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self::new(config.search_debounce, callback)
    }

    /// Schedules the callback with `arg`, replacing any pending call.
    pub fn call(&self, arg: T) {
        let wait = self.inner.wait;
        let callback = Arc::clone(&self.inner.callback);

        let mut pending = self.inner.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            callback(arg);
        }));
    }

    /// Drops the pending call, if any. Returns `true` if one was pending.
    pub fn cancel(&self) -> bool {
        let mut pending = self.inner.pending.lock().unwrap_or_else(PoisonError::into_inner);
        match pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Returns `true` if a call is waiting to run.
    pub fn is_pending(&self) -> bool {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Returns the configured delay.
    pub fn wait(&self) -> Duration {
        self.inner.wait
    }
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use tokio::time::sleep;

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) + Send + Sync + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |v: u32| sink.lock().unwrap().push(v))
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_after_last_call() {
        let (calls, callback) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(300), callback);

        debouncer.call(1);
        sleep(Duration::from_millis(100)).await;
        debouncer.call(2);
        sleep(Duration::from_millis(299)).await;
        assert!(calls.lock().unwrap().is_empty());
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(*calls.lock().unwrap(), vec![2]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let (calls, callback) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(50), callback);

        debouncer.call(7);
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());
        sleep(Duration::from_millis(100)).await;
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let debouncer = Debouncer::new(Duration::from_millis(10), move |_: ()| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let clone = debouncer.clone();

        debouncer.call(());
        clone.call(());
        sleep(Duration::from_millis(20)).await;
        debouncer.call(());
        sleep(Duration::from_millis(20)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_uses_config_delay() {
        let (calls, callback) = recorder();
        let config = GridConfig::default().with_search_debounce(Duration::from_millis(120));
        let debouncer = Debouncer::search(&config, callback);
        assert_eq!(debouncer.wait(), Duration::from_millis(120));

        debouncer.call(3);
        sleep(Duration::from_millis(119)).await;
        assert!(calls.lock().unwrap().is_empty());
        sleep(Duration::from_millis(2)).await;
        assert_eq!(*calls.lock().unwrap(), vec![3]);
    }
}
