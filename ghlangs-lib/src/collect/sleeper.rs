use core::time::Duration;

/// Source of all waiting done by the collection pipeline.
///
/// Production code uses [`TokioSleeper`]. Tests substitute an implementation that
/// returns immediately so retry schedules can be checked without real delays.
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        async move {
            if !duration.is_zero() {
                tokio::time::sleep(duration).await;
            }
        }
    }
}

/// Records every requested sleep and returns immediately.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    slept: std::sync::Arc<std::sync::Mutex<Vec<Duration>>>,
}

#[cfg(test)]
impl RecordingSleeper {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().expect("lock not poisoned").clone()
    }
}

#[cfg(test)]
impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.slept.lock().expect("lock not poisoned").push(duration);
        core::future::ready(())
    }
}
