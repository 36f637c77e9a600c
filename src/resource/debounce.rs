use parking_lot::Mutex;
use std::{future::Future, time::Duration};
use tokio::task::JoinHandle;

/// Delays an action until a quiet period passes without a newer one
///
/// Scheduling restarts the timer and drops the previously scheduled action.
/// Once an action has started it is detached from the timer, so a later
/// schedule never cancels work already in flight.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action);
        });

        if let Some(previous) = self.pending.lock().replace(timer) {
            previous.abort();
        }
    }

    /// Drops the scheduled action, if its timer has not fired yet
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> futures::future::BoxFuture<'static, ()>) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = fired.clone();
        let make = move |label: &'static str| {
            let sink = sink.clone();
            let fut: futures::future::BoxFuture<'static, ()> = Box::pin(async move {
                sink.lock().push(label);
            });
            fut
        };
        (fired, make)
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_action_fires() {
        let debouncer = Debouncer::new(Duration::from_millis(800));
        let (fired, action) = recorder();

        debouncer.schedule(action("b"));
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.schedule(action("ba"));
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.schedule(action("bat"));

        tokio::time::sleep(Duration::from_millis(799)).await;
        assert!(fired.lock().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*fired.lock(), vec!["bat"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_actions_all_fire() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let (fired, action) = recorder();

        debouncer.schedule(action("first"));
        tokio::time::sleep(Duration::from_millis(150)).await;
        debouncer.schedule(action("second"));
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(*fired.lock(), vec!["first", "second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_started_action_survives_new_schedule() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let fired = Arc::new(Mutex::new(Vec::new()));

        let sink = fired.clone();
        debouncer.schedule(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            sink.lock().push("slow");
        });
        tokio::time::sleep(Duration::from_millis(150)).await;

        debouncer.schedule(async {});
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(*fired.lock(), vec!["slow"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_action() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let (fired, action) = recorder();

        debouncer.schedule(action("never"));
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(fired.lock().is_empty());
    }
}
