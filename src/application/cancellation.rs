//! Cooperative cancellation for in-flight sends.
//!
//! A [`CancelHandle`] stays with whoever may abort the request (a key
//! binding, a shutdown path); the matching [`CancelSignal`] travels with the
//! request into [`RequestExecutor::send_with_cancel`]. Cancelling after the
//! send has completed does nothing.
//!
//! [`RequestExecutor::send_with_cancel`]: crate::application::services::RequestExecutor::send_with_cancel

use tokio::sync::watch;

/// Creates a connected handle/signal pair.
pub fn cancellation() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx: Some(rx) })
}

/// The aborting side.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// The observing side, passed alongside a request.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        Self { rx: None }
    }

    /// Resolves once cancellation is requested; pends forever otherwise,
    /// including when the handle is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        if let Some(rx) = self.rx.as_mut() {
            if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
                return;
            }
        }
        std::future::pending::<()>().await;
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::never()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test(start_paused = true)]
    async fn signal_fires_after_cancel() {
        let (handle, mut signal) = cancellation();
        assert!(!handle.is_cancelled());

        handle.cancel();

        assert!(handle.is_cancelled());
        timeout(Duration::from_millis(10), signal.cancelled())
            .await
            .expect("signal should fire");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_idempotent() {
        let (handle, mut signal) = cancellation();
        handle.cancel();
        handle.cancel();

        timeout(Duration::from_millis(10), signal.cancelled())
            .await
            .expect("signal should fire");
    }

    #[tokio::test(start_paused = true)]
    async fn clones_observe_the_same_cancellation() {
        let (handle, signal) = cancellation();
        let mut first = signal.clone();
        let mut second = signal;

        handle.cancel();

        timeout(Duration::from_millis(10), first.cancelled())
            .await
            .expect("first clone should fire");
        timeout(Duration::from_millis(10), second.cancelled())
            .await
            .expect("second clone should fire");
    }

    #[tokio::test(start_paused = true)]
    async fn never_signal_stays_pending() {
        let mut signal = CancelSignal::never();
        let result = timeout(Duration::from_secs(60), signal.cancelled()).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_handle_without_cancel_stays_pending() {
        let (handle, mut signal) = cancellation();
        drop(handle);

        let result = timeout(Duration::from_secs(60), signal.cancelled()).await;
        assert!(result.is_err());
    }
}
