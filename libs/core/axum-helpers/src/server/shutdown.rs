use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Completes when the process receives SIGINT (Ctrl+C) or SIGTERM.
///
/// Used as the graceful-shutdown trigger for `axum::serve`.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Broadcasts a shutdown signal to background tasks.
///
/// The server loop calls [`ShutdownCoordinator::signal`] once the
/// listener stops accepting connections; cleanup tasks wait on
/// [`ShutdownCoordinator::wait_for_signal`] before releasing resources.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownCoordinator {
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, rx)
    }

    /// Mark shutdown as started. Idempotent.
    pub fn signal(&self) {
        let _ = self.tx.send(true);
    }

    /// Wait until [`signal`](Self::signal) has been called.
    pub async fn wait_for_signal(&self) {
        let mut rx = self.tx.subscribe();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_returns_after_signal() {
        let (coordinator, _rx) = ShutdownCoordinator::new();

        let waiter = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.wait_for_signal().await })
        };

        coordinator.signal();
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_wait_after_signal_already_sent() {
        let (coordinator, _rx) = ShutdownCoordinator::new();
        coordinator.signal();
        coordinator.wait_for_signal().await;
    }
}
