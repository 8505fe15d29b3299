//! Graceful shutdown coordination.
//!
//! The first SIGINT/SIGTERM flips `shutting_down`, the server stops accepting
//! connections and in-flight requests drain against `timeout`. Later signals are
//! ignored with a warning.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub struct ShutdownContext {
    shutting_down: AtomicBool,
    notify: watch::Sender<bool>,
    timeout: Duration,
}

#[derive(Debug, PartialEq, Eq)]
pub enum DrainOutcome<T> {
    Completed(T),
    TimedOut,
}

impl ShutdownContext {
    pub fn new(timeout: Duration) -> Self {
        let (notify, _) = watch::channel(false);
        Self {
            shutting_down: AtomicBool::new(false),
            notify,
            timeout,
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    /// Starts shutdown. Returns `false` if it had already started.
    pub fn trigger(&self, reason: &str) -> bool {
        if self.shutting_down.swap(true, Ordering::SeqCst) {
            tracing::warn!("{} received while already shutting down, ignoring", reason);
            return false;
        }

        tracing::info!("{} received, starting graceful shutdown", reason);
        self.notify.send_replace(true);
        true
    }

    /// Resolves once shutdown has been triggered.
    pub async fn wait(&self) {
        let mut rx = self.notify.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }

    /// Runs `work` to completion unless `timeout` elapses first.
    pub async fn drain<F, T>(&self, work: F) -> DrainOutcome<T>
    where
        F: Future<Output = T>,
    {
        match tokio::time::timeout(self.timeout, work).await {
            Ok(value) => {
                tracing::info!("Graceful shutdown completed");
                DrainOutcome::Completed(value)
            }
            Err(_) => {
                tracing::warn!(
                    "Shutdown timeout of {}ms elapsed, forcing exit",
                    self.timeout.as_millis()
                );
                DrainOutcome::TimedOut
            }
        }
    }
}

/// Feeds SIGINT and SIGTERM into `ctx` for the life of the process.
pub async fn listen_for_signals(ctx: Arc<ShutdownContext>) {
    #[cfg(unix)]
    let mut terminate =
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(stream) => Some(stream),
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                None
            }
        };

    loop {
        #[cfg(unix)]
        let sigterm = async {
            match terminate.as_mut() {
                Some(stream) => {
                    stream.recv().await;
                }
                None => std::future::pending::<()>().await,
            }
        };
        #[cfg(not(unix))]
        let sigterm = std::future::pending::<()>();

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::error!("Failed to listen for SIGINT: {}", e);
                    return;
                }
                ctx.trigger("SIGINT");
            }
            () = sigterm => {
                ctx.trigger("SIGTERM");
            }
        }
    }
}
