//! Interruptible pauses between actions
//!
//! Every sleep in a run goes through a [`Pacer`], which watches the shutdown
//! channel. A signalled shutdown turns the pending sleep into
//! [`BotError::Interrupted`].

use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;
use crate::errors::{BotError, BotResult};

pub type ShutdownSender = watch::Sender<bool>;

/// Creates the shutdown channel. Send `true` to interrupt every pacer
/// subscribed to it.
pub fn shutdown_channel() -> (ShutdownSender, Pacer) {
    let (tx, rx) = watch::channel(false);
    (tx, Pacer { shutdown: Some(rx) })
}

#[derive(Debug, Clone)]
pub struct Pacer {
    shutdown: Option<watch::Receiver<bool>>,
}

impl Pacer {
    /// A pacer with no shutdown signal attached.
    pub fn detached() -> Self {
        Self { shutdown: None }
    }

    pub fn is_interrupted(&self) -> bool {
        self.shutdown.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    /// Fails fast when shutdown was already requested.
    pub fn check(&self) -> BotResult<()> {
        if self.is_interrupted() {
            return Err(BotError::Interrupted);
        }
        Ok(())
    }

    pub async fn sleep_secs(&self, secs: u64, reason: &str) -> BotResult<()> {
        if secs > 0 {
            debug!("💤 sleep {}s ({})", secs, reason);
        }
        self.sleep(Duration::from_secs(secs)).await
    }

    pub async fn sleep(&self, duration: Duration) -> BotResult<()> {
        self.check()?;
        if duration.is_zero() {
            return Ok(());
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(()),
            _ = self.interrupted() => Err(BotError::Interrupted),
        }
    }

    /// Resolves once shutdown is signalled. Pends forever on a detached
    /// pacer or once the sender is gone, since nobody can interrupt then.
    pub async fn interrupted(&self) {
        let Some(rx) = &self.shutdown else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        let signalled = rx.wait_for(|stop| *stop).await.is_ok();
        if !signalled {
            std::future::pending::<()>().await;
        }
    }
}
