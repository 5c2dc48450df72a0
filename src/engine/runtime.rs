// src/engine/runtime.rs

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::Action;

use super::core::{ChangeDetector, Poll};

/// Drives a [`ChangeDetector`] forever, running an [`Action`] on change.
///
/// This is the IO shell around the detector: it awaits the action, sleeps
/// between cycles and watches for shutdown. Everything runs on the calling
/// task; scans and the action never overlap.
pub struct WatchLoop<A: Action> {
    detector: ChangeDetector,
    action: A,
    interval: Duration,
}

impl<A: Action> fmt::Debug for WatchLoop<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchLoop")
            .field("detector", &self.detector)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl<A: Action> WatchLoop<A> {
    pub fn new(detector: ChangeDetector, action: A, interval: Duration) -> Self {
        Self {
            detector,
            action,
            interval,
        }
    }

    /// Poll until `shutdown` resolves.
    ///
    /// Per cycle:
    /// 1. poll the detector (reload excludes, scan, compare);
    /// 2. on change, await the action, then absorb its writes with a rescan;
    /// 3. sleep for the interval.
    ///
    /// Shutdown is checked while the action runs and while sleeping; an
    /// interrupted action is dropped (killing its process). Returns `Ok(())`
    /// on shutdown and an error only if a poll fails.
    pub async fn run<S>(mut self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        info!(
            root = ?self.detector.root(),
            method = %self.detector.method(),
            interval = ?self.interval,
            "watching for changes"
        );
        tokio::pin!(shutdown);

        loop {
            if let Poll::Changed(pending) = self.detector.poll()? {
                tokio::select! {
                    _ = &mut shutdown => {
                        info!("shutdown requested while command was running");
                        break;
                    }
                    _ = self.action.run() => {}
                }
                self.detector.absorb(pending);
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        debug!("watch loop exited");
        Ok(())
    }
}
