use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use conttest::exec::Action;

/// Shared view on how many times a [`RecordingAction`] ran.
#[derive(Debug, Clone, Default)]
pub struct RunCounter(Arc<AtomicUsize>);

impl RunCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// Wait until at least `n` runs happened. Wrap in a timeout.
    pub async fn wait_for(&self, n: usize) {
        while self.get() < n {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

type SideEffect = Box<dyn FnMut(usize) + Send>;

/// An action that:
/// - counts its runs
/// - optionally performs a side effect (e.g. writes into the watched tree),
///   receiving the 1-based run number.
pub struct RecordingAction {
    counter: RunCounter,
    side_effect: Option<SideEffect>,
}

impl RecordingAction {
    pub fn new() -> (Self, RunCounter) {
        let counter = RunCounter::default();
        (
            Self {
                counter: counter.clone(),
                side_effect: None,
            },
            counter,
        )
    }

    pub fn with_side_effect(f: impl FnMut(usize) + Send + 'static) -> (Self, RunCounter) {
        let (mut action, counter) = Self::new();
        action.side_effect = Some(Box::new(f));
        (action, counter)
    }
}

impl Action for RecordingAction {
    fn run(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            let n = self.counter.0.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(f) = self.side_effect.as_mut() {
                f(n);
            }
        })
    }
}
