//! Value-after-quiet-period emitter for search input

use std::time::Duration;
use tokio::sync::mpsc;

/// Input side of a debouncer
#[derive(Debug, Clone)]
pub struct SearchDebouncer<T> {
    input: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> SearchDebouncer<T> {
    /// Spawn a debouncer that emits the latest value once `quiet` has passed
    /// without new input
    ///
    /// Must be called inside a tokio runtime. Dropping every input handle
    /// flushes the pending value and ends the task.
    #[must_use]
    pub fn spawn(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (input, mut pending) = mpsc::unbounded_channel::<T>();
        let (output, settled) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(mut latest) = pending.recv().await {
                loop {
                    tokio::select! {
                        next = pending.recv() => match next {
                            Some(value) => latest = value,
                            None => {
                                let _ = output.send(latest);
                                return;
                            }
                        },
                        () = tokio::time::sleep(quiet) => {
                            if output.send(latest).is_err() {
                                return;
                            }
                            break;
                        }
                    }
                }
            }
        });

        (Self { input }, settled)
    }

    /// Feed a new value, restarting the quiet period
    pub fn push(&self, value: T) {
        let _ = self.input.send(value);
    }
}
