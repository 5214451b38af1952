#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

//! Completion barrier for a fixed set of workers.
//!
//! [`completion_barrier`] hands out exactly `n` signals together with a barrier
//! that expects `n` acknowledgements, so the two counts can never diverge.

use tokio::sync::mpsc;

/// Single-use acknowledgement owned by one worker.
#[derive(Debug)]
pub struct CompletionSignal {
    tx: mpsc::UnboundedSender<()>,
}

impl CompletionSignal {
    /// Consumes the signal. Never blocks; a barrier that is already gone is ignored.
    pub fn complete(self) {
        let _ = self.tx.send(());
    }
}

#[derive(Debug)]
pub struct CompletionBarrier {
    expected: usize,
    rx: mpsc::UnboundedReceiver<()>,
}

pub fn completion_barrier(n: usize) -> (CompletionBarrier, Vec<CompletionSignal>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let signals = (0..n)
        .map(|_| CompletionSignal { tx: tx.clone() })
        .collect();
    // Only the handed-out signals may keep the channel open.
    drop(tx);
    (CompletionBarrier { expected: n, rx }, signals)
}

impl CompletionBarrier {
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Waits for every signal and returns how many were acknowledged.
    ///
    /// A signal dropped without `complete` (its worker panicked) closes its half
    /// of the channel; once all signals are gone the wait ends early and the
    /// returned count is below [`expected`](Self::expected).
    pub async fn wait(mut self) -> usize {
        let mut acknowledged = 0;
        while acknowledged < self.expected {
            if self.rx.recv().await.is_none() {
                break;
            }
            acknowledged += 1;
        }
        acknowledged
    }
}
