//! Cancellation and deadline signal shared by terraform invocations.
//!
//! An [`ExecContext`] is cheap to clone. Executors race the running process
//! against [`ExecContext::done`] and kill it when the context fires.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Why a context stopped a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    Cancelled,
    DeadlineExceeded,
}

/// Deadline and cancellation signal passed to every invocation
#[derive(Debug, Clone, Default)]
pub struct ExecContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Handle that cancels every context derived from the same [`ExecContext::with_cancel`] call
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

impl ExecContext {
    /// A context that never fires
    pub fn background() -> Self {
        Self::default()
    }

    /// Fire once `timeout` has elapsed from now, or earlier if an existing deadline is sooner.
    ///
    /// A timeout too large to represent as an instant adds no deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    /// Attach a fresh cancellation signal, replacing any previous one
    pub fn with_cancel(mut self) -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        self.cancel = Some(receiver);
        (self, CancelHandle { sender })
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Non-blocking check, cancellation wins over an expired deadline
    pub fn interruption(&self) -> Option<Interruption> {
        if self.cancel.as_ref().is_some_and(|rx| *rx.borrow()) {
            return Some(Interruption::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Interruption::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves when the context is cancelled or its deadline passes; pending forever otherwise
    pub async fn done(&self) -> Interruption {
        let cancelled = async {
            if let Some(mut rx) = self.cancel.clone() {
                let fired = rx.wait_for(|cancelled| *cancelled).await.is_ok();
                if fired {
                    return;
                }
            }
            // Sender dropped without cancelling: this context can no longer be cancelled.
            std::future::pending::<()>().await
        };

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Interruption::Cancelled,
            _ = expired => Interruption::DeadlineExceeded,
        }
    }
}
