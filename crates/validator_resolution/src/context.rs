//! Cancellation and deadline propagation for collaborator calls

use std::future::Future;
use thiserror::Error;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Why a context stopped accepting work.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("context cancelled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Execution context handed to every collaborator call.
///
/// Cloning shares the cancellation token; [`Context::child`] derives a token
/// that is cancelled together with its parent but can also be cancelled on
/// its own.
#[derive(Debug, Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// A timeout too large to represent as an instant means no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Child context whose deadline is the earlier of the parent's and `timeout` from now.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let deadline = match (self.deadline, Instant::now().checked_add(timeout)) {
            (Some(existing), Some(requested)) => Some(existing.min(requested)),
            (existing, requested) => existing.or(requested),
        };
        Self {
            token: self.token.child_token(),
            deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// `Some` once the context is cancelled or past its deadline.
    pub fn err(&self) -> Option<ContextError> {
        if self.token.is_cancelled() {
            return Some(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Drive `fut` until it completes, the context is cancelled, or the
    /// deadline passes, whichever happens first.
    pub async fn run<F, T, E>(&self, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<ContextError>,
    {
        if let Some(err) = self.err() {
            return Err(err.into());
        }

        let deadline = self.deadline;
        let expired = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ContextError::Cancelled.into()),
            _ = expired => Err(ContextError::DeadlineExceeded.into()),
            result = fut => result,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn slow_ok() -> Result<u32, ContextError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(1)
    }

    #[tokio::test]
    async fn background_runs_to_completion() {
        let ctx = Context::background();
        let value = ctx.run(async { Ok::<_, ContextError>(7) }).await.unwrap();
        assert_eq!(value, 7);
        assert!(ctx.err().is_none());
    }

    #[tokio::test]
    async fn cancelled_context_rejects_new_work() {
        let ctx = Context::background();
        ctx.cancel();
        let err = ctx.run(async { Ok::<_, ContextError>(7) }).await.unwrap_err();
        assert_eq!(err, ContextError::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_interrupts_in_flight_work() {
        let ctx = Context::with_timeout(Duration::from_secs(1));
        let err = ctx.run(slow_ok()).await.unwrap_err();
        assert_eq!(err, ContextError::DeadlineExceeded);
        assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn parent_cancellation_reaches_child() {
        let parent = Context::background();
        let child = parent.child();
        parent.cancel();
        assert_eq!(child.err(), Some(ContextError::Cancelled));
    }

    #[tokio::test]
    async fn child_cancellation_leaves_parent_alone() {
        let parent = Context::background();
        let child = parent.child();
        child.cancel();
        assert!(parent.err().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn child_timeout_keeps_earlier_parent_deadline() {
        let parent = Context::with_timeout(Duration::from_secs(1));
        let child = parent.child_with_timeout(Duration::from_secs(30));
        assert_eq!(child.deadline(), parent.deadline());
    }

    #[tokio::test]
    async fn unrepresentable_timeout_has_no_deadline() {
        let ctx = Context::with_timeout(Duration::from_secs(u64::MAX));
        assert!(ctx.deadline().is_none());
        assert!(ctx.err().is_none());
        let value = ctx.run(async { Ok::<_, ContextError>(3) }).await.unwrap();
        assert_eq!(value, 3);

        let child = Context::background().child_with_timeout(Duration::MAX);
        assert!(child.deadline().is_none());

        let parent = Context::with_timeout(Duration::from_secs(5));
        let child = parent.child_with_timeout(Duration::MAX);
        assert_eq!(child.deadline(), parent.deadline());
    }
}
