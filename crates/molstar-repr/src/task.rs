//! Cancellable asynchronous tasks
//!
//! A [`Task`] wraps a boxed future together with a [`CancellationToken`].
//! The future receives a [`RuntimeContext`] through which it reports
//! progress; every progress update is a cooperative yield point that fails
//! with [`ReprError::Cancelled`] once the token is cancelled. Running a task
//! also races it against the token, so a task cancelled while suspended is
//! dropped at its current await point.
//!
//! # Example
//!
//! ```
//! use molstar_repr::task::Task;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let task = Task::create("Sum", |runtime| async move {
//!     let mut sum = 0;
//!     for i in 0..10 {
//!         sum += i;
//!         runtime.update(format!("added {}", i)).await?;
//!     }
//!     Ok(sum)
//! });
//! assert_eq!(task.run().await.unwrap(), 45);
//! # });
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::{ReprError, ReprResult};

/// Boxed, sendable future
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Default)]
struct TokenState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Shared cancellation flag with async wake-up
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    state: Arc<TokenState>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; idempotent
    pub fn cancel(&self) {
        if !self.state.cancelled.swap(true, Ordering::SeqCst) {
            self.state.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once the token is cancelled
    pub async fn cancelled(&self) {
        let notified = self.state.notify.notified();
        tokio::pin!(notified);
        // Register before checking so a concurrent cancel cannot be missed
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

/// Handle through which a running task reports progress and observes cancellation
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    task: Arc<str>,
    token: CancellationToken,
    message: Arc<Mutex<Option<String>>>,
}

impl RuntimeContext {
    pub fn new(task: &str, token: CancellationToken) -> Self {
        Self {
            task: Arc::from(task),
            token,
            message: Arc::new(Mutex::new(None)),
        }
    }

    /// Context for work that runs outside any task and cannot be cancelled
    pub fn synchronous() -> Self {
        Self::new("synchronous", CancellationToken::new())
    }

    /// Name of the task this context belongs to
    pub fn task_name(&self) -> &str {
        &self.task
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fail with [`ReprError::Cancelled`] if the task was cancelled
    pub fn check(&self) -> ReprResult<()> {
        if self.token.is_cancelled() {
            Err(ReprError::cancelled(self.task.as_ref()))
        } else {
            Ok(())
        }
    }

    /// Record a progress message and yield to the scheduler
    pub async fn update(&self, message: impl Into<String>) -> ReprResult<()> {
        self.check()?;
        let message = message.into();
        log::trace!("[{}] {}", self.task, message);
        *self.message.lock() = Some(message);
        tokio::task::yield_now().await;
        self.check()
    }

    /// The most recent progress message
    pub fn last_message(&self) -> Option<String> {
        self.message.lock().clone()
    }
}

/// A named, cancellable unit of asynchronous work
pub struct Task<'a, T> {
    name: String,
    token: CancellationToken,
    runtime: RuntimeContext,
    future: BoxFuture<'a, ReprResult<T>>,
}

impl<'a, T> Task<'a, T> {
    /// Create a task; the future is not polled until [`Task::run`]
    pub fn create<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(RuntimeContext) -> Fut,
        Fut: Future<Output = ReprResult<T>> + Send + 'a,
    {
        let name = name.into();
        let token = CancellationToken::new();
        let runtime = RuntimeContext::new(&name, token.clone());
        let future = Box::pin(f(runtime.clone()));
        Self {
            name,
            token,
            runtime,
            future,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token that cancels this task; clone it before calling [`Task::run`]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Progress reported so far
    pub fn progress(&self) -> Option<String> {
        self.runtime.last_message()
    }

    /// Run the task to completion or cancellation
    pub async fn run(self) -> ReprResult<T> {
        let Task {
            name,
            token,
            future,
            ..
        } = self;
        log::debug!("Running task '{}'", name);
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(ReprError::cancelled(name.as_str())),
            result = future => result,
        };
        match &result {
            Err(ReprError::Cancelled { .. }) => log::warn!("Task '{}' cancelled", name),
            Err(e) => log::warn!("Task '{}' failed: {}", name, e),
            Ok(_) => {}
        }
        result
    }
}

impl<T> std::fmt::Debug for Task<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_task_runs_to_completion() {
        let task = Task::create("answer", |_| async { Ok(42) });
        assert_eq!(task.name(), "answer");
        assert_eq!(task.run().await, Ok(42));
    }

    #[tokio::test]
    async fn test_cancel_before_run() {
        let task = Task::create("never", |_| async { Ok(()) });
        task.cancel();
        let err = task.run().await.unwrap_err();
        assert_eq!(err, ReprError::cancelled("never"));
    }

    #[tokio::test]
    async fn test_cancel_while_suspended() {
        let task: Task<'_, ()> = Task::create("sleeper", |runtime| async move {
            loop {
                runtime.update("sleeping").await?;
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        });
        let token = task.token();
        let (result, _) = tokio::join!(task.run(), async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });
        assert!(result.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_update_records_progress() {
        let runtime = RuntimeContext::synchronous();
        runtime.update("step 1").await.unwrap();
        assert_eq!(runtime.last_message().as_deref(), Some("step 1"));
        assert!(runtime.check().is_ok());
    }

    #[tokio::test]
    async fn test_token_wakes_waiter() {
        let token = CancellationToken::new();
        let waiter = token.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        tokio::task::yield_now().await;
        token.cancel();
        handle.await.unwrap();
        assert!(token.is_cancelled());
    }
}
