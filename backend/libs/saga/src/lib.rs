//! # Saga Workflow Pattern
//!
//! Multi-step workflows against external collaborators cannot run inside a
//! transaction: each step commits on a remote system the moment it returns.
//! This library implements the saga pattern for such workflows: every
//! completed step registers a compensating action, and when a later step
//! fails the registered compensations run in reverse order before the
//! error is handed back to the caller.
//!
//! Compensation is best-effort by design. A compensation that fails is
//! logged and skipped so that the remaining compensations still run and the
//! original step error is never masked.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use saga::Saga;
//!
//! # async fn allocate() -> Result<u64, String> { Ok(1) }
//! # async fn release(_id: u64) -> Result<(), String> { Ok(()) }
//! # async fn record(_id: u64) -> Result<(), String> { Ok(()) }
//! async fn create_thing() -> Result<(), String> {
//!     let mut saga = Saga::new("create_thing");
//!
//!     // Step 1: allocate a remote resource.
//!     let resource_id = saga.try_step(allocate()).await?;
//!
//!     // Undo for step 1, should any later step fail.
//!     saga.push("release resource", move || async move {
//!         release(resource_id).await
//!     });
//!
//!     // Step 2: on failure, the release above runs before `?` returns.
//!     saga.try_step(record(resource_id)).await?;
//!
//!     // Success: discard the compensations.
//!     saga.commit();
//!     Ok(())
//! }
//! ```

use futures::future::BoxFuture;
use std::fmt::Display;
use std::future::Future;

/// A compensating action registered for a completed step.
struct Compensation<E> {
    label: &'static str,
    run: Box<dyn FnOnce() -> BoxFuture<'static, Result<(), E>> + Send>,
}

/// An in-flight workflow holding the compensations for its completed steps.
///
/// `E` is the error type produced by compensating actions; it only needs to
/// be printable, since compensation failures are logged and swallowed.
pub struct Saga<E> {
    name: &'static str,
    compensations: Vec<Compensation<E>>,
}

impl<E: Display> Saga<E> {
    /// Start a new saga. The name is used in unwind diagnostics only.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            compensations: Vec::new(),
        }
    }

    /// Register the compensating action for the most recently completed
    /// step. Compensations run in reverse registration order on unwind.
    pub fn push<F, Fut>(&mut self, label: &'static str, compensation: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
    {
        self.compensations.push(Compensation {
            label,
            run: Box::new(move || Box::pin(compensation())),
        });
    }

    /// Await a fallible step. On failure, unwind every registered
    /// compensation before returning the step's own error unchanged.
    pub async fn try_step<T, Err, Fut>(&mut self, step: Fut) -> Result<T, Err>
    where
        Fut: Future<Output = Result<T, Err>>,
    {
        match step.await {
            Ok(value) => Ok(value),
            Err(err) => {
                self.unwind().await;
                Err(err)
            }
        }
    }

    /// Run all registered compensations, newest first. Failures are logged
    /// and skipped; the remaining compensations still run.
    pub async fn unwind(&mut self) {
        while let Some(compensation) = self.compensations.pop() {
            tracing::debug!(saga = self.name, step = compensation.label, "compensating");
            if let Err(err) = (compensation.run)().await {
                tracing::warn!(
                    saga = self.name,
                    step = compensation.label,
                    "compensation failed, continuing unwind: {}",
                    err
                );
            }
        }
    }

    /// The workflow succeeded: drop the compensations without running them.
    pub fn commit(mut self) {
        self.compensations.clear();
    }

    /// Number of compensations currently registered.
    pub fn depth(&self) -> usize {
        self.compensations.len()
    }
}
