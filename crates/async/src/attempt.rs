//! Async fault boundary and async conditional constructors.

use crate::cancellation::{skipped, CancellationToken};
use futures::FutureExt;
use railway_core::attempt::{panic_message, unexpected_fault};
use railway_core::{Error, Fault, Result};
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Awaits `fut`, mapping a returned error or a panic to an Unexpected
/// failure carrying only the message.
pub async fn attempt_async<T, E, Fut>(fut: Fut) -> Result<T>
where
    Fut: Future<Output = std::result::Result<T, E>>,
    E: fmt::Display,
{
    attempt_async_with(fut, unexpected_fault).await
}

/// Awaits `fut`, mapping a returned error or a panic through `mapper`.
pub async fn attempt_async_with<T, E, Fut, M>(fut: Fut, mapper: M) -> Result<T>
where
    Fut: Future<Output = std::result::Result<T, E>>,
    M: FnOnce(Fault<E>) -> Error,
    E: fmt::Display,
{
    let fault = match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(e)) => Fault::Raised(e),
        Err(payload) => Fault::Panicked(panic_message(payload.as_ref())),
    };
    tracing::warn!(fault = %fault, "attempted computation failed");
    Err(mapper(fault))
}

/// Runs `f` with a clone of `token` behind the fault boundary.
///
/// Never starts when the token is already cancelled. Cancellation while it
/// runs, or an error returned after the token was cancelled, yields the
/// cancellation failure.
pub async fn attempt_cancellable<T, E, F, Fut>(token: &CancellationToken, f: F) -> Result<T>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: fmt::Display,
{
    if token.is_cancelled() {
        return Err(skipped("attempt"));
    }
    let child = token.clone();
    let guarded = attempt_async(async move { f(child).await });
    tokio::select! {
        biased;
        outcome = guarded => match outcome {
            Err(_) if token.is_cancelled() => Err(skipped("attempt")),
            other => other,
        },
        _ = token.cancelled() => Err(skipped("attempt")),
    }
}

/// Success carrying `value` when the async `predicate` holds.
pub async fn success_if_async<T, P, Fut>(predicate: P, value: T, error: Error) -> Result<T>
where
    P: FnOnce() -> Fut,
    Fut: Future<Output = bool>,
{
    if predicate().await {
        Ok(value)
    } else {
        Err(error)
    }
}

/// Failure with `error` when the async `predicate` holds.
pub async fn failure_if_async<T, P, Fut>(predicate: P, value: T, error: Error) -> Result<T>
where
    P: FnOnce() -> Fut,
    Fut: Future<Output = bool>,
{
    if predicate().await {
        Err(error)
    } else {
        Ok(value)
    }
}
