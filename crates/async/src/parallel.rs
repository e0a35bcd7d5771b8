//! Concurrent execution of independent async operations.
//!
//! [`Parallel`] is implemented for tuples of 2 to 9 factories
//! (`FnOnce() -> impl Future<Output = Result<T>>`). Every factory is
//! invoked at the call site; the returned future awaits all of them
//! jointly and folds the outcomes with the same rule as `combine`, so
//! every failure is reported, not just the first.
//!
//! ```ignore
//! let (user, orders, prefs) = (
//!     || fetch_user(id),
//!     || fetch_orders(id),
//!     || fetch_prefs(id),
//! )
//!     .parallel()
//!     .await?;
//! ```
//!
//! Nothing is spawned: the futures run concurrently on the caller's task.

use crate::cancellation::{skipped, CancellationToken};
use railway_core::{combine_iter, CombineAll, Error, Result};
use std::future::Future;

/// Joint execution of a tuple of result-producing factories.
pub trait Parallel {
    type Output;

    /// Awaits every operation and aggregates the outcomes.
    fn parallel(self) -> impl Future<Output = Result<Self::Output>> + Send;

    /// Like [`parallel`](Self::parallel), racing each operation against
    /// `token`. Operations still running when the token fires resolve to
    /// the cancellation failure. Nothing starts if the token is already
    /// cancelled.
    fn parallel_cancellable(
        self,
        token: &CancellationToken,
    ) -> impl Future<Output = Result<Self::Output>> + Send;
}

/// Resolves to `fut`'s outcome, or to the cancellation failure if `token`
/// fires first.
async fn until_cancelled<T, Fut>(fut: Fut, token: CancellationToken) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        outcome = fut => outcome,
        _ = token.cancelled() => Err(skipped("parallel branch")),
    }
}

fn log_outcome<T>(branches: usize, outcome: &Result<T>) {
    match outcome {
        Ok(_) => tracing::debug!(branches, "parallel operations succeeded"),
        Err(e) => tracing::debug!(
            branches,
            failures = e.children().map_or(1, <[Error]>::len),
            kind = %e.kind(),
            "parallel operations failed"
        ),
    }
}

macro_rules! impl_parallel {
    ($(($F:ident, $Fut:ident, $T:ident, $f:ident)),+) => {
        impl<$($F, $Fut, $T),+> Parallel for ($($F,)+)
        where
            $(
                $F: FnOnce() -> $Fut,
                $Fut: Future<Output = Result<$T>> + Send,
                $T: Send,
            )+
        {
            type Output = ($($T,)+);

            fn parallel(self) -> impl Future<Output = Result<Self::Output>> + Send {
                let ($($f,)+) = self;
                $(let $f = $f();)+
                let branches = [$(stringify!($f)),+].len();
                tracing::debug!(branches, "starting parallel operations");
                async move {
                    let outcome = tokio::join!($($f),+).combine_all();
                    log_outcome(branches, &outcome);
                    outcome
                }
            }

            fn parallel_cancellable(
                self,
                token: &CancellationToken,
            ) -> impl Future<Output = Result<Self::Output>> + Send {
                let branches = [$(stringify!($f)),+].len();
                let started = if token.is_cancelled() {
                    None
                } else {
                    let ($($f,)+) = self;
                    tracing::debug!(branches, "starting cancellable parallel operations");
                    Some(($(until_cancelled($f(), token.clone()),)+))
                };
                async move {
                    let Some(($($f,)+)) = started else {
                        return Err(skipped("parallel"));
                    };
                    let outcome = tokio::join!($($f),+).combine_all();
                    log_outcome(branches, &outcome);
                    outcome
                }
            }
        }
    };
}

impl_parallel!((F1, Fut1, T1, f1), (F2, Fut2, T2, f2));
impl_parallel!((F1, Fut1, T1, f1), (F2, Fut2, T2, f2), (F3, Fut3, T3, f3));
impl_parallel!(
    (F1, Fut1, T1, f1), (F2, Fut2, T2, f2), (F3, Fut3, T3, f3), (F4, Fut4, T4, f4)
);
impl_parallel!(
    (F1, Fut1, T1, f1), (F2, Fut2, T2, f2), (F3, Fut3, T3, f3), (F4, Fut4, T4, f4),
    (F5, Fut5, T5, f5)
);
impl_parallel!(
    (F1, Fut1, T1, f1), (F2, Fut2, T2, f2), (F3, Fut3, T3, f3), (F4, Fut4, T4, f4),
    (F5, Fut5, T5, f5), (F6, Fut6, T6, f6)
);
impl_parallel!(
    (F1, Fut1, T1, f1), (F2, Fut2, T2, f2), (F3, Fut3, T3, f3), (F4, Fut4, T4, f4),
    (F5, Fut5, T5, f5), (F6, Fut6, T6, f6), (F7, Fut7, T7, f7)
);
impl_parallel!(
    (F1, Fut1, T1, f1), (F2, Fut2, T2, f2), (F3, Fut3, T3, f3), (F4, Fut4, T4, f4),
    (F5, Fut5, T5, f5), (F6, Fut6, T6, f6), (F7, Fut7, T7, f7), (F8, Fut8, T8, f8)
);
impl_parallel!(
    (F1, Fut1, T1, f1), (F2, Fut2, T2, f2), (F3, Fut3, T3, f3), (F4, Fut4, T4, f4),
    (F5, Fut5, T5, f5), (F6, Fut6, T6, f6), (F7, Fut7, T7, f7), (F8, Fut8, T8, f8),
    (F9, Fut9, T9, f9)
);

/// Awaits any number of same-typed operations jointly, keeping input order
/// in the success vector and aggregating every failure.
pub async fn parallel_all<T, I, Fut>(operations: I) -> Result<Vec<T>>
where
    I: IntoIterator<Item = Fut>,
    Fut: Future<Output = Result<T>>,
{
    let outcomes = futures::future::join_all(operations).await;
    let branches = outcomes.len();
    let outcome = combine_iter(outcomes);
    log_outcome(branches, &outcome);
    outcome
}

/// [`parallel_all`] with each operation raced against `token`.
pub async fn parallel_all_cancellable<T, I, Fut>(
    token: &CancellationToken,
    operations: I,
) -> Result<Vec<T>>
where
    I: IntoIterator<Item = Fut>,
    Fut: Future<Output = Result<T>>,
{
    if token.is_cancelled() {
        return Err(skipped("parallel"));
    }
    let raced = operations
        .into_iter()
        .map(|op| until_cancelled(op, token.clone()));
    parallel_all(raced).await
}
