//! Async steps on an already-computed [`Result`].
//!
//! The receiver is synchronous; the step is async. Each method returns a
//! `Send` future, so chains continue with
//! [`FutureRailway`](crate::FutureRailway) methods.
//!
//! Async step closures receive `&T` / `&Error` for side effects and
//! predicates; the future they return must not borrow from that reference.
//! Copy what the future needs out of it first.

use crate::cancellation::{skipped, CancellationToken};
use railway_core::{Error, Result};
use std::future::Future;

/// Async and cancellable railway steps on [`Result`].
pub trait RailwayAsync<T>: Sized {
    /// Feeds the success value into an async fallible step.
    fn bind_async<U, F, Fut>(self, f: F) -> impl Future<Output = Result<U>> + Send
    where
        F: FnOnce(T) -> Fut + Send,
        Fut: Future<Output = Result<U>> + Send,
        U: Send;

    fn map_async<U, F, Fut>(self, f: F) -> impl Future<Output = Result<U>> + Send
    where
        F: FnOnce(T) -> Fut + Send,
        Fut: Future<Output = U> + Send,
        U: Send;

    fn tap_async<F, Fut>(self, f: F) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(&T) -> Fut + Send,
        Fut: Future<Output = ()> + Send;

    fn tap_on_failure_async<F, Fut>(self, f: F) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(&Error) -> Fut + Send,
        Fut: Future<Output = ()> + Send;

    fn ensure_async<P, Fut>(
        self,
        predicate: P,
        error: Error,
    ) -> impl Future<Output = Result<T>> + Send
    where
        P: FnOnce(&T) -> Fut + Send,
        Fut: Future<Output = bool> + Send;

    fn recover_on_failure_async<F, Fut>(self, f: F) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(Error) -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send;

    fn recover_on_failure_if_async<P, F, Fut>(
        self,
        predicate: P,
        f: F,
    ) -> impl Future<Output = Result<T>> + Send
    where
        P: FnOnce(&Error) -> bool + Send,
        F: FnOnce(Error) -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send;

    // -- Cancellable ------------------------------------------------------
    //
    // A step whose token is already cancelled does not run. On the success
    // path that yields the cancellation failure; an existing failure is
    // left as it is.

    fn bind_cancellable<U, F, Fut>(
        self,
        token: &CancellationToken,
        f: F,
    ) -> impl Future<Output = Result<U>> + Send
    where
        F: FnOnce(T, CancellationToken) -> Fut + Send,
        Fut: Future<Output = Result<U>> + Send,
        U: Send;

    fn map_cancellable<U, F, Fut>(
        self,
        token: &CancellationToken,
        f: F,
    ) -> impl Future<Output = Result<U>> + Send
    where
        F: FnOnce(T, CancellationToken) -> Fut + Send,
        Fut: Future<Output = U> + Send,
        U: Send;

    fn tap_cancellable<F, Fut>(
        self,
        token: &CancellationToken,
        f: F,
    ) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(&T, CancellationToken) -> Fut + Send,
        Fut: Future<Output = ()> + Send;

    /// The side effect is skipped when cancelled; the original failure is
    /// kept either way.
    fn tap_on_failure_cancellable<F, Fut>(
        self,
        token: &CancellationToken,
        f: F,
    ) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(&Error, CancellationToken) -> Fut + Send,
        Fut: Future<Output = ()> + Send;

    fn ensure_cancellable<P, Fut>(
        self,
        token: &CancellationToken,
        predicate: P,
        error: Error,
    ) -> impl Future<Output = Result<T>> + Send
    where
        P: FnOnce(&T, CancellationToken) -> Fut + Send,
        Fut: Future<Output = bool> + Send;

    /// A cancelled token turns a failure into the cancellation failure
    /// instead of recovering it.
    fn recover_on_failure_cancellable<F, Fut>(
        self,
        token: &CancellationToken,
        f: F,
    ) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(Error, CancellationToken) -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send;

    /// Cancellation checkpoint: a success becomes the cancellation failure
    /// when `token` is cancelled.
    fn guard(self, token: &CancellationToken) -> Result<T>;
}

impl<T: Send> RailwayAsync<T> for Result<T> {
    fn bind_async<U, F, Fut>(self, f: F) -> impl Future<Output = Result<U>> + Send
    where
        F: FnOnce(T) -> Fut + Send,
        Fut: Future<Output = Result<U>> + Send,
        U: Send,
    {
        async move {
            match self {
                Ok(value) => f(value).await,
                Err(e) => Err(e),
            }
        }
    }

    fn map_async<U, F, Fut>(self, f: F) -> impl Future<Output = Result<U>> + Send
    where
        F: FnOnce(T) -> Fut + Send,
        Fut: Future<Output = U> + Send,
        U: Send,
    {
        async move {
            match self {
                Ok(value) => Ok(f(value).await),
                Err(e) => Err(e),
            }
        }
    }

    fn tap_async<F, Fut>(self, f: F) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(&T) -> Fut + Send,
        Fut: Future<Output = ()> + Send,
    {
        async move {
            let effect = self.as_ref().ok().map(f);
            if let Some(effect) = effect {
                effect.await;
            }
            self
        }
    }

    fn tap_on_failure_async<F, Fut>(self, f: F) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(&Error) -> Fut + Send,
        Fut: Future<Output = ()> + Send,
    {
        async move {
            let effect = self.as_ref().err().map(f);
            if let Some(effect) = effect {
                effect.await;
            }
            self
        }
    }

    fn ensure_async<P, Fut>(
        self,
        predicate: P,
        error: Error,
    ) -> impl Future<Output = Result<T>> + Send
    where
        P: FnOnce(&T) -> Fut + Send,
        Fut: Future<Output = bool> + Send,
    {
        async move {
            let check = self.as_ref().ok().map(predicate);
            match check {
                Some(check) => {
                    if check.await {
                        self
                    } else {
                        Err(error)
                    }
                }
                None => self,
            }
        }
    }

    fn recover_on_failure_async<F, Fut>(self, f: F) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(Error) -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        async move {
            match self {
                Ok(value) => Ok(value),
                Err(e) => f(e).await,
            }
        }
    }

    fn recover_on_failure_if_async<P, F, Fut>(
        self,
        predicate: P,
        f: F,
    ) -> impl Future<Output = Result<T>> + Send
    where
        P: FnOnce(&Error) -> bool + Send,
        F: FnOnce(Error) -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        async move {
            match self {
                Err(e) => {
                    if predicate(&e) {
                        f(e).await
                    } else {
                        Err(e)
                    }
                }
                ok => ok,
            }
        }
    }

    fn bind_cancellable<U, F, Fut>(
        self,
        token: &CancellationToken,
        f: F,
    ) -> impl Future<Output = Result<U>> + Send
    where
        F: FnOnce(T, CancellationToken) -> Fut + Send,
        Fut: Future<Output = Result<U>> + Send,
        U: Send,
    {
        let token = token.clone();
        async move {
            match self {
                Err(e) => Err(e),
                Ok(_) if token.is_cancelled() => Err(skipped("bind")),
                Ok(value) => f(value, token).await,
            }
        }
    }

    fn map_cancellable<U, F, Fut>(
        self,
        token: &CancellationToken,
        f: F,
    ) -> impl Future<Output = Result<U>> + Send
    where
        F: FnOnce(T, CancellationToken) -> Fut + Send,
        Fut: Future<Output = U> + Send,
        U: Send,
    {
        let token = token.clone();
        async move {
            match self {
                Err(e) => Err(e),
                Ok(_) if token.is_cancelled() => Err(skipped("map")),
                Ok(value) => Ok(f(value, token).await),
            }
        }
    }

    fn tap_cancellable<F, Fut>(
        self,
        token: &CancellationToken,
        f: F,
    ) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(&T, CancellationToken) -> Fut + Send,
        Fut: Future<Output = ()> + Send,
    {
        let token = token.clone();
        async move {
            let effect = match &self {
                Err(_) => None,
                Ok(_) if token.is_cancelled() => return Err(skipped("tap")),
                Ok(value) => Some(f(value, token)),
            };
            if let Some(effect) = effect {
                effect.await;
            }
            self
        }
    }

    fn tap_on_failure_cancellable<F, Fut>(
        self,
        token: &CancellationToken,
        f: F,
    ) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(&Error, CancellationToken) -> Fut + Send,
        Fut: Future<Output = ()> + Send,
    {
        let token = token.clone();
        async move {
            let effect = match &self {
                Ok(_) => None,
                Err(_) if token.is_cancelled() => {
                    tracing::debug!(
                        step = "tap_on_failure",
                        "cancellation requested; side effect skipped"
                    );
                    None
                }
                Err(e) => Some(f(e, token)),
            };
            if let Some(effect) = effect {
                effect.await;
            }
            self
        }
    }

    fn ensure_cancellable<P, Fut>(
        self,
        token: &CancellationToken,
        predicate: P,
        error: Error,
    ) -> impl Future<Output = Result<T>> + Send
    where
        P: FnOnce(&T, CancellationToken) -> Fut + Send,
        Fut: Future<Output = bool> + Send,
    {
        let token = token.clone();
        async move {
            let check = match &self {
                Err(_) => None,
                Ok(_) if token.is_cancelled() => return Err(skipped("ensure")),
                Ok(value) => Some(predicate(value, token)),
            };
            match check {
                Some(check) => {
                    if check.await {
                        self
                    } else {
                        Err(error)
                    }
                }
                None => self,
            }
        }
    }

    fn recover_on_failure_cancellable<F, Fut>(
        self,
        token: &CancellationToken,
        f: F,
    ) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(Error, CancellationToken) -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        let token = token.clone();
        async move {
            match self {
                Ok(value) => Ok(value),
                Err(_) if token.is_cancelled() => Err(skipped("recover_on_failure")),
                Err(e) => f(e, token).await,
            }
        }
    }

    fn guard(self, token: &CancellationToken) -> Result<T> {
        match self {
            Ok(_) if token.is_cancelled() => Err(skipped("guard")),
            other => other,
        }
    }
}
