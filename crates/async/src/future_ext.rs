//! Railway steps on a future of a [`Result`].
//!
//! [`FutureRailway`] is implemented for every `Send` future whose output is
//! a `Result`, which includes the futures returned by every async step in
//! this crate. Sync steps keep their sync names (`bind`, `map`, `tap`, ..);
//! async steps use the `_async` suffix and cancellable ones `_cancellable`.
//!
//! `map` shares its name with `futures::FutureExt::map`. Import only one of
//! the two traits in a module that chains futures.

use crate::cancellation::CancellationToken;
use crate::result_ext::RailwayAsync;
use railway_core::{Error, ErrorHandlers, Railway, Result, UnhandledErrorKind};
use std::future::Future;

/// Railway combinators on `Future<Output = Result<T>>`.
///
/// ```ignore
/// let receipt = load_cart(id)                      // async source
///     .ensure(|cart| !cart.is_empty(), Error::domain("empty cart"))
///     .bind_async(|cart| charge(cart))             // async step
///     .tap(|receipt| tracing::info!(%receipt.id, "charged"))
///     .await;
/// ```
pub trait FutureRailway<T: Send>: Future<Output = Result<T>> + Send + Sized {
    // -- Sync steps -------------------------------------------------------

    fn bind<U, F>(self, f: F) -> impl Future<Output = Result<U>> + Send
    where
        F: FnOnce(T) -> Result<U> + Send,
        U: Send,
    {
        async move { Railway::bind(self.await, f) }
    }

    fn map<U, F>(self, f: F) -> impl Future<Output = Result<U>> + Send
    where
        F: FnOnce(T) -> U + Send,
        U: Send,
    {
        async move { self.await.map(f) }
    }

    fn tap<F>(self, f: F) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(&T) + Send,
    {
        async move { Railway::tap(self.await, f) }
    }

    fn tap_on_failure<F>(self, f: F) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(&Error) + Send,
    {
        async move { Railway::tap_on_failure(self.await, f) }
    }

    fn ensure<P>(self, predicate: P, error: Error) -> impl Future<Output = Result<T>> + Send
    where
        P: FnOnce(&T) -> bool + Send,
    {
        async move { Railway::ensure(self.await, predicate, error) }
    }

    fn ensure_with<P, E>(self, predicate: P, error: E) -> impl Future<Output = Result<T>> + Send
    where
        P: FnOnce(&T) -> bool + Send,
        E: FnOnce(&T) -> Error + Send,
    {
        async move { Railway::ensure_with(self.await, predicate, error) }
    }

    fn recover_on_failure<F>(self, f: F) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(Error) -> Result<T> + Send,
    {
        async move { Railway::recover_on_failure(self.await, f) }
    }

    fn recover_on_failure_if<P, F>(
        self,
        predicate: P,
        f: F,
    ) -> impl Future<Output = Result<T>> + Send
    where
        P: FnOnce(&Error) -> bool + Send,
        F: FnOnce(Error) -> Result<T> + Send,
    {
        async move { Railway::recover_on_failure_if(self.await, predicate, f) }
    }

    /// Cancellation checkpoint before the next sync step.
    fn guard(self, token: &CancellationToken) -> impl Future<Output = Result<T>> + Send {
        let token = token.clone();
        async move { RailwayAsync::guard(self.await, &token) }
    }

    // -- Terminal steps ---------------------------------------------------

    fn match_result<R, S, E>(self, on_success: S, on_failure: E) -> impl Future<Output = R> + Send
    where
        S: FnOnce(T) -> R + Send,
        E: FnOnce(Error) -> R + Send,
    {
        async move { Railway::match_result(self.await, on_success, on_failure) }
    }

    /// # Panics
    /// When the failure's kind has no handler and `on_error` is unset.
    fn match_error<'h, R, S>(
        self,
        on_success: S,
        handlers: ErrorHandlers<'h, R>,
    ) -> impl Future<Output = R> + Send
    where
        S: FnOnce(T) -> R + Send,
    {
        async move { Railway::match_error(self.await, on_success, handlers) }
    }

    fn try_match_error<'h, R, S>(
        self,
        on_success: S,
        handlers: ErrorHandlers<'h, R>,
    ) -> impl Future<Output = std::result::Result<R, UnhandledErrorKind>> + Send
    where
        S: FnOnce(T) -> R + Send,
    {
        async move { Railway::try_match_error(self.await, on_success, handlers) }
    }

    /// # Panics
    /// Same as [`match_error`](Self::match_error).
    fn switch_error<'h, S>(
        self,
        on_success: S,
        handlers: ErrorHandlers<'h, ()>,
    ) -> impl Future<Output = ()> + Send
    where
        S: FnOnce(T) + Send,
    {
        async move { Railway::switch_error(self.await, on_success, handlers) }
    }

    // -- Async steps ------------------------------------------------------

    fn bind_async<U, F, Fut>(self, f: F) -> impl Future<Output = Result<U>> + Send
    where
        F: FnOnce(T) -> Fut + Send,
        Fut: Future<Output = Result<U>> + Send,
        U: Send,
    {
        async move { self.await.bind_async(f).await }
    }

    fn map_async<U, F, Fut>(self, f: F) -> impl Future<Output = Result<U>> + Send
    where
        F: FnOnce(T) -> Fut + Send,
        Fut: Future<Output = U> + Send,
        U: Send,
    {
        async move { self.await.map_async(f).await }
    }

    fn tap_async<F, Fut>(self, f: F) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(&T) -> Fut + Send,
        Fut: Future<Output = ()> + Send,
    {
        async move { self.await.tap_async(f).await }
    }

    fn tap_on_failure_async<F, Fut>(self, f: F) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(&Error) -> Fut + Send,
        Fut: Future<Output = ()> + Send,
    {
        async move { self.await.tap_on_failure_async(f).await }
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
        async move { self.await.ensure_async(predicate, error).await }
    }

    fn recover_on_failure_async<F, Fut>(self, f: F) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(Error) -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        async move { self.await.recover_on_failure_async(f).await }
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
        async move { self.await.recover_on_failure_if_async(predicate, f).await }
    }

    // -- Cancellable async steps ------------------------------------------

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
        async move { self.await.bind_cancellable(&token, f).await }
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
        async move { self.await.map_cancellable(&token, f).await }
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
        async move { self.await.tap_cancellable(&token, f).await }
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
        async move { self.await.tap_on_failure_cancellable(&token, f).await }
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
        async move { self.await.ensure_cancellable(&token, predicate, error).await }
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
        async move { self.await.recover_on_failure_cancellable(&token, f).await }
    }
}

impl<T, Src> FutureRailway<T> for Src
where
    T: Send,
    Src: Future<Output = Result<T>> + Send,
{
}
