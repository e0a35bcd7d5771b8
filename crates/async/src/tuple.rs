//! Async destructuring consumers for tuple results.
//!
//! Two traits per arity (2..=9):
//!
//! - `AsyncTupleRailwayN` on `Result<(T1, .., Tn)>` for async steps;
//! - `FutureTupleRailwayN` on futures of such results, with both sync and
//!   async steps.

use railway_core::tuple::{
    TupleRailway2, TupleRailway3, TupleRailway4, TupleRailway5, TupleRailway6, TupleRailway7,
    TupleRailway8, TupleRailway9,
};
use railway_core::{Error, Result};
use std::future::Future;

macro_rules! async_tuple_railway {
    ($on_result:ident, $on_future:ident, $sync:ident; $(($T:ident, $v:ident)),+) => {
        /// Async tuple steps on a computed tuple result.
        pub trait $on_result<$($T),+>: Sized {
            fn bind_n_async<U, Func, Fut>(
                self,
                step: Func,
            ) -> impl Future<Output = Result<U>> + Send
            where
                Func: FnOnce($($T),+) -> Fut + Send,
                Fut: Future<Output = Result<U>> + Send,
                U: Send;

            fn map_n_async<U, Func, Fut>(self, step: Func) -> impl Future<Output = Result<U>> + Send
            where
                Func: FnOnce($($T),+) -> Fut + Send,
                Fut: Future<Output = U> + Send,
                U: Send;

            fn tap_n_async<Func, Fut>(self, step: Func) -> impl Future<Output = Self> + Send
            where
                Func: FnOnce($(&$T),+) -> Fut + Send,
                Fut: Future<Output = ()> + Send;
        }

        impl<$($T: Send),+> $on_result<$($T),+> for Result<($($T,)+)> {
            fn bind_n_async<U, Func, Fut>(
                self,
                step: Func,
            ) -> impl Future<Output = Result<U>> + Send
            where
                Func: FnOnce($($T),+) -> Fut + Send,
                Fut: Future<Output = Result<U>> + Send,
                U: Send,
            {
                async move {
                    match self {
                        Ok(($($v,)+)) => step($($v),+).await,
                        Err(e) => Err(e),
                    }
                }
            }

            fn map_n_async<U, Func, Fut>(self, step: Func) -> impl Future<Output = Result<U>> + Send
            where
                Func: FnOnce($($T),+) -> Fut + Send,
                Fut: Future<Output = U> + Send,
                U: Send,
            {
                async move {
                    match self {
                        Ok(($($v,)+)) => Ok(step($($v),+).await),
                        Err(e) => Err(e),
                    }
                }
            }

            fn tap_n_async<Func, Fut>(self, step: Func) -> impl Future<Output = Self> + Send
            where
                Func: FnOnce($(&$T),+) -> Fut + Send,
                Fut: Future<Output = ()> + Send,
            {
                async move {
                    let effect = match &self {
                        Ok(($($v,)+)) => Some(step($($v),+)),
                        Err(_) => None,
                    };
                    if let Some(effect) = effect {
                        effect.await;
                    }
                    self
                }
            }
        }

        /// Tuple steps on a future of a tuple result.
        pub trait $on_future<$($T: Send),+>: Future<Output = Result<($($T,)+)>> + Send + Sized {
            fn bind_n<U, Func>(self, step: Func) -> impl Future<Output = Result<U>> + Send
            where
                Func: FnOnce($($T),+) -> Result<U> + Send,
                U: Send,
            {
                async move { $sync::bind_n(self.await, step) }
            }

            fn map_n<U, Func>(self, step: Func) -> impl Future<Output = Result<U>> + Send
            where
                Func: FnOnce($($T),+) -> U + Send,
                U: Send,
            {
                async move { $sync::map_n(self.await, step) }
            }

            fn tap_n<Func>(self, step: Func) -> impl Future<Output = Result<($($T,)+)>> + Send
            where
                Func: FnOnce($(&$T),+) + Send,
            {
                async move { $sync::tap_n(self.await, step) }
            }

            fn ensure_n<Pred>(
                self,
                predicate: Pred,
                error: Error,
            ) -> impl Future<Output = Result<($($T,)+)>> + Send
            where
                Pred: FnOnce($(&$T),+) -> bool + Send,
            {
                async move { $sync::ensure_n(self.await, predicate, error) }
            }

            fn match_n<R, OnOk, OnErr>(
                self,
                on_success: OnOk,
                on_failure: OnErr,
            ) -> impl Future<Output = R> + Send
            where
                OnOk: FnOnce($($T),+) -> R + Send,
                OnErr: FnOnce(Error) -> R + Send,
            {
                async move { $sync::match_n(self.await, on_success, on_failure) }
            }

            fn bind_n_async<U, Func, Fut>(
                self,
                step: Func,
            ) -> impl Future<Output = Result<U>> + Send
            where
                Func: FnOnce($($T),+) -> Fut + Send,
                Fut: Future<Output = Result<U>> + Send,
                U: Send,
            {
                async move { $on_result::bind_n_async(self.await, step).await }
            }

            fn map_n_async<U, Func, Fut>(self, step: Func) -> impl Future<Output = Result<U>> + Send
            where
                Func: FnOnce($($T),+) -> Fut + Send,
                Fut: Future<Output = U> + Send,
                U: Send,
            {
                async move { $on_result::map_n_async(self.await, step).await }
            }

            fn tap_n_async<Func, Fut>(
                self,
                step: Func,
            ) -> impl Future<Output = Result<($($T,)+)>> + Send
            where
                Func: FnOnce($(&$T),+) -> Fut + Send,
                Fut: Future<Output = ()> + Send,
            {
                async move { $on_result::tap_n_async(self.await, step).await }
            }
        }

        impl<Src, $($T: Send),+> $on_future<$($T),+> for Src
        where
            Src: Future<Output = Result<($($T,)+)>> + Send,
        {
        }
    };
}

async_tuple_railway!(AsyncTupleRailway2, FutureTupleRailway2, TupleRailway2; (A, a), (B, b));
async_tuple_railway!(
    AsyncTupleRailway3, FutureTupleRailway3, TupleRailway3; (A, a), (B, b), (C, c)
);
async_tuple_railway!(
    AsyncTupleRailway4, FutureTupleRailway4, TupleRailway4; (A, a), (B, b), (C, c), (D, d)
);
async_tuple_railway!(
    AsyncTupleRailway5, FutureTupleRailway5, TupleRailway5; (A, a), (B, b), (C, c), (D, d), (E, e)
);
async_tuple_railway!(
    AsyncTupleRailway6, FutureTupleRailway6, TupleRailway6;
    (A, a), (B, b), (C, c), (D, d), (E, e), (F, f)
);
async_tuple_railway!(
    AsyncTupleRailway7, FutureTupleRailway7, TupleRailway7;
    (A, a), (B, b), (C, c), (D, d), (E, e), (F, f), (G, g)
);
async_tuple_railway!(
    AsyncTupleRailway8, FutureTupleRailway8, TupleRailway8;
    (A, a), (B, b), (C, c), (D, d), (E, e), (F, f), (G, g), (H, h)
);
async_tuple_railway!(
    AsyncTupleRailway9, FutureTupleRailway9, TupleRailway9;
    (A, a), (B, b), (C, c), (D, d), (E, e), (F, f), (G, g), (H, h), (I, i)
);
