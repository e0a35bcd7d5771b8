//! Async shapes of the railway: async steps on results, steps on futures
//! of results, cooperative cancellation, and parallel fan-out.
//!
//! Every combinator returns a `Send` future and nothing here spawns tasks;
//! chains run on whatever task awaits them.

pub mod attempt;
pub mod cancellation;
pub mod future_ext;
pub mod parallel;
pub mod result_ext;
pub mod tuple;

pub use attempt::{
    attempt_async, attempt_async_with, attempt_cancellable, failure_if_async, success_if_async,
};
pub use cancellation::CancellationToken;
pub use future_ext::FutureRailway;
pub use parallel::{parallel_all, parallel_all_cancellable, Parallel};
pub use result_ext::RailwayAsync;
pub use tuple::{
    AsyncTupleRailway2, AsyncTupleRailway3, AsyncTupleRailway4, AsyncTupleRailway5,
    AsyncTupleRailway6, AsyncTupleRailway7, AsyncTupleRailway8, AsyncTupleRailway9,
    FutureTupleRailway2, FutureTupleRailway3, FutureTupleRailway4, FutureTupleRailway5,
    FutureTupleRailway6, FutureTupleRailway7, FutureTupleRailway8, FutureTupleRailway9,
};

/// The core prelude plus every async trait.
pub mod prelude {
    pub use crate::attempt::{
        attempt_async, attempt_async_with, attempt_cancellable, failure_if_async,
        success_if_async,
    };
    pub use crate::cancellation::CancellationToken;
    pub use crate::future_ext::FutureRailway;
    pub use crate::parallel::{parallel_all, parallel_all_cancellable, Parallel};
    pub use crate::result_ext::RailwayAsync;
    pub use crate::tuple::{
        AsyncTupleRailway2, AsyncTupleRailway3, AsyncTupleRailway4, AsyncTupleRailway5,
        AsyncTupleRailway6, AsyncTupleRailway7, AsyncTupleRailway8, AsyncTupleRailway9,
        FutureTupleRailway2, FutureTupleRailway3, FutureTupleRailway4, FutureTupleRailway5,
        FutureTupleRailway6, FutureTupleRailway7, FutureTupleRailway8, FutureTupleRailway9,
    };
    pub use railway_core::prelude::*;
}
