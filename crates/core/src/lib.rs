//! Railway-oriented results: the error taxonomy, the `Result` alias and its
//! combinators, `Maybe`, and the tuple combine engine.
//!
//! Foundation crate -- no async or I/O dependencies. The async shapes live
//! in `railway-async`.

pub mod attempt;
pub mod combine;
pub mod error;
pub mod matching;
pub mod maybe;
pub mod railway;
pub mod result;
pub mod tuple;

pub use attempt::{attempt, attempt_with, Fault};
pub use combine::{combine, combine_iter, traverse, Combine, CombineAll};
pub use error::{
    AggregateError, Error, ErrorDetail, ErrorKind, FieldError, ValidationError, CANCELLED_CODE,
};
pub use matching::{flatten_errors, ErrorHandlers, UnhandledErrorKind};
pub use maybe::{Maybe, ToResult};
pub use railway::Railway;
pub use result::{
    failure, failure_if, failure_if_with, success, success_if, success_if_with, Result,
};
pub use tuple::{
    TupleRailway2, TupleRailway3, TupleRailway4, TupleRailway5, TupleRailway6, TupleRailway7,
    TupleRailway8, TupleRailway9,
};

/// Everything a pipeline usually needs, traits included.
pub mod prelude {
    pub use crate::attempt::{attempt, attempt_with, Fault};
    pub use crate::combine::{combine, combine_iter, traverse, Combine, CombineAll};
    pub use crate::error::{Error, ErrorKind, FieldError};
    pub use crate::matching::ErrorHandlers;
    pub use crate::maybe::{Maybe, ToResult};
    pub use crate::railway::Railway;
    pub use crate::result::{failure, failure_if, success, success_if, Result};
    pub use crate::tuple::{
        TupleRailway2, TupleRailway3, TupleRailway4, TupleRailway5, TupleRailway6,
        TupleRailway7, TupleRailway8, TupleRailway9,
    };
}
