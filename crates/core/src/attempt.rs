//! The fault-to-failure boundary.
//!
//! [`attempt`] runs a computation that may return an error of any type or
//! panic, and puts either outcome on the failure track. Only the fault's
//! message crosses the boundary; the fault value itself is dropped so the
//! resulting [`Error`] stays serializable.
//!
//! No other combinator catches panics.

use crate::error::Error;
use crate::result::Result;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// What went wrong inside an attempted computation.
#[derive(Debug)]
pub enum Fault<E> {
    /// The computation returned an error.
    Raised(E),
    /// The computation panicked; the payload's message, if it had one.
    Panicked(String),
}

impl<E: fmt::Display> Fault<E> {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl<E: fmt::Display> fmt::Display for Fault<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raised(e) => write!(f, "{e}"),
            Self::Panicked(msg) => f.write_str(msg),
        }
    }
}

/// Default mapping: an Unexpected failure carrying the message only.
pub fn unexpected_fault<E: fmt::Display>(fault: Fault<E>) -> Error {
    Error::unexpected(fault.message())
}

/// Extracts a readable message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "computation panicked".to_string()
    }
}

/// Runs `f`, mapping returned errors and panics to Unexpected failures.
pub fn attempt<T, E, F>(f: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, E>,
    E: fmt::Display,
{
    attempt_with(f, unexpected_fault)
}

/// Runs `f`, mapping returned errors and panics through `mapper`.
pub fn attempt_with<T, E, F, M>(f: F, mapper: M) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, E>,
    M: FnOnce(Fault<E>) -> Error,
    E: fmt::Display,
{
    let fault = match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(e)) => Fault::Raised(e),
        Err(payload) => Fault::Panicked(panic_message(payload.as_ref())),
    };
    tracing::warn!(fault = %fault, "attempted computation failed");
    Err(mapper(fault))
}
