//! Synchronous sequencing combinators over [`Result`].
//!
//! Success-path steps (`bind`, `tap`, `ensure`) never run once a failure
//! is on the track; the failure travels on untouched. Only
//! `recover_on_failure*` may replace it. `map` is std's inherent
//! `Result::map`.
//!
//! None of these catch panics: a panicking step unwinds through the chain.
//! [`attempt`](crate::attempt::attempt) is the boundary that converts
//! faults into failures.

use crate::error::Error;
use crate::matching::{ErrorHandlers, UnhandledErrorKind};
use crate::result::Result;

/// Railway combinators on [`Result`].
pub trait Railway<T>: Sized {
    fn is_success(&self) -> bool;

    fn is_failure(&self) -> bool;

    /// The success value.
    ///
    /// # Panics
    /// When called on a failure.
    fn value(&self) -> &T;

    /// The failure.
    ///
    /// # Panics
    /// When called on a success.
    fn error(&self) -> &Error;

    fn try_get_value(&self) -> Option<&T>;

    fn try_get_error(&self) -> Option<&Error>;

    /// Feeds the success value into the next fallible step.
    fn bind<U, F>(self, f: F) -> Result<U>
    where
        F: FnOnce(T) -> Result<U>;

    /// Runs a side effect on success; the value passes through.
    fn tap<F>(self, f: F) -> Self
    where
        F: FnOnce(&T);

    /// Runs a side effect on failure; the failure passes through.
    fn tap_on_failure<F>(self, f: F) -> Self
    where
        F: FnOnce(&Error);

    /// Turns a success into `error` when `predicate` rejects its value.
    fn ensure<P>(self, predicate: P, error: Error) -> Self
    where
        P: FnOnce(&T) -> bool;

    /// Like [`ensure`](Self::ensure), building the failure from the value.
    fn ensure_with<P, E>(self, predicate: P, error: E) -> Self
    where
        P: FnOnce(&T) -> bool,
        E: FnOnce(&T) -> Error;

    /// Replaces any failure with the outcome of `f`.
    fn recover_on_failure<F>(self, f: F) -> Self
    where
        F: FnOnce(Error) -> Result<T>;

    /// Replaces a failure with the outcome of `f` when `predicate` accepts it.
    fn recover_on_failure_if<P, F>(self, predicate: P, f: F) -> Self
    where
        P: FnOnce(&Error) -> bool,
        F: FnOnce(Error) -> Result<T>;

    /// Collapses both tracks into one value.
    fn match_result<R, S, E>(self, on_success: S, on_failure: E) -> R
    where
        S: FnOnce(T) -> R,
        E: FnOnce(Error) -> R;

    /// Collapses both tracks, routing the failure by kind.
    ///
    /// # Panics
    /// When the failure's kind has no handler and `on_error` is unset.
    fn match_error<R, S>(self, on_success: S, handlers: ErrorHandlers<'_, R>) -> R
    where
        S: FnOnce(T) -> R;

    /// Non-panicking [`match_error`](Self::match_error).
    fn try_match_error<R, S>(
        self,
        on_success: S,
        handlers: ErrorHandlers<'_, R>,
    ) -> std::result::Result<R, UnhandledErrorKind>
    where
        S: FnOnce(T) -> R;

    /// Side-effecting [`match_error`](Self::match_error).
    ///
    /// # Panics
    /// Same as [`match_error`](Self::match_error).
    fn switch_error<S>(self, on_success: S, handlers: ErrorHandlers<'_, ()>)
    where
        S: FnOnce(T),
    {
        self.match_error(on_success, handlers)
    }
}

impl<T> Railway<T> for Result<T> {
    fn is_success(&self) -> bool {
        self.is_ok()
    }

    fn is_failure(&self) -> bool {
        self.is_err()
    }

    #[track_caller]
    fn value(&self) -> &T {
        match self {
            Ok(value) => value,
            Err(e) => panic!(
                "attempted to read the value of a failed result ({}: {e})",
                e.kind()
            ),
        }
    }

    #[track_caller]
    fn error(&self) -> &Error {
        match self {
            Ok(_) => panic!("attempted to read the error of a successful result"),
            Err(e) => e,
        }
    }

    fn try_get_value(&self) -> Option<&T> {
        self.as_ref().ok()
    }

    fn try_get_error(&self) -> Option<&Error> {
        self.as_ref().err()
    }

    fn bind<U, F>(self, f: F) -> Result<U>
    where
        F: FnOnce(T) -> Result<U>,
    {
        self.and_then(f)
    }

    fn tap<F>(self, f: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Ok(ref value) = self {
            f(value);
        }
        self
    }

    fn tap_on_failure<F>(self, f: F) -> Self
    where
        F: FnOnce(&Error),
    {
        if let Err(ref e) = self {
            f(e);
        }
        self
    }

    fn ensure<P>(self, predicate: P, error: Error) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        self.ensure_with(predicate, |_| error)
    }

    fn ensure_with<P, E>(self, predicate: P, error: E) -> Self
    where
        P: FnOnce(&T) -> bool,
        E: FnOnce(&T) -> Error,
    {
        match self {
            Ok(value) => {
                if predicate(&value) {
                    Ok(value)
                } else {
                    Err(error(&value))
                }
            }
            Err(e) => Err(e),
        }
    }

    fn recover_on_failure<F>(self, f: F) -> Self
    where
        F: FnOnce(Error) -> Result<T>,
    {
        self.or_else(f)
    }

    fn recover_on_failure_if<P, F>(self, predicate: P, f: F) -> Self
    where
        P: FnOnce(&Error) -> bool,
        F: FnOnce(Error) -> Result<T>,
    {
        match self {
            Ok(value) => Ok(value),
            Err(e) => {
                if predicate(&e) {
                    f(e)
                } else {
                    Err(e)
                }
            }
        }
    }

    fn match_result<R, S, E>(self, on_success: S, on_failure: E) -> R
    where
        S: FnOnce(T) -> R,
        E: FnOnce(Error) -> R,
    {
        match self {
            Ok(value) => on_success(value),
            Err(e) => on_failure(e),
        }
    }

    #[track_caller]
    fn match_error<R, S>(self, on_success: S, handlers: ErrorHandlers<'_, R>) -> R
    where
        S: FnOnce(T) -> R,
    {
        match self {
            Ok(value) => on_success(value),
            Err(e) => handlers.dispatch_or_panic(e),
        }
    }

    fn try_match_error<R, S>(
        self,
        on_success: S,
        handlers: ErrorHandlers<'_, R>,
    ) -> std::result::Result<R, UnhandledErrorKind>
    where
        S: FnOnce(T) -> R,
    {
        match self {
            Ok(value) => Ok(on_success(value)),
            Err(e) => handlers.dispatch(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::result::{failure, success};
    use std::cell::Cell;

    #[test]
    fn projections_on_success() {
        let r = success(5);
        assert!(r.is_success());
        assert!(!r.is_failure());
        assert_eq!(*r.value(), 5);
        assert_eq!(r.try_get_value(), Some(&5));
        assert_eq!(r.try_get_error(), None);
    }

    #[test]
    fn projections_on_failure() {
        let r = failure::<i32>(Error::not_found("gone"));
        assert!(r.is_failure());
        assert_eq!(r.error().kind(), ErrorKind::NotFound);
        assert_eq!(r.try_get_value(), None);
        assert_eq!(r.try_get_error(), Some(&Error::not_found("gone")));
    }

    #[test]
    #[should_panic(expected = "value of a failed result")]
    fn value_on_failure_panics() {
        let r = failure::<i32>(Error::domain("x"));
        let _ = r.value();
    }

    #[test]
    #[should_panic(expected = "error of a successful result")]
    fn error_on_success_panics() {
        let r = success(1);
        let _ = r.error();
    }

    #[test]
    fn bind_chains_successes() {
        let r = success(2).bind(|x| success(x * 10)).bind(|x| success(x + 1));
        assert_eq!(r, Ok(21));
    }

    #[test]
    fn failure_short_circuits_every_success_step() {
        let called = Cell::new(false);
        let original = Error::conflict("stale");
        let r = failure::<i32>(original.clone())
            .bind(|x| {
                called.set(true);
                success(x)
            })
            .map(|x| {
                called.set(true);
                x + 1
            })
            .tap(|_| called.set(true))
            .ensure(
                |_| {
                    called.set(true);
                    true
                },
                Error::domain("never"),
            );
        assert_eq!(r, Err(original));
        assert!(!called.get());
    }

    #[test]
    fn tap_sees_value_and_passes_it_on() {
        let seen = Cell::new(0);
        let r = success(7).tap(|v| seen.set(*v));
        assert_eq!(seen.get(), 7);
        assert_eq!(r, Ok(7));
    }

    #[test]
    fn tap_on_failure_only_runs_on_failure() {
        let hits = Cell::new(0);
        let _ = success(1).tap_on_failure(|_| hits.set(hits.get() + 1));
        let r = failure::<i32>(Error::forbidden("no")).tap_on_failure(|e| {
            assert_eq!(e.kind(), ErrorKind::Forbidden);
            hits.set(hits.get() + 1);
        });
        assert_eq!(hits.get(), 1);
        assert!(r.is_failure());
    }

    #[test]
    fn ensure_rejects_small_values() {
        let r = success(5).ensure(|x| *x > 10, Error::validation("too small"));
        let err = r.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.detail(), "too small");

        assert_eq!(success(50).ensure(|x| *x > 10, Error::validation("too small")), Ok(50));
    }

    #[test]
    fn ensure_with_builds_error_from_value() {
        let r = success(3).ensure_with(|x| *x % 2 == 0, |x| Error::domain(format!("{x} is odd")));
        assert_eq!(r.unwrap_err().detail(), "3 is odd");
    }

    #[test]
    fn recover_replaces_failure_as_is() {
        let r =
            failure::<i32>(Error::service_unavailable("down")).recover_on_failure(|_| success(0));
        assert_eq!(r, Ok(0));

        let r = failure::<i32>(Error::service_unavailable("down"))
            .recover_on_failure(|_| failure(Error::unexpected("still down")));
        assert_eq!(r.unwrap_err().kind(), ErrorKind::Unexpected);
    }

    #[test]
    fn recover_never_runs_on_success() {
        let called = Cell::new(false);
        let r = success(9).recover_on_failure(|_| {
            called.set(true);
            success(0)
        });
        assert_eq!(r, Ok(9));
        assert!(!called.get());
    }

    #[test]
    fn recover_if_respects_predicate() {
        let called = Cell::new(false);
        let r = failure::<i32>(Error::not_found("missing")).recover_on_failure_if(
            |e| e.kind() == ErrorKind::ServiceUnavailable,
            |_| {
                called.set(true);
                success(1)
            },
        );
        assert_eq!(r, Err(Error::not_found("missing")));
        assert!(!called.get());

        let r = failure::<i32>(Error::service_unavailable("blip")).recover_on_failure_if(
            |e| e.kind() == ErrorKind::ServiceUnavailable,
            |_| success(1),
        );
        assert_eq!(r, Ok(1));
    }

    #[test]
    fn match_result_is_total() {
        assert_eq!(success(2).match_result(|v| v * 2, |_| -1), 4);
        assert_eq!(failure::<i32>(Error::domain("x")).match_result(|v| v, |_| -1), -1);
    }

    #[test]
    fn match_error_routes_by_kind() {
        let handlers = || {
            ErrorHandlers::new()
                .on_not_found(|_| "not found")
                .on_error(|_| "other")
        };
        assert_eq!(
            failure::<i32>(Error::not_found("x")).match_error(|_| "ok", handlers()),
            "not found"
        );
        assert_eq!(
            failure::<i32>(Error::conflict("x")).match_error(|_| "ok", handlers()),
            "other"
        );
        assert_eq!(success(1).match_error(|_| "ok", handlers()), "ok");
    }

    #[test]
    #[should_panic(expected = "unhandled error kind `not_found`")]
    fn match_error_without_handlers_panics() {
        failure::<i32>(Error::not_found("x")).match_error(|v| v, ErrorHandlers::new());
    }

    #[test]
    fn try_match_error_reports_violation() {
        let violation = failure::<i32>(Error::unauthorized("who?"))
            .try_match_error(|v| v, ErrorHandlers::new())
            .unwrap_err();
        assert_eq!(violation.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn switch_error_runs_side_effects() {
        let mut log = Vec::new();
        failure::<i32>(Error::rate_limit("slow"))
            .switch_error(|_| {}, ErrorHandlers::new().on_rate_limit(|d| log.push(d.detail)));
        assert_eq!(log, ["slow"]);
    }
}
