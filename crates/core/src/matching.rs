//! Kind-based routing of failures to caller handlers.
//!
//! [`ErrorHandlers`] collects optional per-kind handlers plus an optional
//! catch-all. Dispatch picks the handler for the failure's kind, falls back
//! to the catch-all, and reports [`UnhandledErrorKind`] when neither exists.
//!
//! Aggregates only ever reach the catch-all.

use crate::error::{AggregateError, Error, ErrorDetail, ErrorKind, ValidationError};
use thiserror::Error as ThisError;

type Handler<'a, P, R> = Option<Box<dyn FnOnce(P) -> R + Send + 'a>>;

/// A failure reached dispatch with no handler for its kind and no fallback.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unhandled error kind `{kind}`: no matching handler and no on_error fallback")]
pub struct UnhandledErrorKind {
    pub kind: ErrorKind,
    /// The failure that could not be routed.
    pub error: Error,
}

/// Per-kind failure handlers for `match_error` / `switch_error`.
///
/// ```ignore
/// let status = lookup(id).match_error(
///     |user| 200,
///     ErrorHandlers::new()
///         .on_not_found(|_| 404)
///         .on_error(|_| 500),
/// );
/// ```
///
/// The same builder feeds the async `match_error`, whose future owns the
/// handlers, so every handler must be `Send`. Handlers may borrow state
/// that is `Sync` (atomics, a `Mutex`), but not `Rc` or `Cell`:
///
/// ```compile_fail
/// use railway_core::ErrorHandlers;
/// use std::rc::Rc;
///
/// let hits = Rc::new(0);
/// let _ = ErrorHandlers::<()>::new().on_error(move |_| {
///     let _ = &hits;
/// });
/// ```
pub struct ErrorHandlers<'a, R> {
    validation: Handler<'a, ValidationError, R>,
    not_found: Handler<'a, ErrorDetail, R>,
    conflict: Handler<'a, ErrorDetail, R>,
    bad_request: Handler<'a, ErrorDetail, R>,
    unauthorized: Handler<'a, ErrorDetail, R>,
    forbidden: Handler<'a, ErrorDetail, R>,
    domain: Handler<'a, ErrorDetail, R>,
    rate_limit: Handler<'a, ErrorDetail, R>,
    service_unavailable: Handler<'a, ErrorDetail, R>,
    unexpected: Handler<'a, ErrorDetail, R>,
    fallback: Handler<'a, Error, R>,
}

macro_rules! handler_setters {
    ($( $(#[$doc:meta])* $method:ident => $slot:ident : $payload:ty ),+ $(,)?) => {
        $(
            $(#[$doc])*
            #[must_use]
            pub fn $method<F>(mut self, f: F) -> Self
            where
                F: FnOnce($payload) -> R + Send + 'a,
            {
                self.$slot = Some(Box::new(f));
                self
            }
        )+
    };
}

impl<'a, R> ErrorHandlers<'a, R> {
    pub fn new() -> Self {
        Self {
            validation: None,
            not_found: None,
            conflict: None,
            bad_request: None,
            unauthorized: None,
            forbidden: None,
            domain: None,
            rate_limit: None,
            service_unavailable: None,
            unexpected: None,
            fallback: None,
        }
    }

    handler_setters! {
        on_validation => validation: ValidationError,
        on_not_found => not_found: ErrorDetail,
        on_conflict => conflict: ErrorDetail,
        on_bad_request => bad_request: ErrorDetail,
        on_unauthorized => unauthorized: ErrorDetail,
        on_forbidden => forbidden: ErrorDetail,
        on_domain => domain: ErrorDetail,
        on_rate_limit => rate_limit: ErrorDetail,
        on_service_unavailable => service_unavailable: ErrorDetail,
        on_unexpected => unexpected: ErrorDetail,
        /// Catch-all for kinds without a handler, and for aggregates.
        on_error => fallback: Error,
    }

    /// Whether a failure of `kind` would be routed somewhere.
    pub fn handles(&self, kind: ErrorKind) -> bool {
        self.has_specific(kind) || self.fallback.is_some()
    }

    fn has_specific(&self, kind: ErrorKind) -> bool {
        match kind {
            ErrorKind::Validation => self.validation.is_some(),
            ErrorKind::NotFound => self.not_found.is_some(),
            ErrorKind::Conflict => self.conflict.is_some(),
            ErrorKind::BadRequest => self.bad_request.is_some(),
            ErrorKind::Unauthorized => self.unauthorized.is_some(),
            ErrorKind::Forbidden => self.forbidden.is_some(),
            ErrorKind::Domain => self.domain.is_some(),
            ErrorKind::RateLimit => self.rate_limit.is_some(),
            ErrorKind::ServiceUnavailable => self.service_unavailable.is_some(),
            ErrorKind::Unexpected => self.unexpected.is_some(),
            ErrorKind::Aggregate => false,
        }
    }

    /// Routes `error` to exactly one handler.
    pub fn dispatch(self, error: Error) -> Result<R, UnhandledErrorKind> {
        macro_rules! route {
            ($slot:expr, $variant:ident, $payload:ident) => {
                match $slot {
                    Some(handler) => return Ok(handler($payload)),
                    None => Error::$variant($payload),
                }
            };
        }

        let unrouted = match error {
            Error::Validation(v) => route!(self.validation, Validation, v),
            Error::NotFound(d) => route!(self.not_found, NotFound, d),
            Error::Conflict(d) => route!(self.conflict, Conflict, d),
            Error::BadRequest(d) => route!(self.bad_request, BadRequest, d),
            Error::Unauthorized(d) => route!(self.unauthorized, Unauthorized, d),
            Error::Forbidden(d) => route!(self.forbidden, Forbidden, d),
            Error::Domain(d) => route!(self.domain, Domain, d),
            Error::RateLimit(d) => route!(self.rate_limit, RateLimit, d),
            Error::ServiceUnavailable(d) => {
                route!(self.service_unavailable, ServiceUnavailable, d)
            }
            Error::Unexpected(d) => route!(self.unexpected, Unexpected, d),
            Error::Aggregate(a) => Error::Aggregate(a),
        };

        match self.fallback {
            Some(handler) => Ok(handler(unrouted)),
            None => {
                let kind = unrouted.kind();
                tracing::error!(
                    %kind,
                    error = %unrouted,
                    "failure reached dispatch with no handler"
                );
                Err(UnhandledErrorKind {
                    kind,
                    error: unrouted,
                })
            }
        }
    }

    /// Like [`dispatch`](Self::dispatch) but treats a missing handler as a
    /// programming error.
    ///
    /// # Panics
    /// When no handler applies to the failure's kind.
    #[track_caller]
    pub fn dispatch_or_panic(self, error: Error) -> R {
        match self.dispatch(error) {
            Ok(value) => value,
            Err(violation) => panic!("{violation}"),
        }
    }
}

impl<R> Default for ErrorHandlers<'_, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> std::fmt::Debug for ErrorHandlers<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handled: Vec<_> = ErrorKind::ALL
            .into_iter()
            .filter(|kind| self.has_specific(*kind))
            .collect();
        f.debug_struct("ErrorHandlers")
            .field("handled", &handled)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

/// Unpacks an aggregate's children, or yields the error itself.
pub fn flatten_errors(error: &Error) -> Vec<&Error> {
    match error {
        Error::Aggregate(AggregateError { errors, .. }) => errors.iter().collect(),
        other => vec![other],
    }
}
