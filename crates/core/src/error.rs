//! Closed error taxonomy carried on the failure track.
//!
//! Every failure is one of eleven kinds. Ten are leaf kinds; `Aggregate`
//! is a container produced when independent failures of different kinds
//! are combined.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use thiserror::Error as ThisError;

/// Code attached to failures produced by an observed cancellation.
pub const CANCELLED_CODE: &str = "cancelled.error";

// ---------------------------------------------------------------------------
// Kind discriminant
// ---------------------------------------------------------------------------

/// Fieldless discriminant of [`Error`].
///
/// Transport adapters switch over this to pick their own representation
/// without inspecting payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    BadRequest,
    Unauthorized,
    Forbidden,
    Domain,
    RateLimit,
    ServiceUnavailable,
    Unexpected,
    Aggregate,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [ErrorKind; 11] = [
        Self::Validation,
        Self::NotFound,
        Self::Conflict,
        Self::BadRequest,
        Self::Unauthorized,
        Self::Forbidden,
        Self::Domain,
        Self::RateLimit,
        Self::ServiceUnavailable,
        Self::Unexpected,
        Self::Aggregate,
    ];

    /// Stable snake_case name, matching the serialized form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::BadRequest => "bad_request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::Domain => "domain",
            Self::RateLimit => "rate_limit",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Unexpected => "unexpected",
            Self::Aggregate => "aggregate",
        }
    }

    /// Machine code used when a constructor is not given one.
    pub const fn default_code(self) -> &'static str {
        match self {
            Self::Validation => "validation.error",
            Self::NotFound => "not.found.error",
            Self::Conflict => "conflict.error",
            Self::BadRequest => "bad.request.error",
            Self::Unauthorized => "unauthorized.error",
            Self::Forbidden => "forbidden.error",
            Self::Domain => "domain.error",
            Self::RateLimit => "rate.limit.error",
            Self::ServiceUnavailable => "service.unavailable.error",
            Self::Unexpected => "unexpected.error",
            Self::Aggregate => "aggregate.error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Fields shared by every kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable code, e.g. `not.found.error`.
    pub code: String,
    /// Human-readable message.
    pub detail: String,
    /// Optional correlation or field identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ErrorDetail {
    fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            code: kind.default_code().to_string(),
            detail: detail.into(),
            instance: None,
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

/// Messages reported against one named field.
///
/// Most fields fail a single rule, so two messages are kept inline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldError {
    pub field_name: String,
    pub details: SmallVec<[String; 2]>,
}

impl FieldError {
    pub fn new<I, S>(field_name: impl Into<String>, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field_name: field_name.into(),
            details: details.into_iter().map(Into::into).collect(),
        }
    }
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
    #[serde(flatten)]
    pub base: ErrorDetail,
    /// Ordered by first appearance of each field.
    pub field_errors: Vec<FieldError>,
}

impl ValidationError {
    /// Folds `other` into `self`.
    ///
    /// Fields already present receive the new messages appended; unseen
    /// fields are pushed in the order `other` lists them.
    fn merge(&mut self, other: ValidationError) {
        for incoming in other.field_errors {
            match self
                .field_errors
                .iter_mut()
                .find(|fe| fe.field_name == incoming.field_name)
            {
                Some(existing) => existing.details.extend(incoming.details),
                None => self.field_errors.push(incoming),
            }
        }
        if !other.base.detail.is_empty() && other.base.detail != self.base.detail {
            self.base.detail = format!("{}; {}", self.base.detail, other.base.detail);
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base.detail)
    }
}

/// Container for heterogeneous failures that were observed together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregateError {
    #[serde(flatten)]
    pub base: ErrorDetail,
    pub errors: Vec<Error>,
}

impl AggregateError {
    fn new(errors: Vec<Error>) -> Self {
        Self {
            base: ErrorDetail::new(ErrorKind::Aggregate, "multiple errors occurred"),
            errors,
        }
    }

    /// Adds `next` to the children, keeping the set flat.
    ///
    /// Nested aggregates are unpacked, a Validation failure merges into the
    /// first Validation child, and a repeated cancellation is dropped.
    fn absorb(&mut self, next: Error) {
        match next {
            Error::Aggregate(inner) => {
                for child in inner.errors {
                    self.absorb(child);
                }
            }
            Error::Validation(incoming) => {
                let held = self.errors.iter_mut().find_map(|e| match e {
                    Error::Validation(v) => Some(v),
                    _ => None,
                });
                match held {
                    Some(held) => held.merge(incoming),
                    None => self.errors.push(Error::Validation(incoming)),
                }
            }
            next if next.is_cancellation() && self.errors.iter().any(Error::is_cancellation) => {}
            next => self.errors.push(next),
        }
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.base.detail)?;
        for (i, e) in self.errors.iter().enumerate() {
            let sep = if i == 0 { " " } else { "; " };
            write!(f, "{sep}[{}] {e}", e.kind())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// A failure on the railway.
///
/// The variant set is closed, so `match` over it is checked for
/// exhaustiveness by the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, ThisError, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Error {
    #[error("{0}")]
    Validation(ValidationError),
    #[error("{0}")]
    NotFound(ErrorDetail),
    #[error("{0}")]
    Conflict(ErrorDetail),
    #[error("{0}")]
    BadRequest(ErrorDetail),
    #[error("{0}")]
    Unauthorized(ErrorDetail),
    #[error("{0}")]
    Forbidden(ErrorDetail),
    #[error("{0}")]
    Domain(ErrorDetail),
    #[error("{0}")]
    RateLimit(ErrorDetail),
    #[error("{0}")]
    ServiceUnavailable(ErrorDetail),
    #[error("{0}")]
    Unexpected(ErrorDetail),
    #[error("{0}")]
    Aggregate(AggregateError),
}

impl Error {
    /// Validation failure not tied to a named field.
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::validation_field("", detail)
    }

    /// Validation failure for one field.
    pub fn validation_field(field_name: impl Into<String>, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation(ValidationError {
            field_errors: vec![FieldError::new(field_name, [detail.clone()])],
            base: ErrorDetail::new(ErrorKind::Validation, detail),
        })
    }

    /// Validation failure carrying a prepared field list, as produced by an
    /// external validator.
    pub fn validation_fields(field_errors: Vec<FieldError>, detail: impl Into<String>) -> Self {
        Self::Validation(ValidationError {
            base: ErrorDetail::new(ErrorKind::Validation, detail),
            field_errors,
        })
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound(ErrorDetail::new(ErrorKind::NotFound, detail))
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::Conflict(ErrorDetail::new(ErrorKind::Conflict, detail))
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest(ErrorDetail::new(ErrorKind::BadRequest, detail))
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::Unauthorized(ErrorDetail::new(ErrorKind::Unauthorized, detail))
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::Forbidden(ErrorDetail::new(ErrorKind::Forbidden, detail))
    }

    pub fn domain(detail: impl Into<String>) -> Self {
        Self::Domain(ErrorDetail::new(ErrorKind::Domain, detail))
    }

    pub fn rate_limit(detail: impl Into<String>) -> Self {
        Self::RateLimit(ErrorDetail::new(ErrorKind::RateLimit, detail))
    }

    pub fn service_unavailable(detail: impl Into<String>) -> Self {
        Self::ServiceUnavailable(ErrorDetail::new(ErrorKind::ServiceUnavailable, detail))
    }

    pub fn unexpected(detail: impl Into<String>) -> Self {
        Self::Unexpected(ErrorDetail::new(ErrorKind::Unexpected, detail))
    }

    /// Failure produced when a cancellation request stops a step.
    pub fn cancelled() -> Self {
        Self::unexpected("the operation was cancelled").with_code(CANCELLED_CODE)
    }

    /// Wraps `errors` as given, without flattening.
    pub fn aggregate(errors: Vec<Error>) -> Self {
        Self::Aggregate(AggregateError::new(errors))
    }

    /// Replaces the machine code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.base_mut().code = code.into();
        self
    }

    /// Attaches a correlation or field identifier.
    #[must_use]
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.base_mut().instance = Some(instance.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Domain(_) => ErrorKind::Domain,
            Self::RateLimit(_) => ErrorKind::RateLimit,
            Self::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            Self::Unexpected(_) => ErrorKind::Unexpected,
            Self::Aggregate(_) => ErrorKind::Aggregate,
        }
    }

    pub fn base(&self) -> &ErrorDetail {
        match self {
            Self::Validation(v) => &v.base,
            Self::Aggregate(a) => &a.base,
            Self::NotFound(d)
            | Self::Conflict(d)
            | Self::BadRequest(d)
            | Self::Unauthorized(d)
            | Self::Forbidden(d)
            | Self::Domain(d)
            | Self::RateLimit(d)
            | Self::ServiceUnavailable(d)
            | Self::Unexpected(d) => d,
        }
    }

    fn base_mut(&mut self) -> &mut ErrorDetail {
        match self {
            Self::Validation(v) => &mut v.base,
            Self::Aggregate(a) => &mut a.base,
            Self::NotFound(d)
            | Self::Conflict(d)
            | Self::BadRequest(d)
            | Self::Unauthorized(d)
            | Self::Forbidden(d)
            | Self::Domain(d)
            | Self::RateLimit(d)
            | Self::ServiceUnavailable(d)
            | Self::Unexpected(d) => d,
        }
    }

    pub fn code(&self) -> &str {
        &self.base().code
    }

    pub fn detail(&self) -> &str {
        &self.base().detail
    }

    pub fn instance(&self) -> Option<&str> {
        self.base().instance.as_deref()
    }

    /// Field errors when this is a Validation failure.
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            Self::Validation(v) => Some(&v.field_errors),
            _ => None,
        }
    }

    /// Children when this is an Aggregate.
    pub fn children(&self) -> Option<&[Error]> {
        match self {
            Self::Aggregate(a) => Some(&a.errors),
            _ => None,
        }
    }

    /// True for failures created by [`Error::cancelled`].
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Unexpected(d) if d.code == CANCELLED_CODE)
    }

    /// Merges two failures observed side by side.
    ///
    /// Two Validation errors merge field by field and two cancellations
    /// stay a single cancellation. Anything else lands in a flat Aggregate
    /// with `self`'s entries first, holding at most one Validation child
    /// and at most one cancellation.
    #[must_use]
    pub fn combine(self, other: Error) -> Error {
        match (self, other) {
            (Self::Validation(mut a), Self::Validation(b)) => {
                a.merge(b);
                Self::Validation(a)
            }
            (first, second) if first.is_cancellation() && second.is_cancellation() => first,
            (Self::Aggregate(mut a), other) => {
                a.absorb(other);
                Self::Aggregate(a)
            }
            (first, second) => {
                let mut a = AggregateError::new(vec![first]);
                a.absorb(second);
                Self::Aggregate(a)
            }
        }
    }
}

/// Folds an optional accumulated failure with a new one.
pub(crate) fn accumulate(acc: Option<Error>, next: Error) -> Option<Error> {
    Some(match acc {
        Some(prev) => prev.combine(next),
        None => next,
    })
}
