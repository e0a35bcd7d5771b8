//! Transport rendering of pipeline outcomes.
//!
//! Maps every failure kind to an HTTP-style status and renders outcomes as
//! a JSON envelope or as plain text.

use railway_core::{Error, ErrorHandlers, Railway, Result};
use serde::Serialize;
use std::fmt::{self, Write};

/// Status reported for cancelled work.
pub const STATUS_CANCELLED: u16 = 499;

/// HTTP-style status for a failure.
///
/// An aggregate reports the most severe status among its members.
pub fn status(error: &Error) -> u16 {
    match error {
        Error::Validation(_) => 422,
        Error::NotFound(_) => 404,
        Error::Conflict(_) => 409,
        Error::BadRequest(_) => 400,
        Error::Unauthorized(_) => 401,
        Error::Forbidden(_) => 403,
        Error::Domain(_) => 422,
        Error::RateLimit(_) => 429,
        Error::ServiceUnavailable(_) => 503,
        Error::Unexpected(_) if error.is_cancellation() => STATUS_CANCELLED,
        Error::Unexpected(_) => 500,
        Error::Aggregate(a) => a.errors.iter().map(status).max().unwrap_or(500),
    }
}

/// JSON shape of an outcome.
#[derive(Debug, Serialize)]
pub struct Envelope<'a, T> {
    pub status: u16,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a Error>,
}

impl<'a, T> Envelope<'a, T> {
    pub fn new(outcome: &'a Result<T>) -> Self {
        Self {
            status: outcome.try_get_error().map_or(200, status),
            success: outcome.is_success(),
            data: outcome.try_get_value(),
            error: outcome.try_get_error(),
        }
    }
}

pub fn to_json<T: Serialize>(outcome: &Result<T>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Envelope::new(outcome))
}

/// Human-readable rendering, one line per field error or aggregated failure.
pub fn to_text<T: fmt::Debug>(outcome: Result<T>) -> String {
    outcome.match_error(
        |value| format!("ok: {value:?}\n"),
        ErrorHandlers::new()
            .on_validation(|v| {
                let mut out = String::from("invalid input\n");
                for fe in &v.field_errors {
                    let _ = writeln!(out, "  {}: {}", fe.field_name, fe.details.join("; "));
                }
                out
            })
            .on_error(|e| {
                let mut out = String::new();
                for leaf in railway_core::flatten_errors(&e) {
                    let _ = writeln!(
                        out,
                        "{} [{}] {}: {}",
                        status(leaf),
                        leaf.kind(),
                        leaf.code(),
                        leaf.detail()
                    );
                }
                out
            }),
    )
}
