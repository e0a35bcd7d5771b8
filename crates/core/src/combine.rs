//! Non-short-circuiting joins of independent results.
//!
//! Every operand is inspected, so independent failures surface together:
//! Validation failures merge field by field, anything else lands in an
//! Aggregate. Successes are packed into flat tuples up to arity 9.
//!
//! ```ignore
//! let user = combine(email, name)   // Result<(Email, Name)>
//!     .combine(age)                 // Result<(Email, Name, Age)>
//!     .map_n(User::new);
//! ```

use crate::error::{accumulate, Error};
use crate::result::Result;

/// Pairs two results.
pub fn combine<A, B>(a: Result<A>, b: Result<B>) -> Result<(A, B)> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(first), Err(second)) => Err(first.combine(second)),
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
    }
}

/// Appends one more result to a tuple result, keeping the tuple flat.
///
/// Implemented for tuple results of arity 2 through 8.
pub trait Combine<Next> {
    type Output;

    fn combine(self, next: Result<Next>) -> Result<Self::Output>;
}

/// Joins a tuple of 2 to 9 results in one step.
pub trait CombineAll {
    type Output;

    fn combine_all(self) -> Result<Self::Output>;
}

macro_rules! impl_combine {
    ($(($T:ident, $v:ident)),+) => {
        impl<$($T,)+ Next> Combine<Next> for Result<($($T,)+)> {
            type Output = ($($T,)+ Next);

            fn combine(self, next: Result<Next>) -> Result<Self::Output> {
                match (self, next) {
                    (Ok(($($v,)+)), Ok(next)) => Ok(($($v,)+ next)),
                    (Err(first), Err(second)) => Err(first.combine(second)),
                    (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
                }
            }
        }
    };
}

impl_combine!((A, a), (B, b));
impl_combine!((A, a), (B, b), (C, c));
impl_combine!((A, a), (B, b), (C, c), (D, d));
impl_combine!((A, a), (B, b), (C, c), (D, d), (E, e));
impl_combine!((A, a), (B, b), (C, c), (D, d), (E, e), (F, f));
impl_combine!((A, a), (B, b), (C, c), (D, d), (E, e), (F, f), (G, g));
impl_combine!((A, a), (B, b), (C, c), (D, d), (E, e), (F, f), (G, g), (H, h));

macro_rules! impl_combine_all {
    (($T1:ident, $r1:ident), ($T2:ident, $r2:ident) $(, ($T:ident, $r:ident))*) => {
        impl<$T1, $T2 $(, $T)*> CombineAll for (Result<$T1>, Result<$T2> $(, Result<$T>)*) {
            type Output = ($T1, $T2 $(, $T)*);

            fn combine_all(self) -> Result<Self::Output> {
                let ($r1, $r2 $(, $r)*) = self;
                combine($r1, $r2)$(.combine($r))*
            }
        }
    };
}

impl_combine_all!((A, a), (B, b));
impl_combine_all!((A, a), (B, b), (C, c));
impl_combine_all!((A, a), (B, b), (C, c), (D, d));
impl_combine_all!((A, a), (B, b), (C, c), (D, d), (E, e));
impl_combine_all!((A, a), (B, b), (C, c), (D, d), (E, e), (F, f));
impl_combine_all!((A, a), (B, b), (C, c), (D, d), (E, e), (F, f), (G, g));
impl_combine_all!((A, a), (B, b), (C, c), (D, d), (E, e), (F, f), (G, g), (H, h));
impl_combine_all!((A, a), (B, b), (C, c), (D, d), (E, e), (F, f), (G, g), (H, h), (I, i));

/// Joins any number of same-typed results, keeping input order.
pub fn combine_iter<T, I>(results: I) -> Result<Vec<T>>
where
    I: IntoIterator<Item = Result<T>>,
{
    let iter = results.into_iter();
    let mut values = Vec::with_capacity(iter.size_hint().0);
    let mut failed: Option<Error> = None;
    for result in iter {
        match result {
            Ok(value) if failed.is_none() => values.push(value),
            Ok(_) => {}
            Err(e) => failed = accumulate(failed, e),
        }
    }
    match failed {
        Some(e) => Err(e),
        None => Ok(values),
    }
}

/// Applies `f` to every item and joins the outcomes.
pub fn traverse<T, U, I, F>(items: I, f: F) -> Result<Vec<U>>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Result<U>,
{
    combine_iter(items.into_iter().map(f))
}
