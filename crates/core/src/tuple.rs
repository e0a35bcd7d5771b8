//! Destructuring consumers for tuple results.
//!
//! `combine` produces `Result<(T1, .., Tn)>`; these traits let the next step
//! take the components as separate parameters instead of one tuple.
//! One trait per arity (2..=9) is generated; each is implemented only for
//! results of its own arity, so the `_n` method names never collide.

use crate::error::Error;
use crate::result::Result;

macro_rules! tuple_railway {
    ($(#[$doc:meta])* $name:ident; $(($T:ident, $v:ident)),+) => {
        $(#[$doc])*
        pub trait $name<$($T),+>: Sized {
            fn bind_n<U, Func>(self, f: Func) -> Result<U>
            where
                Func: FnOnce($($T),+) -> Result<U>;

            fn map_n<U, Func>(self, f: Func) -> Result<U>
            where
                Func: FnOnce($($T),+) -> U;

            fn tap_n<Func>(self, f: Func) -> Self
            where
                Func: FnOnce($(&$T),+);

            fn ensure_n<Pred>(self, predicate: Pred, error: Error) -> Self
            where
                Pred: FnOnce($(&$T),+) -> bool;

            fn match_n<R, OnOk, OnErr>(self, on_success: OnOk, on_failure: OnErr) -> R
            where
                OnOk: FnOnce($($T),+) -> R,
                OnErr: FnOnce(Error) -> R;
        }

        impl<$($T),+> $name<$($T),+> for Result<($($T,)+)> {
            fn bind_n<U, Func>(self, f: Func) -> Result<U>
            where
                Func: FnOnce($($T),+) -> Result<U>,
            {
                match self {
                    Ok(($($v,)+)) => f($($v),+),
                    Err(e) => Err(e),
                }
            }

            fn map_n<U, Func>(self, f: Func) -> Result<U>
            where
                Func: FnOnce($($T),+) -> U,
            {
                match self {
                    Ok(($($v,)+)) => Ok(f($($v),+)),
                    Err(e) => Err(e),
                }
            }

            fn tap_n<Func>(self, f: Func) -> Self
            where
                Func: FnOnce($(&$T),+),
            {
                if let Ok(($($v,)+)) = &self {
                    f($($v),+);
                }
                self
            }

            fn ensure_n<Pred>(self, predicate: Pred, error: Error) -> Self
            where
                Pred: FnOnce($(&$T),+) -> bool,
            {
                let keep = match &self {
                    Ok(($($v,)+)) => predicate($($v),+),
                    Err(_) => true,
                };
                if keep {
                    self
                } else {
                    Err(error)
                }
            }

            fn match_n<R, OnOk, OnErr>(self, on_success: OnOk, on_failure: OnErr) -> R
            where
                OnOk: FnOnce($($T),+) -> R,
                OnErr: FnOnce(Error) -> R,
            {
                match self {
                    Ok(($($v,)+)) => on_success($($v),+),
                    Err(e) => on_failure(e),
                }
            }
        }
    };
}

tuple_railway!(
    /// Destructuring consumers for `Result<(A, B)>`.
    TupleRailway2; (A, a), (B, b)
);
tuple_railway!(TupleRailway3; (A, a), (B, b), (C, c));
tuple_railway!(TupleRailway4; (A, a), (B, b), (C, c), (D, d));
tuple_railway!(TupleRailway5; (A, a), (B, b), (C, c), (D, d), (E, e));
tuple_railway!(TupleRailway6; (A, a), (B, b), (C, c), (D, d), (E, e), (F, f));
tuple_railway!(TupleRailway7; (A, a), (B, b), (C, c), (D, d), (E, e), (F, f), (G, g));
tuple_railway!(TupleRailway8; (A, a), (B, b), (C, c), (D, d), (E, e), (F, f), (G, g), (H, h));
tuple_railway!(
    TupleRailway9; (A, a), (B, b), (C, c), (D, d), (E, e), (F, f), (G, g), (H, h), (I, i)
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::{combine, Combine};
    use crate::result::{failure, success};
    use std::cell::Cell;

    #[test]
    fn bind_n_receives_separate_parameters() {
        let r = combine(success(2), success(3)).bind_n(|a, b| success(a * b));
        assert_eq!(r, Ok(6));
    }

    #[test]
    fn nine_values_arrive_in_order() {
        let r = combine(success(1), success(2))
            .combine(success(3))
            .combine(success(4))
            .combine(success(5))
            .combine(success(6))
            .combine(success(7))
            .combine(success(8))
            .combine(success(9))
            .bind_n(|a, b, c, d, e, f, g, h, i| success(vec![a, b, c, d, e, f, g, h, i]));
        assert_eq!(r, Ok(vec![1, 2, 3, 4, 5, 6, 7, 8, 9]));
    }

    #[test]
    fn map_n_and_tap_n() {
        let seen = Cell::new(0);
        let r = combine(success(1), success(2))
            .combine(success(3))
            .tap_n(|a, b, c| seen.set(a + b + c))
            .map_n(|a, b, c| format!("{a}-{b}-{c}"));
        assert_eq!(seen.get(), 6);
        assert_eq!(r, Ok("1-2-3".to_string()));
    }

    #[test]
    fn ensure_n_checks_all_components() {
        let ok =
            combine(success(1), success(5)).ensure_n(|lo, hi| lo < hi, Error::domain("range"));
        assert_eq!(ok, Ok((1, 5)));

        let bad =
            combine(success(9), success(5)).ensure_n(|lo, hi| lo < hi, Error::domain("range"));
        assert_eq!(bad, Err(Error::domain("range")));
    }

    #[test]
    fn failures_skip_tuple_steps() {
        let called = Cell::new(false);
        let r: Result<i32> = combine(failure::<i32>(Error::not_found("x")), success(1))
            .tap_n(|_, _| called.set(true))
            .ensure_n(
                |_, _| {
                    called.set(true);
                    true
                },
                Error::domain("never"),
            )
            .bind_n(|a, b| {
                called.set(true);
                success(a + b)
            });
        assert_eq!(r, Err(Error::not_found("x")));
        assert!(!called.get());
    }

    #[test]
    fn match_n_collapses_both_tracks() {
        let ok = combine(success(2), success(5)).match_n(|a, b| a + b, |_| 0);
        assert_eq!(ok, 7);
        let failed =
            combine(success(2), failure::<i32>(Error::domain("x"))).match_n(|a, b| a + b, |_| 0);
        assert_eq!(failed, 0);
    }
}
