//! The success/failure container and its construction primitives.
//!
//! `Result<T>` is the std `Result` with the failure track fixed to
//! [`Error`]. `Ok` is the success track, `Err` the failure track.

use crate::error::Error;

/// Outcome of a railway step.
pub type Result<T> = std::result::Result<T, Error>;

pub fn success<T>(value: T) -> Result<T> {
    Ok(value)
}

pub fn failure<T>(error: Error) -> Result<T> {
    Err(error)
}

/// Success when `condition` holds, otherwise `error`.
pub fn success_if<T>(condition: bool, value: T, error: Error) -> Result<T> {
    if condition {
        Ok(value)
    } else {
        Err(error)
    }
}

/// Failure when `condition` holds, otherwise `value`.
pub fn failure_if<T>(condition: bool, value: T, error: Error) -> Result<T> {
    success_if(!condition, value, error)
}

/// Lazy form of [`success_if`]; `predicate` runs exactly once.
pub fn success_if_with<T, P>(predicate: P, value: T, error: Error) -> Result<T>
where
    P: FnOnce() -> bool,
{
    success_if(predicate(), value, error)
}

/// Lazy form of [`failure_if`]; `predicate` runs exactly once.
pub fn failure_if_with<T, P>(predicate: P, value: T, error: Error) -> Result<T>
where
    P: FnOnce() -> bool,
{
    failure_if(predicate(), value, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn eager_conditions() {
        assert_eq!(success_if(true, 1, Error::domain("no")), Ok(1));
        assert_eq!(
            success_if(false, 1, Error::domain("no")),
            Err(Error::domain("no"))
        );
        assert_eq!(failure_if(false, 1, Error::domain("no")), Ok(1));
        assert_eq!(
            failure_if(true, 1, Error::domain("no")).unwrap_err().kind(),
            ErrorKind::Domain
        );
    }

    #[test]
    fn lazy_conditions_run_predicate_once() {
        let mut calls = 0;
        let r = success_if_with(
            || {
                calls += 1;
                true
            },
            "ok",
            Error::conflict("taken"),
        );
        assert_eq!(r, Ok("ok"));
        assert_eq!(calls, 1);

        let r = failure_if_with(|| true, "ok", Error::conflict("taken"));
        assert_eq!(r, Err(Error::conflict("taken")));
    }

    #[test]
    fn constructors_pick_the_track() {
        assert_eq!(success::<u8>(3), Ok(3));
        assert_eq!(failure::<u8>(Error::not_found("x")), Err(Error::not_found("x")));
    }
}
