//! Optional values that do not imply failure.
//!
//! A [`Maybe`] sits beside the railway rather than on it. The only way
//! onto the railway is [`ToResult::to_result`], which supplies the failure
//! to use when the value is absent.

use crate::error::Error;
use crate::result::Result;
use serde::{Deserialize, Serialize};

/// A value that may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Maybe<T>(Option<T>);

impl<T> Maybe<T> {
    pub const fn some(value: T) -> Self {
        Self(Some(value))
    }

    pub const fn none() -> Self {
        Self(None)
    }

    pub fn has_value(&self) -> bool {
        self.0.is_some()
    }

    pub fn has_no_value(&self) -> bool {
        self.0.is_none()
    }

    /// # Panics
    /// When no value is present.
    #[track_caller]
    pub fn value(&self) -> &T {
        match &self.0 {
            Some(value) => value,
            None => panic!("attempted to read the value of an empty Maybe"),
        }
    }

    pub fn try_get_value(&self) -> Option<&T> {
        self.0.as_ref()
    }

    pub fn get_value_or_default(self, default: T) -> T {
        self.0.unwrap_or(default)
    }

    pub fn map<U, F>(self, f: F) -> Maybe<U>
    where
        F: FnOnce(T) -> U,
    {
        Maybe(self.0.map(f))
    }

    pub fn bind<U, F>(self, f: F) -> Maybe<U>
    where
        F: FnOnce(T) -> Maybe<U>,
    {
        match self.0 {
            Some(value) => f(value),
            None => Maybe::none(),
        }
    }

    pub fn into_option(self) -> Option<T> {
        self.0
    }
}

impl<T> Default for Maybe<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

impl<T> From<Maybe<T>> for Option<T> {
    fn from(value: Maybe<T>) -> Self {
        value.0
    }
}

/// Bridge from possibly-absent values onto the railway.
///
/// This is the conversion repository- and transport-style collaborators
/// use when a lookup may come back empty.
pub trait ToResult<T> {
    /// Present becomes success; absent becomes `error`.
    fn to_result(self, error: Error) -> Result<T>;

    /// Builds the failure only when the value is absent.
    fn to_result_with<F>(self, error: F) -> Result<T>
    where
        F: FnOnce() -> Error;
}

impl<T> ToResult<T> for Option<T> {
    fn to_result(self, error: Error) -> Result<T> {
        self.ok_or(error)
    }

    fn to_result_with<F>(self, error: F) -> Result<T>
    where
        F: FnOnce() -> Error,
    {
        self.ok_or_else(error)
    }
}

impl<T> ToResult<T> for Maybe<T> {
    fn to_result(self, error: Error) -> Result<T> {
        self.0.to_result(error)
    }

    fn to_result_with<F>(self, error: F) -> Result<T>
    where
        F: FnOnce() -> Error,
    {
        self.0.to_result_with(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn present_value_becomes_success() {
        assert_eq!(Maybe::some(4).to_result(Error::not_found("x")), Ok(4));
    }

    #[test]
    fn absent_value_becomes_supplied_failure() {
        let r = Maybe::<u8>::none().to_result(Error::not_found("user 9"));
        let err = r.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.detail(), "user 9");
    }

    #[test]
    fn option_bridge_is_lazy() {
        let mut built = false;
        let r = Some(1).to_result_with(|| {
            built = true;
            Error::not_found("x")
        });
        assert_eq!(r, Ok(1));
        assert!(!built);

        assert!(None::<u8>.to_result(Error::not_found("x")).is_err());
    }

    #[test]
    fn map_and_bind_stay_off_the_railway() {
        let doubled = Maybe::some(3).map(|x| x * 2);
        assert_eq!(doubled, Maybe::some(6));

        let halved = Maybe::some(6).bind(|x| {
            if x % 2 == 0 {
                Maybe::some(x / 2)
            } else {
                Maybe::none()
            }
        });
        assert_eq!(halved.into_option(), Some(3));

        let nothing: Maybe<i32> = Maybe::none().map(|x: i32| x + 1);
        assert!(nothing.has_no_value());
    }

    #[test]
    fn accessors() {
        let m = Maybe::from(Some("a"));
        assert!(m.has_value());
        assert_eq!(*m.value(), "a");
        assert_eq!(m.try_get_value(), Some(&"a"));
        assert_eq!(Maybe::<&str>::none().get_value_or_default("z"), "z");
    }

    #[test]
    #[should_panic(expected = "empty Maybe")]
    fn value_of_empty_panics() {
        let _ = Maybe::<u8>::none().value();
    }
}
