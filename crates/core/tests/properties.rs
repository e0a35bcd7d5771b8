//! Property-based tests for the railway laws.
//!
//! - Every result is exactly one of success or failure
//! - Success-path steps never touch a failure
//! - Combine never loses a failure and keeps left-to-right order
//! - Validation merges keep every field, first-seen order, wherever the
//!   validation failures sit among other kinds

use proptest::prelude::*;
use railway_core::prelude::*;

fn any_error() -> impl Strategy<Value = Error> {
    (0usize..11, "[a-z ]{1,20}", "[a-z]{1,6}").prop_map(|(idx, detail, field)| {
        match ErrorKind::ALL[idx] {
            ErrorKind::Validation => Error::validation_field(field, detail),
            ErrorKind::NotFound => Error::not_found(detail),
            ErrorKind::Conflict => Error::conflict(detail),
            ErrorKind::BadRequest => Error::bad_request(detail),
            ErrorKind::Unauthorized => Error::unauthorized(detail),
            ErrorKind::Forbidden => Error::forbidden(detail),
            ErrorKind::Domain => Error::domain(detail),
            ErrorKind::RateLimit => Error::rate_limit(detail),
            ErrorKind::ServiceUnavailable => Error::service_unavailable(detail),
            ErrorKind::Unexpected => Error::unexpected(detail),
            ErrorKind::Aggregate => {
                Error::aggregate(vec![Error::not_found(detail), Error::conflict(field)])
            }
        }
    })
}

fn any_result() -> impl Strategy<Value = Result<i64>> {
    prop_oneof![
        any::<i64>().prop_map(success),
        any_error().prop_map(failure),
    ]
}

fn leaf_count(error: &Error) -> usize {
    error.children().map_or(1, <[Error]>::len)
}

proptest! {
    #[test]
    fn prop_exactly_one_track(r in any_result()) {
        prop_assert!(r.is_success() != r.is_failure());
        prop_assert_eq!(r.try_get_value().is_some(), r.is_success());
        prop_assert_eq!(r.try_get_error().is_some(), r.is_failure());
    }

    #[test]
    fn prop_failure_passes_success_steps_untouched(e in any_error()) {
        let out = failure::<i64>(e.clone())
            .bind(|v| success(v + 1))
            .map(|v| v * 2)
            .tap(|_| panic!("tap ran on a failure"))
            .ensure(|_| false, Error::domain("never"));
        prop_assert_eq!(out, Err(e));
    }

    #[test]
    fn prop_combine_succeeds_only_when_both_do(a in any_result(), b in any_result()) {
        let both = a.is_success() && b.is_success();
        prop_assert_eq!(combine(a, b).is_success(), both);
    }

    #[test]
    fn prop_single_failure_is_kept_verbatim(v in any::<i64>(), e in any_error()) {
        prop_assert_eq!(combine(success(v), failure::<i64>(e.clone())), Err(e.clone()));
        prop_assert_eq!(combine(failure::<i64>(e.clone()), success(v)), Err(e));
    }

    #[test]
    fn prop_non_validation_pairs_keep_every_leaf_in_order(
        a in any_error().prop_filter("not validation", |e| e.kind() != ErrorKind::Validation),
        b in any_error(),
    ) {
        let expected = leaf_count(&a) + leaf_count(&b);
        let merged = combine(failure::<i64>(a.clone()), failure::<i64>(b)).unwrap_err();
        prop_assert_eq!(merged.kind(), ErrorKind::Aggregate);
        let children = merged.children().unwrap_or_default();
        prop_assert_eq!(children.len(), expected);
        match a.children() {
            Some(first) => prop_assert_eq!(&children[..first.len()], first),
            None => prop_assert_eq!(&children[0], &a),
        }
    }

    #[test]
    fn prop_validation_merge_keeps_fields_first_seen(
        fields in prop::collection::vec("[a-c]", 2..8),
    ) {
        let results: Vec<Result<i64>> = fields
            .iter()
            .map(|f| failure(Error::validation_field(f.as_str(), format!("{f} invalid"))))
            .collect();
        let err = combine_iter(results).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Validation);

        let mut first_seen: Vec<&str> = Vec::new();
        for f in &fields {
            if !first_seen.contains(&f.as_str()) {
                first_seen.push(f);
            }
        }
        let merged: Vec<&str> = err
            .field_errors()
            .unwrap_or_default()
            .iter()
            .map(|fe| fe.field_name.as_str())
            .collect();
        prop_assert_eq!(merged, first_seen);
    }

    #[test]
    fn prop_interleaved_validation_collapses_to_one_child(
        picks in prop::collection::vec((any::<bool>(), "[a-c]"), 2..10),
    ) {
        let results: Vec<Result<i64>> = picks
            .iter()
            .map(|(is_field, f)| {
                if *is_field {
                    failure(Error::validation_field(f.as_str(), "invalid"))
                } else {
                    failure(Error::not_found(f.as_str()))
                }
            })
            .collect();
        let err = combine_iter(results).unwrap_err();
        let leaves: Vec<&Error> = match err.children() {
            Some(children) => children.iter().collect(),
            None => vec![&err],
        };
        let validations: Vec<&&Error> =
            leaves.iter().filter(|e| e.kind() == ErrorKind::Validation).collect();
        prop_assert!(validations.len() <= 1);

        let mut first_seen: Vec<&str> = Vec::new();
        for (is_field, f) in &picks {
            if *is_field && !first_seen.contains(&f.as_str()) {
                first_seen.push(f);
            }
        }
        let merged: Vec<&str> = validations
            .first()
            .and_then(|v| v.field_errors())
            .unwrap_or_default()
            .iter()
            .map(|fe| fe.field_name.as_str())
            .collect();
        prop_assert_eq!(merged, first_seen);

        let not_found = picks.iter().filter(|(is_field, _)| !is_field).count();
        prop_assert_eq!(leaves.len(), not_found + usize::from(validations.len() == 1));
    }
}
