//! Account signup pipeline.
//!
//! validate (all fields, merged) -> directory checks (parallel, cancellable)
//! -> create account.

use railway_async::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const MAX_NAME_LEN: usize = 64;
const MAX_AGE: u8 = 130;

/// Raw, unvalidated signup form.
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub email: String,
    pub name: String,
    pub age: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signup {
    pub email: String,
    pub name: String,
    pub age: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: u64,
    pub email: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_ascii_lowercase();
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    };
    success_if(well_formed, email, Error::validation_field("email", "bad email"))
}

pub fn validate_name(raw: &str) -> Result<String> {
    success(raw.trim().to_string())
        .ensure(|n| !n.is_empty(), Error::validation_field("name", "required"))
        .ensure_with(
            |n| n.chars().count() <= MAX_NAME_LEN,
            |n| {
                Error::validation_field(
                    "name",
                    format!("{} characters, at most {MAX_NAME_LEN} allowed", n.chars().count()),
                )
            },
        )
}

pub fn validate_age(age: u8) -> Result<u8> {
    success(age)
        .ensure(|a| *a >= 18, Error::validation_field("age", "must be 18 or older"))
        .ensure(|a| *a <= MAX_AGE, Error::validation_field("age", "implausible age"))
}

/// Checks every field, reporting all failures together.
pub fn validate(form: &SignupForm) -> Result<Signup> {
    combine(validate_email(&form.email), validate_name(&form.name))
        .combine(validate_age(form.age))
        .map_n(|email, name, age| Signup { email, name, age })
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// In-memory stand-in for the account directory, with simulated latency.
#[derive(Debug)]
pub struct Directory {
    taken_emails: Vec<String>,
    reserved_names: Vec<String>,
    latency: Duration,
    next_id: AtomicU64,
}

impl Directory {
    pub fn new(latency: Duration) -> Self {
        Self {
            taken_emails: vec!["admin@example.com".to_string()],
            reserved_names: vec!["root".to_string(), "admin".to_string()],
            latency,
            next_id: AtomicU64::new(1),
        }
    }

    async fn check_email(&self, email: String) -> Result<String> {
        tokio::time::sleep(self.latency).await;
        let taken = self.taken_emails.contains(&email);
        let instance = format!("/accounts/{email}");
        failure_if(
            taken,
            email,
            Error::conflict("email is already registered").with_instance(instance),
        )
    }

    async fn check_name(&self, name: String) -> Result<String> {
        tokio::time::sleep(self.latency).await;
        let reserved = self.reserved_names.iter().any(|r| r.eq_ignore_ascii_case(&name));
        failure_if(
            reserved,
            name,
            Error::domain("name is reserved").with_code("name.reserved"),
        )
    }

    fn create(&self, signup: Signup) -> Account {
        Account {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            email: signup.email,
            name: signup.name,
        }
    }

    /// Runs the whole pipeline. Directory checks run concurrently and stop
    /// early once `token` is cancelled.
    pub async fn register(&self, form: &SignupForm, token: &CancellationToken) -> Result<Account> {
        validate(form)
            .tap(|s| tracing::debug!(email = %s.email, "signup passed validation"))
            .bind_cancellable(token, |signup, token| async move {
                let email = signup.email.clone();
                let name = signup.name.clone();
                (
                    move || self.check_email(email),
                    move || self.check_name(name),
                )
                    .parallel_cancellable(&token)
                    .await
                    .map(|_| signup)
            })
            .map(|signup| self.create(signup))
            .tap(|account| {
                tracing::info!(id = account.id, email = %account.email, "account registered")
            })
            .tap_on_failure(|e| {
                tracing::info!(kind = %e.kind(), code = e.code(), "signup rejected")
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str, name: &str, age: u8) -> SignupForm {
        SignupForm {
            email: email.to_string(),
            name: name.to_string(),
            age,
        }
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(validate_email("  Ada@Example.COM "), Ok("ada@example.com".to_string()));
        assert!(validate_email("ada@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }

    #[test]
    fn name_rules() {
        assert_eq!(validate_name(" Ada "), Ok("Ada".to_string()));
        let err = validate_name(&"x".repeat(65)).unwrap_err();
        assert!(err.detail().starts_with("65 characters"));
    }

    #[test]
    fn every_invalid_field_is_reported() {
        let err = validate(&form("nope", " ", 9)).unwrap_err();
        let fields: Vec<_> = err
            .field_errors()
            .unwrap()
            .iter()
            .map(|fe| (fe.field_name.as_str(), fe.details[0].as_str()))
            .collect();
        assert_eq!(
            fields,
            [
                ("email", "bad email"),
                ("name", "required"),
                ("age", "must be 18 or older"),
            ]
        );
    }

    #[tokio::test]
    async fn registers_valid_signup() {
        let dir = Directory::new(Duration::from_millis(1));
        let account = dir
            .register(&form("ada@example.com", "Ada", 36), &CancellationToken::new())
            .await;
        assert_eq!(
            account,
            Ok(Account {
                id: 1,
                email: "ada@example.com".to_string(),
                name: "Ada".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn directory_conflicts_are_aggregated() {
        let dir = Directory::new(Duration::from_millis(1));
        let err = dir
            .register(&form("admin@example.com", "Root", 40), &CancellationToken::new())
            .await
            .unwrap_err();
        let kinds: Vec<_> = err.children().unwrap().iter().map(Error::kind).collect();
        assert_eq!(kinds, [ErrorKind::Conflict, ErrorKind::Domain]);
        assert_eq!(err.children().unwrap()[0].instance(), Some("/accounts/admin@example.com"));
    }

    #[tokio::test]
    async fn cancelled_before_checks() {
        let dir = Directory::new(Duration::from_millis(1));
        let token = CancellationToken::new();
        token.cancel();
        let err = dir
            .register(&form("ada@example.com", "Ada", 36), &token)
            .await
            .unwrap_err();
        assert!(err.is_cancellation());
    }
}
