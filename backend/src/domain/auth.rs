//! Authentication primitives: login credentials and registration payloads.
//!
//! Inbound payload parsing stays outside the domain; these constructors
//! validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::user::{EmailAddress, UserValidationError, Username};

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 6;
/// Maximum accepted password length.
pub const PASSWORD_MAX: usize = 100;

/// Validation errors for authentication payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// A username or email failed its own validation.
    User(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Password shorter than [`PASSWORD_MIN`].
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// Password longer than [`PASSWORD_MAX`].
    PasswordTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(inner) => inner.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for AuthValidationError {}

impl From<UserValidationError> for AuthValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::User(value)
    }
}

fn validate_password(password: &str) -> Result<(), AuthValidationError> {
    if password.is_empty() {
        return Err(AuthValidationError::EmptyPassword);
    }
    let length = password.chars().count();
    if length < PASSWORD_MIN {
        return Err(AuthValidationError::PasswordTooShort { min: PASSWORD_MIN });
    }
    if length > PASSWORD_MAX {
        return Err(AuthValidationError::PasswordTooLong { max: PASSWORD_MAX });
    }
    Ok(())
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised by [`EmailAddress`];
/// - `password` is non-empty and keeps caller-provided whitespace to avoid
///   surprising credential comparisons. Held in zeroizing storage.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised login key.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password exactly as provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload.
///
/// ## Invariants
/// - `username` and `email` satisfy their value-type rules;
/// - `password` is between [`PASSWORD_MIN`] and [`PASSWORD_MAX`] characters
///   and held in zeroizing storage until hashed.
#[derive(Debug, Clone)]
pub struct Registration {
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, AuthValidationError> {
        let username = Username::new(username)?;
        let email = EmailAddress::new(email)?;
        validate_password(password)?;
        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Requested login key.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Raw password awaiting hashing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("not-an-email", "secret1")]
    #[case("", "secret1")]
    fn login_rejects_invalid_email(#[case] email: &str, #[case] password: &str) {
        let err = LoginCredentials::try_from_parts(email, password).expect_err("must fail");
        assert!(matches!(err, AuthValidationError::User(_)));
    }

    #[test]
    fn login_rejects_empty_password() {
        let err = LoginCredentials::try_from_parts("ada@example.com", "").expect_err("must fail");
        assert_eq!(err, AuthValidationError::EmptyPassword);
    }

    #[test]
    fn login_preserves_password_whitespace() {
        let creds = LoginCredentials::try_from_parts("Ada@Example.com", " spaced pass ")
            .expect("valid credentials");
        assert_eq!(creds.email().as_ref(), "ada@example.com");
        assert_eq!(creds.password(), " spaced pass ");
    }

    #[rstest]
    #[case("short", AuthValidationError::PasswordTooShort { min: PASSWORD_MIN })]
    #[case("", AuthValidationError::EmptyPassword)]
    fn registration_enforces_password_length(
        #[case] password: &str,
        #[case] expected: AuthValidationError,
    ) {
        let err = Registration::try_from_parts("ada", "ada@example.com", password)
            .expect_err("must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn registration_rejects_overlong_password() {
        let password = "x".repeat(PASSWORD_MAX + 1);
        let err = Registration::try_from_parts("ada", "ada@example.com", &password)
            .expect_err("must fail");
        assert_eq!(
            err,
            AuthValidationError::PasswordTooLong { max: PASSWORD_MAX }
        );
    }

    #[test]
    fn registration_normalises_identity_fields() {
        let reg = Registration::try_from_parts("  ada  lovelace ", " Ada@Example.COM ", "secret1")
            .expect("valid registration");
        assert_eq!(reg.username().as_ref(), "ada lovelace");
        assert_eq!(reg.email().as_ref(), "ada@example.com");
    }
}
