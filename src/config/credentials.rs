use crate::{Error, Result};
use std::fmt;

pub const EMAIL_VAR: &str = "RELISH_EMAIL";
pub const PASSWORD_VAR: &str = "RELISH_PASSWORD";

/// Login identity for the Relish site.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Read `RELISH_EMAIL` and `RELISH_PASSWORD` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary variable lookup.
    ///
    /// Both values must be present and non-empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let email = lookup(EMAIL_VAR).filter(|v| !v.is_empty());
        let password = lookup(PASSWORD_VAR).filter(|v| !v.is_empty());

        match (email, password) {
            (Some(email), Some(password)) => Ok(Self { email, password }),
            (email, password) => {
                let missing: Vec<&str> = [
                    email.is_none().then_some(EMAIL_VAR),
                    password.is_none().then_some(PASSWORD_VAR),
                ]
                .into_iter()
                .flatten()
                .collect();
                Err(Error::MissingCredentials(missing.join(", ")))
            }
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
