//! Session gate: the single administrator login.

use std::fmt;

use subtle::ConstantTimeEq;

/// Shown on the login screen after a rejected attempt.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials. Please try again.";

#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields are always compared, each in constant time.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = ct_str_eq(username, &self.username);
        let pass_ok = ct_str_eq(password, &self.password);
        user_ok & pass_ok
    }
}

fn ct_str_eq(given: &str, expected: &str) -> bool {
    let given = given.as_bytes();
    let expected = expected.as_bytes();
    given.len() == expected.len() && given.ct_eq(expected).unwrap_u8() == 1
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
