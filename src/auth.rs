use log::{info, warn};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
}

/// Checks a username and password pair.
pub trait Authenticator {
    fn verify(&self, username: &str, password: &str) -> Result<(), AuthError>;
}

/// Single configured account. Good enough for a kiosk-style game; there is
/// no hashing or persistence.
#[derive(Clone, Debug)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Authenticator for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if username.trim() == self.username && password == self.password {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Tracks whether someone is signed in. Home and game screens are only
/// reachable through an open gate.
pub struct SessionGate<A: Authenticator> {
    auth: A,
    user: Option<String>,
}

impl<A: Authenticator> SessionGate<A> {
    pub fn new(auth: A) -> Self {
        Self { auth, user: None }
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        match self.auth.verify(username, password) {
            Ok(()) => {
                info!("User '{}' signed in", username.trim());
                self.user = Some(username.trim().to_string());
                Ok(())
            }
            Err(err) => {
                warn!("Failed sign-in attempt for '{}'", username.trim());
                Err(err)
            }
        }
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!("User '{user}' signed out");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}
