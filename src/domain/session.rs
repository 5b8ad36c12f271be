//! Explicit per-application session context.
//!
//! A [`Session`] is created when the application starts, filled in when the
//! identity provider reports a signed-in user and emptied on sign-out. It is
//! handed to every consumer that needs the current user, token or theme.

use std::fmt::{Debug, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::types::{NonEmptyString, TypeConstraintError};
use crate::domain::user::{Role, User};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Bearer token issued by the backend for the signed-in user.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        Ok(Self(NonEmptyString::new(value)?.into_inner()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for AuthToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    signed_in: Option<(User, AuthToken)>,
    theme: Theme,
}

impl Session {
    /// Anonymous session, as it exists before the identity provider answers.
    pub fn anonymous(theme: Theme) -> Self {
        Self {
            signed_in: None,
            theme,
        }
    }

    pub fn sign_in(&mut self, user: User, token: AuthToken) {
        log::info!("Signed in as {}", user.email);
        self.signed_in = Some((user, token));
    }

    /// Drops the user and token. The theme survives sign-out.
    pub fn sign_out(&mut self) {
        if let Some((user, _)) = self.signed_in.take() {
            log::info!("Signed out {}", user.email);
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.signed_in.as_ref().map(|(user, _)| user)
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.signed_in.as_ref().map(|(_, token)| token)
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|user| user.role)
    }

    pub fn is_signed_in(&self) -> bool {
        self.signed_in.is_some()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }
}
