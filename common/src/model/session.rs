use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The part of a session record that may leave the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Body of `GET /api/auth/provider/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub signed_in: bool,
    pub user: Option<UserView>,
}

impl AuthStatus {
    pub fn signed_out() -> Self {
        Self {
            signed_in: false,
            user: None,
        }
    }

    pub fn signed_in(user: UserView) -> Self {
        Self {
            signed_in: true,
            user: Some(user),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Not signed in")]
pub struct NotSignedIn;

/// Client-side copy of the authentication state, re-derived from the status
/// endpoint on load. Operations needing a session check it first so they fail
/// without touching the network.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    signed_in: bool,
    user: Option<UserView>,
}

impl SessionState {
    pub fn from_status(status: AuthStatus) -> Self {
        // A positive flag without a profile is treated as signed out.
        match status.user {
            Some(user) if status.signed_in => Self {
                signed_in: true,
                user: Some(user),
            },
            _ => Self::default(),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.signed_in
    }

    pub fn user(&self) -> Option<&UserView> {
        self.user.as_ref()
    }

    pub fn require_signed_in(&self) -> Result<&UserView, NotSignedIn> {
        match (&self.user, self.signed_in) {
            (Some(user), true) => Ok(user),
            _ => Err(NotSignedIn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserView {
        UserView {
            id: "u1".to_string(),
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            picture: None,
        }
    }

    #[test]
    fn signed_out_state_fails_fast() {
        let state = SessionState::from_status(AuthStatus::signed_out());
        assert_eq!(state.require_signed_in(), Err(NotSignedIn));
        assert_eq!(NotSignedIn.to_string(), "Not signed in");
    }

    #[test]
    fn signed_in_state_exposes_profile() {
        let state = SessionState::from_status(AuthStatus::signed_in(user()));
        assert_eq!(state.require_signed_in().unwrap().email, "ana@example.com");
    }

    #[test]
    fn status_serializes_null_user_when_signed_out() {
        let json = serde_json::to_value(AuthStatus::signed_out()).unwrap();
        assert_eq!(json, serde_json::json!({ "signedIn": false, "user": null }));
    }
}
