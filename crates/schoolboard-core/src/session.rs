//! The authenticated session passed explicitly to every API call.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::model::UserProfile;

/// Access token plus the cached profile of the logged-in user.
///
/// Note: Custom Debug impl masks the token to prevent accidental exposure in logs.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub user: UserProfile,
    /// `None` when the backend did not say; such sessions are used until a
    /// request comes back 401.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"***")
            .field("user", &self.user)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Session {
    pub fn new(
        access_token: impl Into<String>,
        user: UserProfile,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            user,
            expires_at,
        }
    }

    /// Build a session from a login response's relative `expiresIn` seconds.
    pub fn from_login(
        access_token: impl Into<String>,
        user: UserProfile,
        expires_in_secs: Option<i64>,
        now: DateTime<Utc>,
    ) -> Self {
        let expires_at = expires_in_secs
            .filter(|secs| *secs > 0)
            .map(|secs| now + Duration::seconds(secs));
        Self::new(access_token, user, expires_at)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// The token to send, or `SessionExpired` if it is past its expiry.
    pub fn bearer_token(&self) -> Result<&str, ApiError> {
        if self.is_expired() {
            return Err(ApiError::SessionExpired);
        }
        Ok(&self.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserProfile {
        UserProfile {
            id: "u1".into(),
            name: "Admin".into(),
            email: "admin@school.test".into(),
            role: "admin".into(),
            school_id: None,
        }
    }

    #[test]
    fn expiry_from_relative_seconds() {
        let now = Utc::now();
        let session = Session::from_login("t", user(), Some(3600), now);
        assert!(!session.is_expired_at(now));
        assert!(session.is_expired_at(now + Duration::seconds(3600)));

        let open_ended = Session::from_login("t", user(), None, now);
        assert!(!open_ended.is_expired_at(now + Duration::days(365)));
    }

    #[test]
    fn expired_session_refuses_token() {
        let session = Session::new("t", user(), Some(Utc::now() - Duration::seconds(1)));
        assert!(matches!(session.bearer_token(), Err(ApiError::SessionExpired)));

        let live = Session::new("t", user(), None);
        assert_eq!(live.bearer_token().unwrap(), "t");
    }

    #[test]
    fn debug_masks_token() {
        let session = Session::new("secret-token", user(), None);
        let dbg = format!("{session:?}");
        assert!(!dbg.contains("secret-token"));
        assert!(dbg.contains("***"));
    }
}
