//! The client-held authentication state.

use cms_api::response::AuthenticatedUser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub user_name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    /// Splits the authentication response into the user and their token.
    pub fn from_authenticated(authenticated: AuthenticatedUser) -> (Self, String) {
        let AuthenticatedUser {
            id,
            user_name,
            email,
            roles,
            jw_token,
        } = authenticated;
        let user = Self {
            id,
            email,
            user_name,
            roles,
        };
        (user, jw_token)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Identity {
    user: User,
    token: String,
}

/// The user and their token are either both present or both absent,
/// and the session is authenticated exactly when they are present.
///
/// Serialized as `{"user": …, "token": …, "isAuthenticated": …}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SessionRepr", into = "SessionRepr")]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    /// An empty token does not authenticate anyone.
    pub fn authenticated(user: User, token: String) -> Self {
        if token.is_empty() {
            tracing::warn!("Refusing to authenticate {} with an empty token", user.email);
            return Self::anonymous();
        }
        Self {
            identity: Some(Identity { user, token }),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.identity.as_ref().map(|identity| &identity.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.identity
            .as_ref()
            .map(|identity| identity.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRepr {
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    is_authenticated: bool,
}

impl From<SessionRepr> for Session {
    fn from(repr: SessionRepr) -> Self {
        match repr {
            SessionRepr {
                user: Some(user),
                token: Some(token),
                is_authenticated: true,
            } => Session::authenticated(user, token),
            _ => Session::anonymous(),
        }
    }
}

impl From<Session> for SessionRepr {
    fn from(session: Session) -> Self {
        match session.identity {
            Some(Identity { user, token }) => Self {
                user: Some(user),
                token: Some(token),
                is_authenticated: true,
            },
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn user() -> User {
        User {
            id: "u1".into(),
            email: "admin@example.com".into(),
            user_name: "admin".into(),
            roles: vec!["Admin".into()],
        }
    }

    #[test]
    fn authenticated_iff_user_and_token() {
        let anonymous = Session::anonymous();
        assert!(!anonymous.is_authenticated());
        assert!(anonymous.user().is_none() && anonymous.token().is_none());

        let session = Session::authenticated(user(), "t0k".into());
        assert!(session.is_authenticated());
        assert!(session.user().is_some() && session.token().is_some());

        let empty_token = Session::authenticated(user(), String::new());
        assert!(!empty_token.is_authenticated());
        assert!(empty_token.user().is_none());
    }

    #[test]
    fn inconsistent_blobs_become_anonymous() {
        let shapes = [
            json!({"user": null, "token": "t0k", "isAuthenticated": true}),
            json!({"user": user(), "token": null, "isAuthenticated": true}),
            json!({"user": user(), "token": "t0k", "isAuthenticated": false}),
            json!({"user": user(), "token": "", "isAuthenticated": true}),
            json!({}),
        ];
        for shape in shapes {
            let session: Session = serde_json::from_value(shape.clone()).unwrap();
            assert!(!session.is_authenticated(), "{shape}");
            assert_eq!(session.user().is_some(), session.is_authenticated());
            assert_eq!(session.token().is_some(), session.is_authenticated());
        }
    }

    #[test]
    fn serializes_all_three_fields() {
        let session = Session::authenticated(user(), "t0k".into());
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["token"], "t0k");
        assert_eq!(json["isAuthenticated"], true);
        assert_eq!(json["user"]["userName"], "admin");

        let json = serde_json::to_value(Session::anonymous()).unwrap();
        assert_eq!(
            json,
            json!({"user": null, "token": null, "isAuthenticated": false})
        );
    }
}
