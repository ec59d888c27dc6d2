//! Session state and the static user directory

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role assigned to a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// The user data held by an authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub email: String,
    pub role: Role,
    pub name: String,
}

/// A static credential-table entry. Fixture configuration, never mutated at
/// runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub name: String,
}

impl UserRecord {
    pub fn user_data(&self) -> UserData {
        UserData {
            email: self.email.clone(),
            role: self.role,
            name: self.name.clone(),
        }
    }
}

/// Admin-view projection of a user record.
///
/// `last_login`, `status` and `created_at` are rendered by the admin view but
/// never recorded anywhere, so they stay `None` rather than getting invented
/// values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub last_login: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
}

impl From<&UserRecord> for DirectoryEntry {
    fn from(record: &UserRecord) -> Self {
        Self {
            email: record.email.clone(),
            name: record.name.clone(),
            role: record.role,
            last_login: None,
            status: None,
            created_at: None,
        }
    }
}

/// Authentication state of the active session.
///
/// Invariant: `authenticated == user.is_some()`. The only transitions are
/// anonymous -> authenticated via a successful login and authenticated ->
/// anonymous via logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub authenticated: bool,
    pub user: Option<UserData>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            user: None,
        }
    }

    pub fn authenticated(user: UserData) -> Self {
        Self {
            authenticated: true,
            user: Some(user),
        }
    }

    /// True when the session holds the given role. Anonymous sessions hold no
    /// role at all, so this is false rather than an error.
    pub fn has_role(&self, role: Role) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_user() -> UserData {
        UserData {
            email: "admin01@ventosa.energia".to_string(),
            role: Role::Admin,
            name: "Site Admin".to_string(),
        }
    }

    #[test]
    fn anonymous_session_holds_no_role() {
        let session = Session::anonymous();
        assert!(!session.authenticated);
        assert!(!session.has_role(Role::User));
        assert!(!session.has_role(Role::Admin));
        assert!(!session.is_admin());
    }

    #[test]
    fn authenticated_session_upholds_invariant() {
        let session = Session::authenticated(admin_user());
        assert_eq!(session.authenticated, session.user.is_some());
        assert!(session.is_admin());
        assert!(!session.has_role(Role::User));
    }

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
    }

    #[test]
    fn directory_entry_leaves_unrecorded_fields_empty() {
        let record = UserRecord {
            email: "green01@ventosa.energia".to_string(),
            password: "password01".to_string(),
            role: Role::User,
            name: "Green Operator".to_string(),
        };
        let entry = DirectoryEntry::from(&record);
        assert_eq!(entry.email, record.email);
        assert!(entry.last_login.is_none());
        assert!(entry.status.is_none());
        assert!(entry.created_at.is_none());
    }
}
