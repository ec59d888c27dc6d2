//! The session and submission store
//!
//! Owns authentication state and the bounded contact-submission log, and is
//! the sole gatekeeper for role-restricted reads. Constructed explicitly and
//! shared behind a handle; there is no ambient global state.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::repository::Repository;
use crate::session::{DirectoryEntry, Role, Session, UserData, UserRecord};
use crate::submissions::{ContactForm, ContactSubmission, SubmissionLog};

/// Durable-storage key for the session's authenticated flag ("true"/absent)
pub const KEY_AUTHENTICATED: &str = "isAuthenticated";
/// Durable-storage key for the serialized session user
pub const KEY_USER: &str = "user";
/// Durable-storage key for the serialized submission log, newest first
pub const KEY_SUBMISSIONS: &str = "contactSubmissions";

/// Session and contact-submission store
pub struct Store {
    users: Vec<UserRecord>,
    session: Session,
    submissions: SubmissionLog,
    repository: Box<dyn Repository>,
    login_delay: Duration,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("users", &self.users.len())
            .field("session", &self.session)
            .field("submissions", &self.submissions.len())
            .finish()
    }
}

impl Store {
    /// Build a store from the static user table, restoring session and
    /// submission log from the repository. Absent or unparsable values fall
    /// back to an anonymous session / empty log with a warning; only the
    /// repository itself failing is an error.
    pub fn load(
        users: Vec<UserRecord>,
        repository: Box<dyn Repository>,
        max_submissions: usize,
        login_delay: Duration,
    ) -> Self {
        let session = restore_session(repository.as_ref());
        let submissions = restore_submissions(repository.as_ref(), max_submissions);

        tracing::debug!(
            "Store loaded: authenticated={}, submissions={}",
            session.authenticated,
            submissions.len()
        );

        Self {
            users,
            session,
            submissions,
            repository,
            login_delay,
        }
    }

    /// Authenticate against the static user table.
    ///
    /// On success the session becomes authenticated and is persisted; on
    /// failure the session is left untouched (anonymous stays anonymous).
    /// The check itself is instant; callers that want the simulated login
    /// latency apply [`Store::login_delay`] first, before locking the store.
    pub fn login(&mut self, email: &str, password: &str) -> Result<UserData> {
        let record = self
            .users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .ok_or(StoreError::InvalidCredentials)?;

        let user = record.user_data();
        self.session = Session::authenticated(user.clone());
        self.persist_session()?;
        tracing::info!("Login: {} ({})", user.email, user.role);
        Ok(user)
    }

    /// Configured simulated latency for login attempts
    pub fn login_delay(&self) -> Duration {
        self.login_delay
    }

    /// Clear the session in memory and in durable storage. Valid from any
    /// prior state.
    pub fn logout(&mut self) -> Result<()> {
        self.session = Session::anonymous();
        self.repository.remove(KEY_AUTHENTICATED)?;
        self.repository.remove(KEY_USER)?;
        tracing::info!("Logout");
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.session.has_role(role)
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    /// Snapshot of the static user directory. Admin only.
    pub fn all_users(&self) -> Result<Vec<DirectoryEntry>> {
        if !self.is_admin() {
            return Err(StoreError::Unauthorized);
        }
        Ok(self.users.iter().map(DirectoryEntry::from).collect())
    }

    /// Read-only copy of the submission log, most recent first. Admin only.
    pub fn all_contacts(&self) -> Result<Vec<ContactSubmission>> {
        if !self.is_admin() {
            return Err(StoreError::Unauthorized);
        }
        Ok(self.submissions.to_vec())
    }

    /// Record a contact-form submission. Open to any caller; this backs the
    /// public contact form. The log is persisted synchronously after the
    /// mutation.
    pub fn add_contact_submission(&mut self, form: ContactForm) -> Result<ContactSubmission> {
        form.validate()?;
        let submission = self.submissions.push(form, current_epoch_ms());
        self.persist_submissions()?;
        tracing::debug!(
            "Contact submission {} recorded ({} in log)",
            submission.id,
            self.submissions.len()
        );
        Ok(submission)
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.len()
    }

    fn persist_session(&mut self) -> Result<()> {
        match &self.session.user {
            Some(user) => {
                let serialized = serde_json::to_string(user)?;
                self.repository.set(KEY_AUTHENTICATED, "true")?;
                self.repository.set(KEY_USER, &serialized)?;
            }
            None => {
                self.repository.remove(KEY_AUTHENTICATED)?;
                self.repository.remove(KEY_USER)?;
            }
        }
        Ok(())
    }

    fn persist_submissions(&mut self) -> Result<()> {
        let serialized = serde_json::to_string(&self.submissions.to_vec())?;
        self.repository.set(KEY_SUBMISSIONS, &serialized)
    }
}

fn restore_session(repository: &dyn Repository) -> Session {
    if repository.get(KEY_AUTHENTICATED).as_deref() != Some("true") {
        return Session::anonymous();
    }
    match repository.get(KEY_USER) {
        Some(raw) => match serde_json::from_str::<UserData>(&raw) {
            Ok(user) => Session::authenticated(user),
            Err(e) => {
                tracing::warn!("Discarding unparsable persisted user: {}", e);
                Session::anonymous()
            }
        },
        None => Session::anonymous(),
    }
}

fn restore_submissions(repository: &dyn Repository, cap: usize) -> SubmissionLog {
    match repository.get(KEY_SUBMISSIONS) {
        Some(raw) => match serde_json::from_str::<Vec<ContactSubmission>>(&raw) {
            Ok(entries) => SubmissionLog::from_entries(entries, cap),
            Err(e) => {
                tracing::warn!("Discarding unparsable persisted submissions: {}", e);
                SubmissionLog::new(cap)
            }
        },
        None => SubmissionLog::new(cap),
    }
}

fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Thread-safe store handle shared between the dashboard and its callers
pub type StoreHandle = Arc<RwLock<Store>>;

pub fn new_store_handle(store: Store) -> StoreHandle {
    Arc::new(RwLock::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;

    fn test_users() -> Vec<UserRecord> {
        vec![
            UserRecord {
                email: "green01@ventosa.energia".to_string(),
                password: "password01".to_string(),
                role: Role::User,
                name: "Green Operator".to_string(),
            },
            UserRecord {
                email: "admin01@ventosa.energia".to_string(),
                password: "password02".to_string(),
                role: Role::Admin,
                name: "Site Admin".to_string(),
            },
        ]
    }

    fn test_store() -> Store {
        Store::load(
            test_users(),
            Box::new(MemoryRepository::default()),
            500,
            Duration::ZERO,
        )
    }

    fn contact_form(name: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: format!("{}@example.com", name),
            phone: "555-0100".to_string(),
            message: "Hello".to_string(),
        }
    }

    fn admin_store() -> Store {
        let mut store = test_store();
        store
            .login("admin01@ventosa.energia", "password02")
            .unwrap();
        store
    }

    #[test]
    fn login_with_valid_credentials_authenticates() {
        let mut store = test_store();
        let user = store
            .login("green01@ventosa.energia", "password01")
            .unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.name, "Green Operator");
        assert!(store.session().authenticated);
        assert!(store.has_role(Role::User));
        assert!(!store.is_admin());
    }

    #[test]
    fn login_with_wrong_password_leaves_session_anonymous() {
        let mut store = test_store();
        let err = store
            .login("green01@ventosa.energia", "wrong")
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));
        assert!(!store.session().authenticated);
        assert!(store.session().user.is_none());
    }

    #[test]
    fn login_with_unknown_email_fails() {
        let mut store = test_store();
        let err = store.login("nobody@ventosa.energia", "password01");
        assert!(matches!(err, Err(StoreError::InvalidCredentials)));
    }

    #[test]
    fn login_delay_reports_configured_value() {
        let store = Store::load(
            test_users(),
            Box::new(MemoryRepository::default()),
            500,
            Duration::from_millis(750),
        );
        assert_eq!(store.login_delay(), Duration::from_millis(750));
    }

    #[test]
    fn logout_clears_session_and_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let repo = crate::repository::JsonFileRepository::open(&path).unwrap();
        let mut store = Store::load(test_users(), Box::new(repo), 500, Duration::ZERO);
        store
            .login("admin01@ventosa.energia", "password02")
            .unwrap();
        store.logout().unwrap();

        assert_eq!(*store.session(), Session::anonymous());

        let reopened = crate::repository::JsonFileRepository::open(&path).unwrap();
        assert_eq!(reopened.get(KEY_AUTHENTICATED), None);
        assert_eq!(reopened.get(KEY_USER), None);
    }

    #[test]
    fn logout_from_anonymous_is_valid() {
        let mut store = test_store();
        assert!(store.logout().is_ok());
        assert!(!store.session().authenticated);
    }

    #[test]
    fn session_persists_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let repo = crate::repository::JsonFileRepository::open(&path).unwrap();
            let mut store = Store::load(test_users(), Box::new(repo), 500, Duration::ZERO);
            store
                .login("green01@ventosa.energia", "password01")
                .unwrap();
        }

        let repo = crate::repository::JsonFileRepository::open(&path).unwrap();
        let store = Store::load(test_users(), Box::new(repo), 500, Duration::ZERO);
        assert!(store.session().authenticated);
        assert_eq!(
            store.session().user.as_ref().unwrap().email,
            "green01@ventosa.energia"
        );
    }

    #[test]
    fn admin_reads_require_admin_role() {
        let mut store = test_store();
        assert!(matches!(store.all_users(), Err(StoreError::Unauthorized)));
        assert!(matches!(
            store.all_contacts(),
            Err(StoreError::Unauthorized)
        ));

        store
            .login("green01@ventosa.energia", "password01")
            .unwrap();
        assert!(matches!(store.all_users(), Err(StoreError::Unauthorized)));
        assert!(matches!(
            store.all_contacts(),
            Err(StoreError::Unauthorized)
        ));
    }

    #[test]
    fn admin_sees_directory_with_absent_audit_fields() {
        let store = admin_store();
        let users = store.all_users().unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u.last_login.is_none()
            && u.status.is_none()
            && u.created_at.is_none()));
    }

    #[test]
    fn contact_submission_is_open_to_anonymous_callers() {
        let mut store = test_store();
        let created = store.add_contact_submission(contact_form("alice")).unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.status, crate::submissions::SubmissionStatus::Unread);
        assert_eq!(store.submission_count(), 1);
    }

    #[test]
    fn invalid_contact_form_is_rejected_and_not_logged() {
        let mut store = test_store();
        let err = store
            .add_contact_submission(ContactForm::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.submission_count(), 0);
    }

    #[test]
    fn admin_reads_contacts_newest_first() {
        let mut store = admin_store();
        store.add_contact_submission(contact_form("first")).unwrap();
        store
            .add_contact_submission(contact_form("second"))
            .unwrap();

        let contacts = store.all_contacts().unwrap();
        assert_eq!(contacts[0].name, "second");
        assert_eq!(contacts[1].name, "first");
    }

    #[test]
    fn submissions_persist_across_reload_and_respect_cap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let repo = crate::repository::JsonFileRepository::open(&path).unwrap();
            let mut store = Store::load(test_users(), Box::new(repo), 3, Duration::ZERO);
            for i in 0..5 {
                store
                    .add_contact_submission(contact_form(&format!("n{}", i)))
                    .unwrap();
            }
            assert_eq!(store.submission_count(), 3);
        }

        let repo = crate::repository::JsonFileRepository::open(&path).unwrap();
        let mut store = Store::load(test_users(), Box::new(repo), 3, Duration::ZERO);
        assert_eq!(store.submission_count(), 3);

        // Ids keep increasing after a reload
        let next = store.add_contact_submission(contact_form("later")).unwrap();
        assert_eq!(next.id, 6);
    }

    #[test]
    fn corrupt_persisted_values_fall_back_to_empty() {
        let mut repo = MemoryRepository::default();
        repo.set(KEY_AUTHENTICATED, "true").unwrap();
        repo.set(KEY_USER, "{broken").unwrap();
        repo.set(KEY_SUBMISSIONS, "[broken").unwrap();

        let store = Store::load(test_users(), Box::new(repo), 500, Duration::ZERO);
        assert!(!store.session().authenticated);
        assert_eq!(store.submission_count(), 0);
    }
}
