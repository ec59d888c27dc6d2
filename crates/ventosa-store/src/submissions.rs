//! Contact-form submissions and the bounded, newest-first submission log

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Workflow status of a submission. Transitions exist in the model but no
/// operation currently drives them; every new submission starts `Unread`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Unread,
    Read,
    Responded,
}

/// Raw contact-form input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    /// Required-field checks only: all four fields must be non-blank. No
    /// format validation happens here.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(StoreError::Validation("Name is required".to_string()));
        }
        if self.email.trim().is_empty() {
            return Err(StoreError::Validation("Email is required".to_string()));
        }
        if self.phone.trim().is_empty() {
            return Err(StoreError::Validation("Phone is required".to_string()));
        }
        if self.message.trim().is_empty() {
            return Err(StoreError::Validation("Message is required".to_string()));
        }
        Ok(())
    }
}

/// A recorded contact-form submission. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub timestamp_epoch_ms: u64,
    pub status: SubmissionStatus,
}

/// Bounded submission log, newest first.
///
/// Ordering is insertion order at the head, not timestamp order; eviction
/// always drops the tail (oldest-inserted) entries once the cap is exceeded.
#[derive(Debug)]
pub struct SubmissionLog {
    entries: VecDeque<ContactSubmission>,
    cap: usize,
    next_id: u64,
}

impl SubmissionLog {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cap,
            next_id: 1,
        }
    }

    /// Rebuild a log from persisted entries (newest first). Entries beyond
    /// the cap are dropped from the tail.
    pub fn from_entries(entries: Vec<ContactSubmission>, cap: usize) -> Self {
        let next_id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let mut entries: VecDeque<_> = entries.into();
        entries.truncate(cap);
        Self {
            entries,
            cap,
            next_id,
        }
    }

    /// Record a validated form as a new submission at the head of the log,
    /// evicting the oldest entries past the cap.
    pub fn push(&mut self, form: ContactForm, now_ms: u64) -> ContactSubmission {
        let submission = ContactSubmission {
            id: self.next_id,
            name: form.name,
            email: form.email,
            phone: form.phone,
            message: form.message,
            timestamp_epoch_ms: now_ms,
            status: SubmissionStatus::Unread,
        };
        self.next_id += 1;
        self.entries.push_front(submission.clone());
        self.entries.truncate(self.cap);
        submission
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest-first copy of the log
    pub fn to_vec(&self) -> Vec<ContactSubmission> {
        self.entries.iter().cloned().collect()
    }

    pub fn head(&self) -> Option<&ContactSubmission> {
        self.entries.front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: format!("{}@example.com", name),
            phone: "555-0100".to_string(),
            message: "Interested in a site tour".to_string(),
        }
    }

    #[test]
    fn validate_accepts_complete_form() {
        assert!(form("alice").validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_required_fields() {
        let mut f = form("alice");
        f.name = String::new();
        assert!(matches!(f.validate(), Err(StoreError::Validation(_))));

        let mut f = form("alice");
        f.email = "   ".to_string();
        assert!(matches!(f.validate(), Err(StoreError::Validation(_))));

        let mut f = form("alice");
        f.message = String::new();
        assert!(matches!(f.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn validate_rejects_blank_phone() {
        let mut f = form("alice");
        f.phone = "   ".to_string();
        let err = f.validate().unwrap_err();
        assert!(err.to_string().contains("Phone is required"));
    }

    #[test]
    fn validate_does_not_format_check_email() {
        // Only presence is checked; a malformed address still passes.
        let mut f = form("alice");
        f.email = "not-an-email".to_string();
        assert!(f.validate().is_ok());
    }

    #[test]
    fn push_prepends_newest_first() {
        let mut log = SubmissionLog::new(10);
        log.push(form("first"), 1000);
        log.push(form("second"), 2000);
        assert_eq!(log.len(), 2);
        assert_eq!(log.head().unwrap().name, "second");
    }

    #[test]
    fn push_assigns_monotonic_ids_and_unread_status() {
        let mut log = SubmissionLog::new(10);
        let a = log.push(form("a"), 1000);
        let b = log.push(form("b"), 2000);
        assert!(b.id > a.id);
        assert_eq!(a.status, SubmissionStatus::Unread);
        assert_eq!(a.timestamp_epoch_ms, 1000);
    }

    #[test]
    fn length_never_exceeds_cap() {
        let mut log = SubmissionLog::new(3);
        for i in 0..10 {
            log.push(form(&format!("n{}", i)), i * 1000);
            assert!(log.len() <= 3);
            assert_eq!(log.len(), std::cmp::min((i + 1) as usize, 3));
            assert_eq!(log.head().unwrap().name, format!("n{}", i));
        }
    }

    #[test]
    fn overflow_evicts_oldest_entry() {
        let mut log = SubmissionLog::new(3);
        for i in 0..4 {
            log.push(form(&format!("n{}", i)), i * 1000);
        }
        let names: Vec<_> = log.to_vec().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["n3", "n2", "n1"]);
        assert!(!names.contains(&"n0".to_string()));
    }

    #[test]
    fn eviction_follows_insertion_order_not_timestamps() {
        // Skewed clocks: the second insert carries an older timestamp, but
        // eviction still removes the first-inserted entry.
        let mut log = SubmissionLog::new(2);
        log.push(form("inserted-first"), 9000);
        log.push(form("inserted-second"), 1000);
        log.push(form("inserted-third"), 5000);
        let names: Vec<_> = log.to_vec().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["inserted-third", "inserted-second"]);
    }

    #[test]
    fn from_entries_restores_id_counter() {
        let mut log = SubmissionLog::new(10);
        log.push(form("a"), 1000);
        log.push(form("b"), 2000);
        let mut restored = SubmissionLog::from_entries(log.to_vec(), 10);
        let c = restored.push(form("c"), 3000);
        assert_eq!(c.id, 3);
        assert_eq!(restored.len(), 3);
    }

    #[test]
    fn from_entries_truncates_past_cap() {
        let mut log = SubmissionLog::new(10);
        for i in 0..5 {
            log.push(form(&format!("n{}", i)), i * 1000);
        }
        let restored = SubmissionLog::from_entries(log.to_vec(), 2);
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.head().unwrap().name, "n4");
    }

    #[test]
    fn submission_round_trips_through_json() {
        let mut log = SubmissionLog::new(10);
        let created = log.push(form("alice"), 1234);
        let json = serde_json::to_string(&created).unwrap();
        let parsed: ContactSubmission = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, created);
        assert!(json.contains(r#""status":"unread""#));
    }
}
