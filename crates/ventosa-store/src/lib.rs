//! Session and contact-submission store for the Ventosa site services
//!
//! Holds the authentication session and a bounded, newest-first log of
//! contact-form submissions, both mirrored into a key-value repository so
//! they survive restarts.

pub mod error;
pub mod repository;
pub mod session;
pub mod store;
pub mod submissions;

pub use error::{Result, StoreError};
pub use repository::{JsonFileRepository, MemoryRepository, Repository};
pub use session::{DirectoryEntry, Role, Session, UserData, UserRecord};
pub use store::{new_store_handle, Store, StoreHandle};
pub use submissions::{ContactForm, ContactSubmission, SubmissionStatus};
