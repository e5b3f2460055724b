pub mod models;
pub mod query;
pub mod store;

pub use models::user::User;
pub use query::{RecordPage, RecordQuery};
pub use store::{Document, JsonStore};

/// Errors raised by the JSON document store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record {0} not found")]
    RecordNotFound(u64),
    #[error("User {0} not found")]
    UserNotFound(u64),
    #[error("Missing required fields: {0:?}")]
    MissingFields(Vec<&'static str>),
    #[error("Invalid input: {0}")]
    Invalid(String),
    #[error("Stored document is unreadable: {0}")]
    Corrupt(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Password hashing error: {0}")]
    Hash(String),
}
