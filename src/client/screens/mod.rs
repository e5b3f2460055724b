//! Screen state machines. Each holds the form or list state for one route and
//! talks to the API through a shared [`ApiClient`](super::ApiClient).

mod editor;
mod list;
mod login;
mod profile;

pub use editor::{EditorMode, RecordEditor};
pub use list::{DeleteOutcome, ListScreen};
pub use login::LoginScreen;
pub use profile::ProfileScreen;

use async_trait::async_trait;

/// Asks the user to confirm a destructive action
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything, for `--yes`
pub struct AlwaysConfirm;

#[async_trait]
impl Confirm for AlwaysConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
