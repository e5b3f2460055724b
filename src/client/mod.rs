//! Client side of recordkeeper: session handling, the HTTP wrapper, and the
//! screen state machines that a front end (the `rk` CLI) drives.
//!
//! The pieces fit together like this:
//!
//! - [`storage::KeyValueStore`] persists the session between runs.
//! - [`http::ApiClient`] attaches the bearer token to every request and, on a
//!   401, drops the token and broadcasts an [`http::Unauthorized`] event.
//! - [`session::SessionManager`] owns the token lifecycle and listens for
//!   those events.
//! - [`app::App`] owns the session, guards navigation, and hands out screens.

pub mod app;
pub mod error;
pub mod http;
pub mod notify;
pub mod screens;
pub mod session;
pub mod storage;
pub mod theme;
pub mod validation;

pub use app::{App, Route};
pub use error::ClientError;
pub use http::{ApiClient, Unauthorized};
pub use notify::{Notification, NotificationCenter, NotificationKind, Notifier, TerminalNotifier};
pub use session::{LoginOutcome, SessionEvent, SessionManager, SessionUser};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
