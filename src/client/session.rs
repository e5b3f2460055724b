use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::TryRecvError};

use super::app::Route;
use super::error::ClientError;
use super::http::{ApiClient, Unauthorized};
use super::storage::{self, keys};
use crate::types::{email_local_part, Preferences, UserProfile};

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please sign in again.";
pub const PROFILE_UNAVAILABLE_MESSAGE: &str = "Could not load your profile. Please sign in again.";

/// Signed-in user as the client sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub preferences: Preferences,
}

impl From<UserProfile> for SessionUser {
    fn from(profile: UserProfile) -> Self {
        let id = match profile.id {
            Some(id) => id.to_string(),
            None => email_local_part(&profile.email).to_string(),
        };
        Self {
            id,
            name: profile.name,
            email: profile.email,
            preferences: profile.preferences,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub success: bool,
    pub message: Option<String>,
    /// Where the user was when their previous session expired
    pub redirect_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SignedIn(SessionUser),
    SignedOut,
    Expired { path: String, message: String },
}

/// Owns the token lifecycle and the in-memory view of the signed-in user
pub struct SessionManager {
    api: ApiClient,
    user: Option<SessionUser>,
    error: Option<String>,
    pending_redirect: Option<String>,
    loading: bool,
    unauthorized: broadcast::Receiver<Unauthorized>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    pub fn new(api: ApiClient) -> Self {
        let unauthorized = api.subscribe_unauthorized();
        let (events, _) = broadcast::channel(16);
        let pending_redirect = api.storage().get(keys::AUTH_REDIRECT);

        Self {
            api,
            user: None,
            error: None,
            pending_redirect,
            loading: false,
            unauthorized,
            events,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn pending_redirect(&self) -> Option<&str> {
        self.pending_redirect.as_deref()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Exchange credentials for a token. Never fails; the outcome says how it went.
    pub async fn login(&mut self, email: &str, password: &str) -> LoginOutcome {
        self.process_events();

        self.loading = true;
        let result = self.api.login(email, password).await;
        self.loading = false;

        match result {
            Ok(response) => {
                let user = SessionUser::from(response.user);

                if let Err(e) = self.api.storage().set(keys::TOKEN, &response.access_token) {
                    tracing::warn!("Failed to persist token: {}", e);
                }
                self.persist_user(&user);

                self.user = Some(user.clone());
                self.error = None;
                let redirect_path = self.take_redirect();

                tracing::info!("Signed in as {}", user.email);
                self.emit(SessionEvent::SignedIn(user));

                LoginOutcome {
                    success: true,
                    message: None,
                    redirect_path,
                }
            }
            Err(err) => {
                let message = login_failure_message(&err);
                tracing::warn!("Login failed: {}", err);
                self.error = Some(message.clone());

                LoginOutcome {
                    success: false,
                    message: Some(message),
                    redirect_path: None,
                }
            }
        }
    }

    pub fn logout(&mut self) {
        let storage = self.api.storage();
        for key in [keys::TOKEN, keys::USER_DATA] {
            if let Err(e) = storage.remove(key) {
                tracing::warn!("Failed to clear '{}': {}", key, e);
            }
        }

        self.user = None;
        self.loading = false;
        self.emit(SessionEvent::SignedOut);
    }

    /// Startup check: confirm a stored token against `/profile`
    pub async fn restore(&mut self) {
        if self.api.storage().get(keys::TOKEN).is_none() {
            return;
        }

        self.loading = true;
        let result = self.api.fetch_profile().await;
        self.loading = false;

        match result {
            Ok(profile) => {
                let user = SessionUser::from(profile);
                self.persist_user(&user);
                self.user = Some(user);
            }
            Err(err) => {
                tracing::info!("Stored session rejected: {}", err);
                // A 401 already raised an event; take its redirect path first
                self.process_events();

                if let Err(e) = self.api.storage().remove(keys::TOKEN) {
                    tracing::warn!("Failed to clear stored token: {}", e);
                }
                self.user = None;
                self.error = Some(if err.is_unauthorized() {
                    SESSION_EXPIRED_MESSAGE.to_string()
                } else {
                    PROFILE_UNAVAILABLE_MESSAGE.to_string()
                });
            }
        }
    }

    /// Apply every pending unauthorized event. Returns how many were handled.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.unauthorized.try_recv() {
                Ok(event) => {
                    self.expire(event);
                    handled += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Skipped {} unauthorized events", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        handled
    }

    /// Remember where to go after the next login
    pub fn stash_redirect(&mut self, path: &str) {
        if let Err(e) = self.api.storage().set(keys::AUTH_REDIRECT, path) {
            tracing::warn!("Failed to persist redirect path: {}", e);
        }
        self.pending_redirect = Some(path.to_string());
    }

    /// Replace the cached user after a profile edit
    pub fn refresh_user(&mut self, profile: UserProfile) {
        let user = SessionUser::from(profile);
        self.persist_user(&user);
        self.user = Some(user);
    }

    fn expire(&mut self, event: Unauthorized) {
        // The login screen itself is never a place to come back to
        if !event.path.is_empty() && Route::parse(&event.path) != Some(Route::Login) {
            self.stash_redirect(&event.path);
        }
        self.user = None;
        self.loading = false;
        self.error = Some(event.message.clone());

        self.emit(SessionEvent::Expired {
            path: event.path,
            message: event.message,
        });
    }

    fn take_redirect(&mut self) -> Option<String> {
        let pending = self.pending_redirect.take();
        let stored = self.api.storage().get(keys::AUTH_REDIRECT);
        if stored.is_some() {
            if let Err(e) = self.api.storage().remove(keys::AUTH_REDIRECT) {
                tracing::warn!("Failed to clear redirect path: {}", e);
            }
        }
        stored.or(pending).filter(|p| !p.is_empty())
    }

    fn persist_user(&self, user: &SessionUser) {
        if let Err(e) = storage::set_json(self.api.storage().as_ref(), keys::USER_DATA, user) {
            tracing::warn!("Failed to persist user data: {}", e);
        }
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }
}

/// Map a failed `/login` call to the message shown on the login form
pub fn login_failure_message(err: &ClientError) -> String {
    match err.status().map(|s| s.as_u16()) {
        Some(400) => "Incorrect email or password".to_string(),
        Some(401) => "Not authorized. Check your credentials.".to_string(),
        Some(_) => err.server_message().unwrap_or("Login failed").to_string(),
        None if err.is_unreachable() => {
            "Could not reach the server. Check that it is running.".to_string()
        }
        None => "Login failed".to_string(),
    }
}
