use crate::client::app::Route;
use crate::client::session::SessionManager;
use crate::client::validation::{validate_login, FieldErrors};

#[derive(Debug, Default)]
pub struct LoginScreen {
    pub email: String,
    pub password: String,
    field_errors: FieldErrors,
    message: Option<String>,
    submitting: bool,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    /// Failure text from the last attempt
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate and sign in. Returns the route to show on success.
    pub async fn submit(&mut self, session: &mut SessionManager) -> Option<Route> {
        self.message = None;
        if let Err(errors) = validate_login(&self.email, &self.password) {
            self.field_errors = errors;
            return None;
        }
        self.field_errors = FieldErrors::new();

        self.submitting = true;
        let outcome = session.login(self.email.trim(), &self.password).await;
        self.submitting = false;

        if !outcome.success {
            self.message = outcome.message;
            return None;
        }

        self.password.clear();
        let target = outcome
            .redirect_path
            .as_deref()
            .and_then(Route::parse)
            .filter(|route| *route != Route::Login)
            .unwrap_or(Route::List);
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::http::ApiClient;
    use crate::client::storage::MemoryStore;
    use std::sync::Arc;
    use tokio::sync::watch;

    #[tokio::test]
    async fn invalid_form_never_reaches_session() {
        let (_tx, rx) = watch::channel("/login".to_string());
        // Nothing listens on port 9; a network attempt would set a message
        let api = ApiClient::new("http://127.0.0.1:9", Arc::new(MemoryStore::new()), rx).unwrap();
        let mut session = SessionManager::new(api);

        let mut screen = LoginScreen::with_credentials("not-an-email", "");
        assert!(screen.submit(&mut session).await.is_none());
        assert!(screen.message().is_none());
        assert!(session.error().is_none());
        assert_eq!(screen.field_errors().len(), 2);
    }
}
