use serde_json::{json, Map};
use std::sync::Arc;

use crate::client::http::ApiClient;
use crate::client::notify::Notifier;
use crate::client::validation::{validate_password_change, validate_profile_name, FieldErrors};
use crate::types::{ProfileUpdate, Theme, UserProfile};

pub struct ProfileScreen {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    profile: Option<UserProfile>,
    pub name: String,
    pub theme: Theme,
    field_errors: FieldErrors,
    error: Option<String>,
    saving: bool,
}

impl ProfileScreen {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            profile: None,
            name: String::new(),
            theme: Theme::default(),
            field_errors: FieldErrors::new(),
            error: None,
            saving: false,
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub async fn load(&mut self) -> bool {
        match self.api.fetch_profile().await {
            Ok(profile) => {
                self.set_profile(profile);
                self.error = None;
                true
            }
            Err(err) => {
                let message = err.user_message("Could not load profile");
                self.notifier.error(&message);
                self.error = Some(message);
                false
            }
        }
    }

    /// Save name and theme. Returns the updated profile on success.
    pub async fn save_details(&mut self) -> Option<UserProfile> {
        if let Err(errors) = validate_profile_name(&self.name) {
            self.field_errors = errors;
            return None;
        }
        self.field_errors = FieldErrors::new();

        let mut preferences = Map::new();
        preferences.insert("theme".to_string(), json!(self.theme));

        let update = ProfileUpdate {
            name: Some(self.name.trim().to_string()),
            preferences: Some(preferences),
            ..ProfileUpdate::default()
        };

        self.send(update, "Profile updated", "Could not update profile").await
    }

    pub async fn change_password(&mut self, current: &str, new: &str, confirm: &str) -> bool {
        if let Err(errors) = validate_password_change(current, new, confirm) {
            self.field_errors = errors;
            return false;
        }
        self.field_errors = FieldErrors::new();

        let update = ProfileUpdate {
            current_password: Some(current.to_string()),
            new_password: Some(new.to_string()),
            ..ProfileUpdate::default()
        };

        self.send(update, "Password changed", "Could not change password")
            .await
            .is_some()
    }

    async fn send(&mut self, update: ProfileUpdate, success: &str, context: &str) -> Option<UserProfile> {
        self.error = None;
        self.saving = true;
        let result = self.api.update_profile(&update).await;
        self.saving = false;

        match result {
            Ok(profile) => {
                self.notifier.success(success);
                self.set_profile(profile.clone());
                Some(profile)
            }
            Err(err) => {
                let message = err.user_message(context);
                self.notifier.error(&message);
                self.error = Some(message);
                None
            }
        }
    }

    fn set_profile(&mut self, profile: UserProfile) {
        self.name = profile.name.clone();
        self.theme = profile.preferences.theme;
        self.profile = Some(profile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::notify::NotificationCenter;
    use crate::client::storage::MemoryStore;
    use tokio::sync::watch;

    #[tokio::test]
    async fn invalid_forms_stay_local() {
        let (_tx, rx) = watch::channel("/profile".to_string());
        let api = ApiClient::new("http://127.0.0.1:9", Arc::new(MemoryStore::new()), rx).unwrap();
        let notifier = Arc::new(NotificationCenter::new());
        let mut screen = ProfileScreen::new(api, notifier.clone());

        screen.name = "   ".into();
        assert!(screen.save_details().await.is_none());
        assert_eq!(screen.field_errors().get("name"), Some("Name is required"));

        assert!(!screen.change_password("old", "abc", "abc").await);
        assert!(screen.field_errors().get("newPassword").is_some());

        assert!(screen.error().is_none());
        assert!(notifier.active().is_empty());
    }
}
