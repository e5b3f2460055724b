use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::database::StoreError;
use crate::types::{email_local_part, Preferences, UserProfile};

/// Stored user row. `password` holds a bcrypt hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub preferences: Preferences,
}

impl User {
    /// Name shown to clients; falls back to the email local part
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            email_local_part(&self.email).to_string()
        } else {
            self.name.clone()
        }
    }

    /// Public view without the password hash
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: Some(self.id),
            name: self.display_name(),
            email: self.email.clone(),
            preferences: self.preferences.clone(),
        }
    }

    /// Set the display name; an empty name resets it to the email local part
    pub fn rename(&mut self, name: &str) {
        let name = name.trim();
        self.name = if name.is_empty() {
            email_local_part(&self.email).to_string()
        } else {
            name.to_string()
        };
    }

    /// Merge a partial preference object over the current preferences
    pub fn merge_preferences(&mut self, patch: Map<String, Value>) -> Result<(), StoreError> {
        let mut current = match serde_json::to_value(&self.preferences)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        current.extend(patch);

        self.preferences = serde_json::from_value(Value::Object(current))
            .map_err(|e| StoreError::Invalid(format!("Invalid preferences: {}", e)))?;
        Ok(())
    }
}
