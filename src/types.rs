//! Wire types shared by the API server and the client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Colour scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// User preference bag. Unknown keys are preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Denormalized user view returned by `/login`, `/profile` and `/users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub preferences: Preferences,
}

/// A title/description entry in the `records` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Any additional fields a client stored alongside the record
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body sent when creating or replacing a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordInput {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserProfile,
}

/// Partial profile update accepted by `PUT /profile`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

/// Local part of an email address, used wherever a display name or id is missing
pub fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_keeps_extra_fields() {
        let record: Record = serde_json::from_value(json!({
            "id": 7,
            "title": "T",
            "description": "D",
            "tags": ["a"]
        }))
        .unwrap();
        assert_eq!(record.extra["tags"], json!(["a"]));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["tags"], json!(["a"]));
    }

    #[test]
    fn profile_update_uses_camel_case() {
        let update: ProfileUpdate = serde_json::from_value(json!({
            "currentPassword": "old",
            "newPassword": "new-secret"
        }))
        .unwrap();
        assert_eq!(update.current_password.as_deref(), Some("old"));
        assert_eq!(update.new_password.as_deref(), Some("new-secret"));
        assert!(update.name.is_none());
    }

    #[test]
    fn theme_parses_and_toggles() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
    }

    #[test]
    fn local_part_of_email() {
        assert_eq!(email_local_part("nuevo@test.com"), "nuevo");
        assert_eq!(email_local_part("plain"), "plain");
    }
}
