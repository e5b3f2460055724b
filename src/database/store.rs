use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::models::{record, user::User};
use super::query::{RecordPage, RecordQuery};
use super::StoreError;
use crate::auth::hash_password;
use crate::types::{Preferences, Record, Theme};

/// Seed account created whenever the store is initialized
pub const SEED_EMAIL: &str = "nuevo@test.com";
pub const SEED_PASSWORD: &str = "password123";

/// The whole persisted document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub users: Vec<User>,
    pub records: Vec<Record>,
}

impl Document {
    /// Initial contents: one test user and a handful of example records
    pub async fn seed(bcrypt_cost: u32) -> Result<Self, StoreError> {
        let seed_records = [
            (
                "Introduction to React",
                "React is a JavaScript library for building user interfaces, maintained by Meta and a community of developers.",
            ),
            (
                "Functional Components",
                "Functional components are plain functions that receive props and return elements. With hooks they can hold state.",
            ),
            (
                "React Hooks",
                "Hooks let functional components use state and lifecycle features. The most common are useState and useEffect.",
            ),
            (
                "Styled Components",
                "A library for writing CSS in JavaScript, making it easy to build components with scoped, reusable styles.",
            ),
            (
                "JSON Server",
                "A tool for standing up a complete fake REST API with zero coding. Ideal for prototyping and frontend work.",
            ),
        ];

        Ok(Self {
            users: vec![User {
                id: 1,
                name: "Nuevo Usuario".to_string(),
                email: SEED_EMAIL.to_string(),
                password: hash_password(SEED_PASSWORD, bcrypt_cost).await?,
                preferences: Preferences {
                    theme: Theme::Light,
                    extra: Map::new(),
                },
            }],
            records: seed_records
                .iter()
                .enumerate()
                .map(|(i, (title, description))| Record {
                    id: i as u64 + 1,
                    title: title.to_string(),
                    description: description.to_string(),
                    extra: Map::new(),
                })
                .collect(),
        })
    }

    fn next_record_id(&self) -> u64 {
        self.records.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }
}

/// File-backed document store. Every mutation rewrites the file; concurrent
/// writers are serialized by the lock and the last write wins.
pub struct JsonStore {
    path: PathBuf,
    doc: RwLock<Document>,
}

impl JsonStore {
    /// Load the document at `path`, seeding it when missing, unparsable, or
    /// without its collections. Rows that fail to decode are an error; the
    /// file is left untouched.
    pub async fn open(path: impl Into<PathBuf>, bcrypt_cost: u32) -> Result<Self, StoreError> {
        let path = path.into();

        let doc = match load_document(&path).await? {
            Some(doc) => doc,
            None => {
                let doc = Document::seed(bcrypt_cost).await?;
                write_document(&path, &doc).await?;
                tracing::info!("Initialized store at {}", path.display());
                doc
            }
        };

        tracing::info!(
            "Using store at {} ({} users, {} records)",
            path.display(),
            doc.users.len(),
            doc.records.len()
        );

        Ok(Self {
            path,
            doc: RwLock::new(doc),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// (users, records)
    pub async fn counts(&self) -> (usize, usize) {
        let doc = self.doc.read().await;
        (doc.users.len(), doc.records.len())
    }

    // Records

    pub async fn list_records(&self, query: &RecordQuery) -> RecordPage {
        let doc = self.doc.read().await;
        query.apply(&doc.records)
    }

    pub async fn get_record(&self, id: u64) -> Result<Record, StoreError> {
        let doc = self.doc.read().await;
        doc.records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::RecordNotFound(id))
    }

    pub async fn create_record(&self, input: Map<String, Value>) -> Result<Record, StoreError> {
        let mut doc = self.doc.write().await;
        let created = record::from_input(doc.next_record_id(), input)?;
        doc.records.push(created.clone());
        write_document(&self.path, &doc).await?;

        tracing::debug!("Created record {}", created.id);
        Ok(created)
    }

    /// Full replacement, keeping the id
    pub async fn replace_record(&self, id: u64, input: Map<String, Value>) -> Result<Record, StoreError> {
        let mut doc = self.doc.write().await;
        let slot = doc
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::RecordNotFound(id))?;

        *slot = record::from_input(id, input)?;
        let updated = slot.clone();
        write_document(&self.path, &doc).await?;

        tracing::debug!("Replaced record {}", id);
        Ok(updated)
    }

    pub async fn patch_record(&self, id: u64, input: Map<String, Value>) -> Result<Record, StoreError> {
        let mut doc = self.doc.write().await;
        let slot = doc
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::RecordNotFound(id))?;

        // Patch a copy so a rejected update leaves the stored record intact
        let mut patched = slot.clone();
        record::apply_patch(&mut patched, input)?;
        *slot = patched.clone();
        write_document(&self.path, &doc).await?;

        tracing::debug!("Patched record {}", id);
        Ok(patched)
    }

    pub async fn delete_record(&self, id: u64) -> Result<Record, StoreError> {
        let mut doc = self.doc.write().await;
        let index = doc
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::RecordNotFound(id))?;

        let removed = doc.records.remove(index);
        write_document(&self.path, &doc).await?;

        tracing::debug!("Deleted record {}", id);
        Ok(removed)
    }

    // Users

    pub async fn list_users(&self) -> Vec<User> {
        self.doc.read().await.users.clone()
    }

    pub async fn find_user(&self, id: u64) -> Option<User> {
        let doc = self.doc.read().await;
        doc.users.iter().find(|u| u.id == id).cloned()
    }

    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        let doc = self.doc.read().await;
        doc.users.iter().find(|u| u.email == email).cloned()
    }

    pub async fn update_user(&self, user: User) -> Result<User, StoreError> {
        let mut doc = self.doc.write().await;
        let slot = doc
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(StoreError::UserNotFound(user.id))?;

        *slot = user.clone();
        write_document(&self.path, &doc).await?;

        tracing::debug!("Updated user {}", user.id);
        Ok(user)
    }
}

/// Read and validate the document. `Ok(None)` means the file must be (re)seeded.
async fn load_document(path: &Path) -> Result<Option<Document>, StoreError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("No store found at {}; a new one will be created", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let value: Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Store at {} is not valid JSON: {}", path.display(), e);
            return Ok(None);
        }
    };

    let has_collections = value
        .as_object()
        .map(|map| map.get("users").is_some_and(Value::is_array) && map.get("records").is_some_and(Value::is_array))
        .unwrap_or(false);
    if !has_collections {
        tracing::warn!(
            "Store at {} is empty or missing its collections; reinitializing",
            path.display()
        );
        return Ok(None);
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))
}

async fn write_document(path: &Path, doc: &Document) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let content = serde_json::to_vec_pretty(doc)?;
    tokio::fs::write(path, content).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn open_seeds_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        let store = JsonStore::open(&path, 4).await.unwrap();
        assert_eq!(store.counts().await, (1, 5));
        assert!(path.exists());

        let user = store.find_user_by_email(SEED_EMAIL).await.unwrap();
        assert!(verify_password(SEED_PASSWORD, &user.password).await);
    }

    #[tokio::test]
    async fn open_reseeds_a_document_without_collections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        tokio::fs::write(&path, "{}").await.unwrap();

        let store = JsonStore::open(&path, 4).await.unwrap();
        assert_eq!(store.counts().await, (1, 5));
    }

    #[tokio::test]
    async fn open_keeps_an_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        tokio::fs::write(
            &path,
            serde_json::to_string(&json!({
                "users": [],
                "records": [{"id": 10, "title": "Kept", "description": "Still here"}]
            }))
            .unwrap(),
        )
        .await
        .unwrap();

        let store = JsonStore::open(&path, 4).await.unwrap();
        assert_eq!(store.counts().await, (0, 1));
        assert_eq!(store.get_record(10).await.unwrap().title, "Kept");
    }

    #[tokio::test]
    async fn open_keeps_records_without_a_description() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        tokio::fs::write(
            &path,
            r#"{"users": [], "records": [{"id": 2, "title": "Only a title"}]}"#,
        )
        .await
        .unwrap();

        let store = JsonStore::open(&path, 4).await.unwrap();
        assert_eq!(store.counts().await, (0, 1));
        let record = store.get_record(2).await.unwrap();
        assert_eq!(record.title, "Only a title");
        assert_eq!(record.description, "");
    }

    #[tokio::test]
    async fn open_refuses_undecodable_rows_without_touching_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let content = r#"{"users": [{"id": 1, "email": "a@b.c"}], "records": [{"id": "x", "title": "T"}]}"#;
        tokio::fs::write(&path, content).await.unwrap();

        let result = JsonStore::open(&path, 4).await;
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), content);
    }

    #[tokio::test]
    async fn mutations_are_written_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let store = JsonStore::open(&path, 4).await.unwrap();

        let created = store
            .create_record(object(json!({"title": "T", "description": "D"})))
            .await
            .unwrap();
        assert_eq!(created.id, 6);
        store.delete_record(1).await.unwrap();

        let reopened = JsonStore::open(&path, 4).await.unwrap();
        assert_eq!(reopened.get_record(6).await.unwrap().title, "T");
        assert!(matches!(
            reopened.get_record(1).await,
            Err(StoreError::RecordNotFound(1))
        ));
    }

    #[tokio::test]
    async fn rejected_patch_leaves_record_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("db.json"), 4).await.unwrap();

        let before = store.get_record(2).await.unwrap();
        assert!(store
            .patch_record(2, object(json!({"description": ""})))
            .await
            .is_err());
        assert_eq!(store.get_record(2).await.unwrap(), before);
    }
}
