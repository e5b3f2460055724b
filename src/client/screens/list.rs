use std::sync::Arc;

use super::Confirm;
use crate::client::http::ApiClient;
use crate::client::notify::Notifier;
use crate::types::Record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
    /// Id is not in the loaded list
    Unknown,
    Failed(String),
}

/// The records table with its client-side filter
pub struct ListScreen {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    records: Vec<Record>,
    filter: String,
    loading: bool,
    error: Option<String>,
}

impl ListScreen {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            records: Vec::new(),
            filter: String::new(),
            loading: false,
            error: None,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    /// Fetch the whole collection. On failure the previous list is kept.
    pub async fn load(&mut self) -> bool {
        self.loading = true;
        let result = self.api.fetch_records().await;
        self.loading = false;

        match result {
            Ok(records) => {
                tracing::debug!("Loaded {} records", records.len());
                self.records = records;
                self.error = None;
                true
            }
            Err(err) => {
                let message = err.user_message("Could not load records");
                self.notifier.error(&message);
                self.error = Some(message);
                false
            }
        }
    }

    /// Records whose title or description contains the filter, ignoring case
    pub fn visible(&self) -> Vec<&Record> {
        let needle = self.filter.trim().to_lowercase();
        if needle.is_empty() {
            return self.records.iter().collect();
        }

        self.records
            .iter()
            .filter(|r| {
                r.title.to_lowercase().contains(&needle)
                    || r.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub async fn delete(&mut self, id: u64, confirm: &dyn Confirm) -> DeleteOutcome {
        let Some(title) = self.records.iter().find(|r| r.id == id).map(|r| r.title.clone()) else {
            return DeleteOutcome::Unknown;
        };

        let prompt = format!("Delete \"{}\"? This cannot be undone.", title);
        if !confirm.confirm(&prompt).await {
            return DeleteOutcome::Cancelled;
        }

        match self.api.delete_record(id).await {
            Ok(()) => {
                self.records.retain(|r| r.id != id);
                self.notifier.success("Record deleted");
                DeleteOutcome::Deleted
            }
            Err(err) => {
                let message = err.user_message("Could not delete record");
                self.notifier.error(&message);
                DeleteOutcome::Failed(message)
            }
        }
    }
}
