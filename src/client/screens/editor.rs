use std::sync::Arc;

use crate::client::http::ApiClient;
use crate::client::notify::Notifier;
use crate::client::validation::{validate_record, FieldErrors};
use crate::types::{Record, RecordInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(u64),
}

/// Create/edit form for a single record.
///
/// `submit` takes `&mut self`, so a second submission cannot start while one
/// is in flight; `is_submitting` exists for rendering a busy state.
pub struct RecordEditor {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    mode: EditorMode,
    pub title: String,
    pub description: String,
    field_errors: FieldErrors,
    error: Option<String>,
    loading: bool,
    submitting: bool,
}

impl RecordEditor {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>, mode: EditorMode) -> Self {
        Self {
            api,
            notifier,
            mode,
            title: String::new(),
            description: String::new(),
            field_errors: FieldErrors::new(),
            error: None,
            loading: false,
            submitting: false,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Fill the form from the server. Only meaningful in edit mode.
    pub async fn load(&mut self) -> bool {
        let EditorMode::Edit(id) = self.mode else {
            return true;
        };

        self.loading = true;
        let result = self.api.fetch_record(id).await;
        self.loading = false;

        match result {
            Ok(record) => {
                self.title = record.title;
                self.description = record.description;
                self.error = None;
                true
            }
            Err(err) if err.is_not_found() => {
                self.error = Some(format!("Record {} not found", id));
                false
            }
            Err(err) => {
                let message = err.user_message("Could not load record");
                self.notifier.error(&message);
                self.error = Some(message);
                false
            }
        }
    }

    /// Validate, then create or update. Invalid input never reaches the server.
    pub async fn submit(&mut self) -> Option<Record> {
        self.error = None;
        if let Err(errors) = validate_record(&self.title, &self.description) {
            self.field_errors = errors;
            return None;
        }
        self.field_errors = FieldErrors::new();

        let input = RecordInput {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
        };

        self.submitting = true;
        let result = match self.mode {
            EditorMode::Create => self.api.create_record(&input).await,
            EditorMode::Edit(id) => self.api.update_record(id, &input).await,
        };
        self.submitting = false;

        match result {
            Ok(record) => {
                match self.mode {
                    EditorMode::Create => {
                        self.notifier.success("Record created");
                        self.title.clear();
                        self.description.clear();
                    }
                    EditorMode::Edit(_) => {
                        self.notifier.success("Record updated");
                    }
                }
                Some(record)
            }
            Err(err) => {
                let message = err.user_message("Could not save record");
                self.notifier.error(&message);
                self.error = Some(message);
                None
            }
        }
    }
}
