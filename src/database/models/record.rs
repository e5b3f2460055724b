use serde_json::{Map, Value};

use crate::database::StoreError;
use crate::types::Record;

/// Fields managed by the store that clients cannot set
const SYSTEM_FIELDS: &[&str] = &["id"];

/// Build a record from API input, requiring a non-empty title and description.
/// Any other fields are kept as-is.
pub fn from_input(id: u64, mut input: Map<String, Value>) -> Result<Record, StoreError> {
    strip_system_fields(&mut input);

    let mut missing = Vec::new();
    let title = take_text(&mut input, "title", &mut missing)?;
    let description = take_text(&mut input, "description", &mut missing)?;

    match (title, description) {
        (Some(title), Some(description)) => Ok(Record {
            id,
            title,
            description,
            extra: input,
        }),
        _ => Err(StoreError::MissingFields(missing)),
    }
}

/// Merge a partial update into an existing record. Supplied text fields must
/// still be non-empty.
pub fn apply_patch(record: &mut Record, mut input: Map<String, Value>) -> Result<(), StoreError> {
    strip_system_fields(&mut input);

    let mut missing = Vec::new();
    let title = if input.contains_key("title") {
        take_text(&mut input, "title", &mut missing)?
    } else {
        None
    };
    let description = if input.contains_key("description") {
        take_text(&mut input, "description", &mut missing)?
    } else {
        None
    };

    if !missing.is_empty() {
        return Err(StoreError::MissingFields(missing));
    }

    if let Some(title) = title {
        record.title = title;
    }
    if let Some(description) = description {
        record.description = description;
    }
    record.extra.extend(input);

    Ok(())
}

fn strip_system_fields(input: &mut Map<String, Value>) {
    for field in SYSTEM_FIELDS {
        input.remove(*field);
    }
}

fn take_text(
    input: &mut Map<String, Value>,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> Result<Option<String>, StoreError> {
    match input.remove(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(Some(s)),
        Some(Value::String(_)) | Some(Value::Null) | None => {
            missing.push(field);
            Ok(None)
        }
        Some(_) => Err(StoreError::Invalid(format!("Field '{}' must be a string", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn from_input_ignores_client_id() {
        let record = from_input(3, object(json!({"id": 99, "title": "T", "description": "D"}))).unwrap();
        assert_eq!(record.id, 3);
        assert!(record.extra.is_empty());
    }

    #[test]
    fn from_input_reports_every_missing_field() {
        let err = from_input(1, object(json!({"title": "  "}))).unwrap_err();
        match err {
            StoreError::MissingFields(fields) => assert_eq!(fields, vec!["title", "description"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn from_input_rejects_non_string_title() {
        let err = from_input(1, object(json!({"title": 5, "description": "D"}))).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[test]
    fn patch_merges_fields() {
        let mut record = from_input(1, object(json!({"title": "T", "description": "D"}))).unwrap();
        apply_patch(&mut record, object(json!({"description": "New", "pinned": true}))).unwrap();
        assert_eq!(record.title, "T");
        assert_eq!(record.description, "New");
        assert_eq!(record.extra["pinned"], json!(true));
    }

    #[test]
    fn patch_rejects_blanking_a_field() {
        let mut record = from_input(1, object(json!({"title": "T", "description": "D"}))).unwrap();
        let err = apply_patch(&mut record, object(json!({"title": ""}))).unwrap_err();
        assert!(matches!(err, StoreError::MissingFields(_)));
        assert_eq!(record.title, "T");
    }
}
