// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route here sits behind `jwt_auth_middleware`, which rejects requests
// without a valid bearer token (401) and injects `AuthUser` into the request
// extensions. Records carry no owner: any authenticated caller may read and
// write any record. Profile routes act on the token subject only.

pub mod profile;
pub mod records;
pub mod users;

use serde_json::{Map, Value};

use crate::error::ApiError;

/// Require a JSON object body
pub(crate) fn expect_object(payload: Value, what: &str) -> Result<Map<String, Value>, ApiError> {
    match payload {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::bad_request(format!("{} must be a JSON object", what))),
    }
}
