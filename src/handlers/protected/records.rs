use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde_json::{json, Value};

use crate::database::RecordQuery;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::Record;

use super::expect_object;

/// GET /records - List records, optionally searched, sorted and paginated
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<RecordQuery>, QueryRejection>,
) -> ApiResult<Vec<Record>> {
    let Query(query) = query?;
    let page = state.store.list_records(&query).await;

    let response = ApiResponse::success(page.items);
    if page.paginated {
        Ok(response.with_total_count(page.total))
    } else {
        Ok(response)
    }
}

/// GET /records/:id
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Record> {
    let Path(id) = id?;
    let record = state.store.get_record(id).await?;
    Ok(ApiResponse::success(record))
}

/// POST /records - Create a record; title and description are required
pub async fn post(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Record> {
    let Json(payload) = payload?;
    let input = expect_object(payload, "Record")?;
    let record = state.store.create_record(input).await?;
    Ok(ApiResponse::created(record))
}

/// PUT /records/:id - Replace a record; title and description are required
pub async fn put(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Record> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let input = expect_object(payload, "Record")?;
    let record = state.store.replace_record(id, input).await?;
    Ok(ApiResponse::success(record))
}

/// PATCH /records/:id - Merge the supplied fields into a record
pub async fn patch(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Record> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let input = expect_object(payload, "Record")?;
    let record = state.store.patch_record(id, input).await?;
    Ok(ApiResponse::success(record))
}

/// DELETE /records/:id - Responds with an empty object
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = id?;
    state.store.delete_record(id).await?;
    Ok(ApiResponse::success(json!({})))
}
