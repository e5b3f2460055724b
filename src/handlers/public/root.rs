use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - Service description and endpoint catalogue
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "message": "API server running",
        "status": "online",
        "version": version,
        "serverTime": chrono::Utc::now(),
        "endpoints": {
            "auth": {
                "login": { "path": "/login", "method": "POST", "requiresAuth": false }
            },
            "records": {
                "getAll": {
                    "path": "/records",
                    "method": "GET",
                    "requiresAuth": true,
                    "queryParams": ["_page", "_limit", "q", "_sort", "_order"]
                },
                "getOne": { "path": "/records/:id", "method": "GET", "requiresAuth": true },
                "create": { "path": "/records", "method": "POST", "requiresAuth": true },
                "update": { "path": "/records/:id", "method": "PUT", "requiresAuth": true },
                "patch": { "path": "/records/:id", "method": "PATCH", "requiresAuth": true },
                "delete": { "path": "/records/:id", "method": "DELETE", "requiresAuth": true }
            },
            "profile": {
                "get": { "path": "/profile", "method": "GET", "requiresAuth": true },
                "update": { "path": "/profile", "method": "PUT", "requiresAuth": true }
            },
            "users": {
                "getAll": { "path": "/users", "method": "GET", "requiresAuth": true },
                "getOne": { "path": "/users/:id", "method": "GET", "requiresAuth": true }
            }
        }
    }))
}

/// GET /health - Liveness plus collection sizes
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let (users, records) = state.store.counts().await;

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "users": users,
        "records": records
    }))
}
