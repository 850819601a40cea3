pub mod diagnostics;
pub mod products;
pub mod seed;

use axum::{http::StatusCode, Json};
use serde_json::json;

pub async fn root() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "message": "Athletic Store Backend Ready" })))
}

pub async fn hello() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "message": "Hello from the backend API!" })))
}
