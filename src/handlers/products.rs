use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::{
    db::{self, Document, PRODUCT_COLLECTION},
    error::AppResult,
    models::{Created, ListParams, ProductIn},
    serialize::serialize_product,
    AppState,
};

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<(StatusCode, Json<Vec<Document>>)> {
    let Query(params) = params?;
    let store = state.store()?;

    let start = Instant::now();
    let docs = store
        .query(
            PRODUCT_COLLECTION,
            &params.filter(),
            db::effective_limit(params.limit()),
        )
        .await?;
    let elapsed = start.elapsed();

    info!(
        count = docs.len(),
        category = params.category.as_deref().unwrap_or("*"),
        elapsed_ms = elapsed.as_millis(),
        "Listed products"
    );

    let products = docs.into_iter().map(serialize_product).collect();
    Ok((StatusCode::OK, Json(products)))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductIn>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Created>)> {
    let Json(product) = payload?;
    product.validate()?;
    let store = state.store()?;

    let title = product.title.clone();
    let id = db::create_document(store, PRODUCT_COLLECTION, product.into_document()?).await?;

    info!(id = %id, title = %title, "Created product");

    Ok((StatusCode::CREATED, Json(Created { id })))
}
