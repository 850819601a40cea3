use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::{
    error::AppResult,
    seed::{self, SeedOutcome},
    AppState,
};

// ── POST /api/seed ───────────────────────────────────────────────────────────

pub async fn seed_data(State(state): State<AppState>) -> AppResult<(StatusCode, Json<SeedOutcome>)> {
    let store = state.store()?;

    let start = Instant::now();
    let outcome = seed::seed_products(store).await?;

    info!(
        seeded = outcome.seeded,
        seed_ms = start.elapsed().as_millis(),
        "Seed request handled"
    );

    Ok((StatusCode::OK, Json(outcome)))
}
