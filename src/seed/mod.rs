use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::db::{self, Document, DocumentStore, PRODUCT_COLLECTION};
use crate::error::{AppError, AppResult};

/// The catalog written into an empty product collection.
fn sample_products() -> Vec<Value> {
    vec![
        json!({
            "title": "AirSwift Runner",
            "description": "Lightweight running shoes with responsive foam for daily miles.",
            "price": 129.99,
            "category": "Running",
            "in_stock": true,
            "image_url": "https://images.unsplash.com/photo-1542291026-7eec264c27ff?q=80&w=1200&auto=format&fit=crop",
        }),
        json!({
            "title": "CourtPro 2",
            "description": "Classic court silhouette remastered with premium leather.",
            "price": 99.0,
            "category": "Lifestyle",
            "in_stock": true,
            "image_url": "https://images.unsplash.com/photo-1543508282-6319a3e2621f?q=80&w=1200&auto=format&fit=crop",
        }),
        json!({
            "title": "TrailForce GTX",
            "description": "All-terrain traction with waterproof protection for the wild.",
            "price": 149.5,
            "category": "Trail",
            "in_stock": true,
            "image_url": "https://images.unsplash.com/photo-1542291026-8c1f1a8a261c?q=80&w=1200&auto=format&fit=crop",
        }),
        json!({
            "title": "Flex Studio",
            "description": "Versatile training shoes built for HIIT, strength and more.",
            "price": 119.0,
            "category": "Training",
            "in_stock": true,
            "image_url": "https://images.unsplash.com/photo-1542291026-94d8a1b13972?q=80&w=1200&auto=format&fit=crop",
        }),
    ]
}

/// Result of a seed request, as returned by `POST /api/seed`.
#[derive(Debug, Serialize, PartialEq)]
pub struct SeedOutcome {
    pub status: &'static str,
    pub seeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl SeedOutcome {
    fn seeded(count: usize) -> Self {
        Self { status: "ok", seeded: true, count: Some(count), message: None }
    }

    fn already_populated() -> Self {
        Self { status: "ok", seeded: false, count: None, message: Some("Products already exist") }
    }
}

/// Writes the sample catalog unless the product collection already holds anything.
pub async fn seed_products(store: &dyn DocumentStore) -> AppResult<SeedOutcome> {
    let existing = store.count(PRODUCT_COLLECTION, &Document::new()).await?;
    if existing > 0 {
        info!(existing, "Products already exist, skipping seed");
        return Ok(SeedOutcome::already_populated());
    }

    let samples = sample_products();
    let count = samples.len();
    for sample in samples {
        let Value::Object(record) = sample else {
            return Err(AppError::Internal("sample product is not an object".to_string()));
        };
        db::create_document(store, PRODUCT_COLLECTION, record).await?;
    }

    info!(count, "Seeded sample products");
    Ok(SeedOutcome::seeded(count))
}

/// What the startup seed attempt did. Logged, then discarded.
#[derive(Debug, PartialEq)]
pub enum StartupSeed {
    Unconfigured,
    AlreadyPopulated,
    Seeded(usize),
    Failed(String),
}

/// Seeds an empty catalog at process start. Never fails.
pub async fn ensure_seeded(store: Option<&dyn DocumentStore>) -> StartupSeed {
    let Some(store) = store else {
        return StartupSeed::Unconfigured;
    };

    let outcome = match seed_products(store).await {
        Ok(SeedOutcome { seeded: true, count, .. }) => StartupSeed::Seeded(count.unwrap_or(0)),
        Ok(_) => StartupSeed::AlreadyPopulated,
        Err(err) => StartupSeed::Failed(err.to_string()),
    };

    match &outcome {
        StartupSeed::Failed(reason) => warn!(%reason, "Startup seed failed, continuing"),
        other => info!(outcome = ?other, "Startup seed check complete"),
    }
    outcome
}
