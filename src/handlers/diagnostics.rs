use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    config::{DATABASE_NAME_VAR, DATABASE_URL_VAR},
    db::DocumentStore,
    AppState,
};

const MAX_COLLECTIONS: usize = 10;
const MAX_ERROR_CHARS: usize = 50;

/// Operational snapshot served by `GET /test`.
#[derive(Debug, Serialize)]
pub struct DiagnosticsReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn truncated(message: &str) -> String {
    message.chars().take(MAX_ERROR_CHARS).collect()
}

fn presence(set: bool) -> String {
    let label = if set { "✅ Set" } else { "❌ Not Set" };
    label.to_string()
}

/// Builds the report. Each check degrades its own field and never aborts the rest.
pub async fn build_report(
    store: Option<&dyn DocumentStore>,
    env_present: impl Fn(&str) -> bool,
) -> DiagnosticsReport {
    let mut report = DiagnosticsReport {
        backend: "✅ Running".to_string(),
        database: "❌ Not Available".to_string(),
        database_url: presence(env_present(DATABASE_URL_VAR)),
        database_name: presence(env_present(DATABASE_NAME_VAR)),
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    let Some(store) = store else {
        return report;
    };

    report.database = "✅ Available".to_string();
    report.connection_status = "Connected".to_string();
    debug!(database = store.name(), "Diagnostics: storage handle present");

    match store.collection_names().await {
        Ok(mut names) => {
            names.truncate(MAX_COLLECTIONS);
            report.collections = names;
            report.database = "✅ Connected & Working".to_string();
        }
        Err(err) => {
            warn!(error = %err, "Diagnostics: collection listing failed");
            report.database = format!("⚠️  Connected but Error: {}", truncated(&err.to_string()));
        }
    }

    report
}

pub async fn test_database(State(state): State<AppState>) -> (StatusCode, Json<DiagnosticsReport>) {
    let report = build_report(state.store.as_deref(), |key| std::env::var_os(key).is_some()).await;
    (StatusCode::OK, Json(report))
}
