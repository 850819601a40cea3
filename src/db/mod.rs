use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::error::AppResult;

#[cfg(test)]
pub mod memory;

/// A schema-free record as held by the store.
pub type Document = Map<String, Value>;

/// Key under which a stored document carries its generated identifier.
pub const ID_FIELD: &str = "_id";

pub const PRODUCT_COLLECTION: &str = "product";

/// Access to a collection-oriented document store.
///
/// Filters are exact matches on top-level fields; an empty filter matches
/// every document. Results come back in storage order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Name of the underlying database, for diagnostics.
    fn name(&self) -> &str;

    /// Persists `record` and returns its newly generated identifier.
    async fn insert(&self, collection: &str, record: Document) -> AppResult<String>;

    /// Up to `limit` matching documents (`None` = all), each with `_id` set.
    async fn query(
        &self,
        collection: &str,
        filter: &Document,
        limit: Option<u64>,
    ) -> AppResult<Vec<Document>>;

    async fn count(&self, collection: &str, filter: &Document) -> AppResult<u64>;

    async fn collection_names(&self) -> AppResult<Vec<String>>;
}

/// Translates a caller limit into a store limit: `0` means unlimited and a
/// negative value counts by its magnitude.
pub fn effective_limit(limit: i64) -> Option<u64> {
    match limit {
        0 => None,
        n => Some(n.unsigned_abs()),
    }
}

/// Inserts `record` stamped with creation and update times.
pub async fn create_document(
    store: &dyn DocumentStore,
    collection: &str,
    mut record: Document,
) -> AppResult<String> {
    let now = Value::String(Utc::now().to_rfc3339());
    record.remove(ID_FIELD);
    record.insert("created_at".to_string(), now.clone());
    record.insert("updated_at".to_string(), now);
    store.insert(collection, record).await
}

// ── Postgres ──────────────────────────────────────────────────────────────────

/// Document store kept in a single Postgres table, one JSONB body per row.
pub struct PgDocumentStore {
    pool: PgPool,
    name: String,
}

impl PgDocumentStore {
    /// Connects, applies pending migrations, and resolves the database name
    /// (explicit `name` wins over the server-reported one).
    pub async fn connect(url: &str, name: Option<String>) -> anyhow::Result<Self> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new().max_connections(10).connect(url).await?;
        info!("Database connection pool established.");

        info!("Running migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Migrations complete.");

        let name = match name {
            Some(name) => name,
            None => {
                sqlx::query_scalar::<_, String>("SELECT current_database()")
                    .fetch_one(&pool)
                    .await?
            }
        };

        Ok(Self { pool, name })
    }
}

fn document_from_row(id: Uuid, body: Value) -> Document {
    let mut doc = match body {
        Value::Object(map) => map,
        _ => Document::new(),
    };
    doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    doc
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert(&self, collection: &str, mut record: Document) -> AppResult<String> {
        record.remove(ID_FIELD);
        let id = Uuid::new_v4();

        sqlx::query("INSERT INTO documents (id, collection, body) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(collection)
            .bind(Json(Value::Object(record)))
            .execute(&self.pool)
            .await?;

        Ok(id.to_string())
    }

    async fn query(
        &self,
        collection: &str,
        filter: &Document,
        limit: Option<u64>,
    ) -> AppResult<Vec<Document>> {
        // LIMIT NULL returns every row.
        let limit = limit.map(|n| i64::try_from(n).unwrap_or(i64::MAX));

        let rows = sqlx::query_as::<_, (Uuid, Json<Value>)>(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = $1
              AND body @> $2
            ORDER BY seq ASC
            LIMIT $3
            "#,
        )
        .bind(collection)
        .bind(Json(Value::Object(filter.clone())))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(body))| document_from_row(id, body))
            .collect())
    }

    async fn count(&self, collection: &str, filter: &Document) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM documents WHERE collection = $1 AND body @> $2",
        )
        .bind(collection)
        .bind(Json(Value::Object(filter.clone())))
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn collection_names(&self) -> AppResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT collection FROM documents ORDER BY collection",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }
}
