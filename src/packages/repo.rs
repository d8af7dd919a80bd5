use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Package {
    pub id: Uuid,
    pub hotel_name: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub unit_cost: sqlx::types::Decimal,
    pub duration: i32,
    pub created_at: OffsetDateTime,
}

/// Read-mostly hotel package catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_packages(&self) -> anyhow::Result<Vec<Package>>;
    async fn find_by_hotel_name(&self, hotel_name: &str) -> anyhow::Result<Option<Package>>;
}

pub struct PgCatalogStore {
    db: PgPool,
}

impl PgCatalogStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_packages(&self) -> anyhow::Result<Vec<Package>> {
        let rows = sqlx::query_as::<_, Package>(
            r#"
            SELECT id, hotel_name, image_url, description, unit_cost, duration, created_at
            FROM packages
            ORDER BY hotel_name
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_hotel_name(&self, hotel_name: &str) -> anyhow::Result<Option<Package>> {
        let package = sqlx::query_as::<_, Package>(
            r#"
            SELECT id, hotel_name, image_url, description, unit_cost, duration, created_at
            FROM packages
            WHERE hotel_name = $1
            "#,
        )
        .bind(hotel_name)
        .fetch_optional(&self.db)
        .await?;
        Ok(package)
    }
}
