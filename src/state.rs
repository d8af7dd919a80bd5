use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::auth::repo::{IdentityStore, PgIdentityStore};
use crate::auth::service::AuthService;
use crate::bookings::repo::{BookingStore, PgBookingStore};
use crate::config::AppConfig;
use crate::packages::repo::{CatalogStore, PgCatalogStore};
use crate::reviews::repo::{PgReviewStore, ReviewStore};
use crate::reviews::service::ReviewService;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub reviews: ReviewService,
    pub identity: Arc<dyn IdentityStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub bookings: Arc<dyn BookingStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Ok(Self::from_parts(db, config))
    }

    pub fn from_parts(db: PgPool, config: Arc<AppConfig>) -> Self {
        let identity: Arc<dyn IdentityStore> = Arc::new(PgIdentityStore::new(db.clone()));
        let catalog: Arc<dyn CatalogStore> = Arc::new(PgCatalogStore::new(db.clone()));
        let bookings: Arc<dyn BookingStore> = Arc::new(PgBookingStore::new(db.clone()));
        let reviews_store: Arc<dyn ReviewStore> = Arc::new(PgReviewStore::new(db.clone()));

        let auth = AuthService::new(identity.clone());
        let reviews = ReviewService::new(
            identity.clone(),
            catalog.clone(),
            bookings.clone(),
            reviews_store,
        );

        Self {
            db,
            config,
            auth,
            reviews,
            identity,
            catalog,
            bookings,
        }
    }
}
