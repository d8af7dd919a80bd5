use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub package_id: Uuid,
    pub booking_id: Uuid,
    pub rating: i32,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub date: OffsetDateTime,
    pub suggested_theme: Option<String>,
    pub image_url: Option<String>,
}

/// Review joined with its customer email and package hotel name.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewDetails {
    pub date: OffsetDateTime,
    pub customer_email: String,
    pub hotel_name: String,
    pub rating: i32,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub image_url: Option<String>,
    pub suggested_theme: Option<String>,
}

#[derive(Debug)]
pub struct NewReview {
    pub customer_id: Uuid,
    pub package_id: Uuid,
    pub booking_id: Uuid,
    pub rating: i32,
    pub title: Option<String>,
    pub comment: Option<String>,
}

/// Full replacement set written by an update; the service merges absent
/// request fields from the stored review before calling in.
#[derive(Debug)]
pub struct ReviewUpdate {
    pub rating: i32,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub image_url: Option<String>,
    pub suggested_theme: Option<String>,
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Atomic create: the unique index on booking_id makes a concurrent
    /// duplicate lose cleanly. `None` means the booking is already reviewed.
    async fn insert_if_absent(&self, new: NewReview) -> anyhow::Result<Option<Review>>;
    async fn list_all(&self) -> anyhow::Result<Vec<ReviewDetails>>;
    async fn find_by_booking(&self, booking_id: Uuid) -> anyhow::Result<Option<Review>>;
    /// The review date and booking attachment are never touched.
    async fn update(&self, review_id: Uuid, update: ReviewUpdate)
        -> anyhow::Result<Option<Review>>;
    /// Removes the first review matching (customer, package).
    async fn delete_by_customer_package(
        &self,
        customer_id: Uuid,
        package_id: Uuid,
    ) -> anyhow::Result<bool>;
}

pub struct PgReviewStore {
    db: PgPool,
}

impl PgReviewStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn insert_if_absent(&self, new: NewReview) -> anyhow::Result<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (customer_id, package_id, booking_id, rating, title, comment)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (booking_id) DO NOTHING
            RETURNING id, customer_id, package_id, booking_id, rating, title, comment,
                      date, suggested_theme, image_url
            "#,
        )
        .bind(new.customer_id)
        .bind(new.package_id)
        .bind(new.booking_id)
        .bind(new.rating)
        .bind(new.title)
        .bind(new.comment)
        .fetch_optional(&self.db)
        .await?;
        Ok(review)
    }

    async fn list_all(&self) -> anyhow::Result<Vec<ReviewDetails>> {
        let rows = sqlx::query_as::<_, ReviewDetails>(
            r#"
            SELECT r.date, u.email AS customer_email, p.hotel_name, r.rating, r.title,
                   r.comment, r.image_url, r.suggested_theme
            FROM reviews r
            JOIN users u ON u.id = r.customer_id
            JOIN packages p ON p.id = r.package_id
            ORDER BY r.date
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_booking(&self, booking_id: Uuid) -> anyhow::Result<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, customer_id, package_id, booking_id, rating, title, comment,
                   date, suggested_theme, image_url
            FROM reviews
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(review)
    }

    async fn update(
        &self,
        review_id: Uuid,
        update: ReviewUpdate,
    ) -> anyhow::Result<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET rating = $2, title = $3, comment = $4, image_url = $5, suggested_theme = $6
            WHERE id = $1
            RETURNING id, customer_id, package_id, booking_id, rating, title, comment,
                      date, suggested_theme, image_url
            "#,
        )
        .bind(review_id)
        .bind(update.rating)
        .bind(update.title)
        .bind(update.comment)
        .bind(update.image_url)
        .bind(update.suggested_theme)
        .fetch_optional(&self.db)
        .await?;
        Ok(review)
    }

    async fn delete_by_customer_package(
        &self,
        customer_id: Uuid,
        package_id: Uuid,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM reviews
            WHERE id IN (
                SELECT id FROM reviews
                WHERE customer_id = $1 AND package_id = $2
                LIMIT 1
            )
            "#,
        )
        .bind(customer_id)
        .bind(package_id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
