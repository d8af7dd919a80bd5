use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub package_id: Uuid,
    pub check_in_date: Date,
    pub created_at: OffsetDateTime,
}

/// Booking joined with its display references.
#[derive(Debug, Clone, FromRow)]
pub struct BookingSummary {
    pub check_in_date: Date,
    pub customer_email: String,
    pub hotel_name: String,
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create(
        &self,
        customer_id: Uuid,
        package_id: Uuid,
        check_in_date: Date,
    ) -> anyhow::Result<Booking>;
    /// First match wins: nothing stops duplicate (customer, package, date)
    /// bookings from coexisting.
    async fn find(
        &self,
        check_in_date: Date,
        customer_id: Uuid,
        package_id: Uuid,
    ) -> anyhow::Result<Option<Booking>>;
    /// Unordered; callers sort.
    async fn list_for_customer_since(
        &self,
        customer_id: Uuid,
        since: Date,
    ) -> anyhow::Result<Vec<BookingSummary>>;
    async fn reschedule(
        &self,
        old_check_in: Date,
        new_check_in: Date,
        customer_id: Uuid,
        package_id: Uuid,
    ) -> anyhow::Result<bool>;
    async fn delete(
        &self,
        check_in_date: Date,
        customer_id: Uuid,
        package_id: Uuid,
    ) -> anyhow::Result<bool>;
}

pub struct PgBookingStore {
    db: PgPool,
}

impl PgBookingStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn create(
        &self,
        customer_id: Uuid,
        package_id: Uuid,
        check_in_date: Date,
    ) -> anyhow::Result<Booking> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (customer_id, package_id, check_in_date)
            VALUES ($1, $2, $3)
            RETURNING id, customer_id, package_id, check_in_date, created_at
            "#,
        )
        .bind(customer_id)
        .bind(package_id)
        .bind(check_in_date)
        .fetch_one(&self.db)
        .await?;
        Ok(booking)
    }

    async fn find(
        &self,
        check_in_date: Date,
        customer_id: Uuid,
        package_id: Uuid,
    ) -> anyhow::Result<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, customer_id, package_id, check_in_date, created_at
            FROM bookings
            WHERE check_in_date = $1 AND customer_id = $2 AND package_id = $3
            LIMIT 1
            "#,
        )
        .bind(check_in_date)
        .bind(customer_id)
        .bind(package_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(booking)
    }

    async fn list_for_customer_since(
        &self,
        customer_id: Uuid,
        since: Date,
    ) -> anyhow::Result<Vec<BookingSummary>> {
        let rows = sqlx::query_as::<_, BookingSummary>(
            r#"
            SELECT b.check_in_date, u.email AS customer_email, p.hotel_name
            FROM bookings b
            JOIN users u ON u.id = b.customer_id
            JOIN packages p ON p.id = b.package_id
            WHERE b.customer_id = $1 AND b.check_in_date >= $2
            "#,
        )
        .bind(customer_id)
        .bind(since)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn reschedule(
        &self,
        old_check_in: Date,
        new_check_in: Date,
        customer_id: Uuid,
        package_id: Uuid,
    ) -> anyhow::Result<bool> {
        // Touch a single row even when duplicates exist.
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET check_in_date = $2
            WHERE id IN (
                SELECT id FROM bookings
                WHERE check_in_date = $1 AND customer_id = $3 AND package_id = $4
                LIMIT 1
            )
            "#,
        )
        .bind(old_check_in)
        .bind(new_check_in)
        .bind(customer_id)
        .bind(package_id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(
        &self,
        check_in_date: Date,
        customer_id: Uuid,
        package_id: Uuid,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM bookings
            WHERE id IN (
                SELECT id FROM bookings
                WHERE check_in_date = $1 AND customer_id = $2 AND package_id = $3
                LIMIT 1
            )
            "#,
        )
        .bind(check_in_date)
        .bind(customer_id)
        .bind(package_id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
