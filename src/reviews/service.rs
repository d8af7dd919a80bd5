use std::sync::Arc;

use time::Date;
use tracing::info;

use crate::auth::repo::{IdentityStore, User};
use crate::bookings::dto::parse_check_in_date;
use crate::bookings::repo::{Booking, BookingStore};
use crate::error::ApiError;
use crate::packages::repo::{CatalogStore, Package};
use crate::reviews::dto::{
    CreateReviewRequest, DeleteReviewRequest, ReviewByBookingRequest, ReviewView,
    UpdateReviewRequest,
};
use crate::reviews::repo::{NewReview, Review, ReviewStore, ReviewUpdate};

/// Orchestrates review CRUD across the identity, catalog, booking and
/// review stores. A review can only ever attach to an existing booking,
/// and a booking carries at most one review.
#[derive(Clone)]
pub struct ReviewService {
    identity: Arc<dyn IdentityStore>,
    catalog: Arc<dyn CatalogStore>,
    bookings: Arc<dyn BookingStore>,
    reviews: Arc<dyn ReviewStore>,
}

fn dereference(review: Review, customer_email: &str, hotel_name: &str) -> ReviewView {
    ReviewView {
        date: review.date,
        customer: customer_email.to_string(),
        package: hotel_name.to_string(),
        rating: review.rating,
        title: review.title,
        comment: review.comment,
        image_url: review.image_url,
        suggested_theme: review.suggested_theme,
    }
}

/// Partial update: absent request fields are read back from the stored
/// review. The review date and booking attachment never change here.
fn merge_update(current: &Review, req: &UpdateReviewRequest) -> ReviewUpdate {
    ReviewUpdate {
        rating: req.rating.unwrap_or(current.rating),
        title: req.title.clone().or_else(|| current.title.clone()),
        comment: req.comment.clone().or_else(|| current.comment.clone()),
        image_url: req.image_url.clone().or_else(|| current.image_url.clone()),
        suggested_theme: req
            .suggested_theme
            .clone()
            .or_else(|| current.suggested_theme.clone()),
    }
}

fn check_rating(rating: i32) -> Result<(), ApiError> {
    if !(1..=5).contains(&rating) {
        return Err(ApiError::validation("Rating must be between 1 and 5"));
    }
    Ok(())
}

impl ReviewService {
    pub fn new(
        identity: Arc<dyn IdentityStore>,
        catalog: Arc<dyn CatalogStore>,
        bookings: Arc<dyn BookingStore>,
        reviews: Arc<dyn ReviewStore>,
    ) -> Self {
        Self {
            identity,
            catalog,
            bookings,
            reviews,
        }
    }

    /// Resolve customer → package → booking in that order, so the caller
    /// always learns about the first missing entity only.
    async fn resolve_booking(
        &self,
        email: &str,
        hotel_name: &str,
        check_in: Date,
    ) -> Result<(User, Package, Booking), ApiError> {
        let customer = self
            .identity
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        let package = self
            .catalog
            .find_by_hotel_name(hotel_name)
            .await?
            .ok_or_else(|| ApiError::not_found("Package not found"))?;
        let booking = self
            .bookings
            .find(check_in, customer.id, package.id)
            .await?
            .ok_or_else(|| ApiError::not_found("Booking not found"))?;
        Ok((customer, package, booking))
    }

    pub async fn create(
        &self,
        reviewer: &str,
        req: CreateReviewRequest,
    ) -> Result<ReviewView, ApiError> {
        let hotel_name = req.hotel_name.unwrap_or_default();
        let title = req.title.unwrap_or_default();
        let comment = req.comment.unwrap_or_default();
        let check_in = req.check_in_date.unwrap_or_default();
        let Some(rating) = req.rating else {
            return Err(ApiError::validation("Missing required fields"));
        };
        if hotel_name.is_empty() || title.is_empty() || comment.is_empty() || check_in.is_empty() {
            return Err(ApiError::validation("Missing required fields"));
        }
        check_rating(rating)?;
        let check_in = parse_check_in_date(&check_in)?;

        let (customer, package, booking) = self
            .resolve_booking(reviewer, &hotel_name, check_in)
            .await?;

        if self.reviews.find_by_booking(booking.id).await?.is_some() {
            return Err(ApiError::conflict("Review already exists for this booking"));
        }

        // The unique index on booking_id settles concurrent creates; a loser
        // of that race gets the same 409 as a sequential duplicate.
        let review = self
            .reviews
            .insert_if_absent(NewReview {
                customer_id: customer.id,
                package_id: package.id,
                booking_id: booking.id,
                rating,
                title: Some(title),
                comment: Some(comment),
            })
            .await?
            .ok_or_else(|| ApiError::conflict("Review already exists for this booking"))?;

        info!(booking_id = %booking.id, customer = %customer.email, "review created");
        Ok(dereference(review, &customer.email, &package.hotel_name))
    }

    pub async fn get_all(&self) -> Result<Vec<ReviewView>, ApiError> {
        let reviews = self.reviews.list_all().await?;
        Ok(reviews.into_iter().map(ReviewView::from).collect())
    }

    pub async fn get_by_booking(
        &self,
        req: ReviewByBookingRequest,
    ) -> Result<ReviewView, ApiError> {
        let user_email = req.user_email.unwrap_or_default();
        let hotel_name = req.hotel_name.unwrap_or_default();
        let check_in = req.check_in_date.unwrap_or_default();
        if user_email.is_empty() || hotel_name.is_empty() || check_in.is_empty() {
            return Err(ApiError::validation("Missing required fields"));
        }
        let check_in = parse_check_in_date(&check_in)?;

        let (customer, package, booking) = self
            .resolve_booking(&user_email, &hotel_name, check_in)
            .await?;

        let review = self
            .reviews
            .find_by_booking(booking.id)
            .await?
            .ok_or_else(|| ApiError::not_found("Review not found for this booking"))?;

        Ok(dereference(review, &customer.email, &package.hotel_name))
    }

    pub async fn update(
        &self,
        reviewer: &str,
        req: UpdateReviewRequest,
    ) -> Result<ReviewView, ApiError> {
        let hotel_name = req.hotel_name.clone().unwrap_or_default();
        let check_in = req.check_in_date.clone().unwrap_or_default();
        if hotel_name.is_empty() || check_in.is_empty() {
            return Err(ApiError::validation("Missing required fields"));
        }
        if let Some(rating) = req.rating {
            check_rating(rating)?;
        }
        let check_in = parse_check_in_date(&check_in)?;

        let (customer, package, booking) = self
            .resolve_booking(reviewer, &hotel_name, check_in)
            .await?;

        let review = self
            .reviews
            .find_by_booking(booking.id)
            .await?
            .ok_or_else(|| ApiError::not_found("Review not found for this booking"))?;

        let update = merge_update(&review, &req);
        let updated = self
            .reviews
            .update(review.id, update)
            .await?
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("review vanished during update")))?;

        info!(booking_id = %booking.id, customer = %customer.email, "review updated");
        Ok(dereference(updated, &customer.email, &package.hotel_name))
    }

    pub async fn delete(&self, reviewer: &str, req: DeleteReviewRequest) -> Result<(), ApiError> {
        let hotel_name = req.hotel_name.unwrap_or_default();
        let check_in = req.check_in_date.unwrap_or_default();
        if hotel_name.is_empty() || check_in.is_empty() {
            return Err(ApiError::validation("Missing required fields"));
        }
        let check_in = parse_check_in_date(&check_in)?;

        let (customer, package, booking) = self
            .resolve_booking(reviewer, &hotel_name, check_in)
            .await?;

        if self.reviews.find_by_booking(booking.id).await?.is_none() {
            return Err(ApiError::not_found("Review not found for this booking"));
        }

        let deleted = self
            .reviews
            .delete_by_customer_package(customer.id, package.id)
            .await?;
        if !deleted {
            return Err(ApiError::Internal(anyhow::anyhow!(
                "review delete removed no rows"
            )));
        }

        info!(booking_id = %booking.id, customer = %customer.email, "review deleted");
        Ok(())
    }
}
