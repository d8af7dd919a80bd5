use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use crate::{auth::extractors::AuthUser, error::ApiError, extract::JsonOrForm, state::AppState};

use super::dto::{
    CreateReviewRequest, DeleteReviewRequest, ReviewByBookingRequest, ReviewEnvelope,
    ReviewListEnvelope, ReviewMessage, UpdateReviewRequest,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/review/createReview", post(create_review))
        .route("/review/getAllReviews", post(get_all_reviews))
        .route("/review/getReviewByBooking", post(get_review_by_booking))
        .route("/review/updateReview", post(update_review))
        .route("/review/deleteReview", post(delete_review))
}

#[instrument(skip(state, payload))]
pub async fn create_review(
    State(state): State<AppState>,
    AuthUser(reviewer): AuthUser,
    JsonOrForm(payload): JsonOrForm<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewEnvelope>), ApiError> {
    let data = state.reviews.create(&reviewer, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ReviewEnvelope {
            message: "Review created successfully".into(),
            data,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_all_reviews(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<ReviewListEnvelope>, ApiError> {
    let data = state.reviews.get_all().await?;
    Ok(Json(ReviewListEnvelope {
        message: "Reviews retrieved successfully".into(),
        data,
    }))
}

/// Resolves the booking from the body's user_email; read access is not
/// restricted to the review's author.
#[instrument(skip(state, payload))]
pub async fn get_review_by_booking(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    JsonOrForm(payload): JsonOrForm<ReviewByBookingRequest>,
) -> Result<Json<ReviewEnvelope>, ApiError> {
    let data = state.reviews.get_by_booking(payload).await?;
    Ok(Json(ReviewEnvelope {
        message: "Review retrieved successfully".into(),
        data,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_review(
    State(state): State<AppState>,
    AuthUser(reviewer): AuthUser,
    JsonOrForm(payload): JsonOrForm<UpdateReviewRequest>,
) -> Result<Json<ReviewEnvelope>, ApiError> {
    let data = state.reviews.update(&reviewer, payload).await?;
    Ok(Json(ReviewEnvelope {
        message: "Review updated successfully".into(),
        data,
    }))
}

#[instrument(skip(state, payload))]
pub async fn delete_review(
    State(state): State<AppState>,
    AuthUser(reviewer): AuthUser,
    JsonOrForm(payload): JsonOrForm<DeleteReviewRequest>,
) -> Result<Json<ReviewMessage>, ApiError> {
    state.reviews.delete(&reviewer, payload).await?;
    Ok(Json(ReviewMessage {
        message: "Review deleted successfully".into(),
    }))
}
