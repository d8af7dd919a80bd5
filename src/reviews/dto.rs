use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::ReviewDetails;

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub hotel_name: Option<String>,
    pub rating: Option<i32>,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub check_in_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewByBookingRequest {
    pub user_email: Option<String>,
    pub hotel_name: Option<String>,
    pub check_in_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub hotel_name: Option<String>,
    pub check_in_date: Option<String>,
    pub rating: Option<i32>,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub image_url: Option<String>,
    pub suggested_theme: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteReviewRequest {
    pub hotel_name: Option<String>,
    pub check_in_date: Option<String>,
}

/// Review with its cross-store references flattened to display values.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub customer: String,
    pub package: String,
    pub rating: i32,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub image_url: Option<String>,
    pub suggested_theme: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewEnvelope {
    pub message: String,
    pub data: ReviewView,
}

#[derive(Debug, Serialize)]
pub struct ReviewListEnvelope {
    pub message: String,
    pub data: Vec<ReviewView>,
}

#[derive(Debug, Serialize)]
pub struct ReviewMessage {
    pub message: String,
}

impl From<ReviewDetails> for ReviewView {
    fn from(details: ReviewDetails) -> Self {
        Self {
            date: details.date,
            customer: details.customer_email,
            package: details.hotel_name,
            rating: details.rating,
            title: details.title,
            comment: details.comment,
            image_url: details.image_url,
            suggested_theme: details.suggested_theme,
        }
    }
}
