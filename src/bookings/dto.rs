use serde::{Deserialize, Serialize};
use time::Date;

use crate::bookings::repo::BookingSummary;
use crate::error::ApiError;

time::serde::format_description!(check_in_format, Date, "[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` check-in date from a request body.
pub(crate) fn parse_check_in_date(raw: &str) -> Result<Date, ApiError> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    Date::parse(raw, &format).map_err(|_| ApiError::validation("Invalid check-in date"))
}

#[derive(Debug, Deserialize)]
pub struct NewBookingRequest {
    pub check_in_date: Option<String>,
    pub user_email: Option<String>,
    pub hotel_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ManageBookingRequest {
    pub user_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    pub user_email: Option<String>,
    pub old_check_in_date: Option<String>,
    pub new_check_in_date: Option<String>,
    pub hotel_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteBookingRequest {
    pub user_email: Option<String>,
    pub check_in_date: Option<String>,
    pub hotel_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub message: String,
}

/// Booking with its cross-store references flattened to display values.
#[derive(Debug, Serialize)]
pub struct BookingView {
    #[serde(with = "check_in_format")]
    pub check_in_date: Date,
    pub customer: String,
    pub package: String,
}

#[derive(Debug, Serialize)]
pub struct BookingList {
    pub message: String,
    pub data: Vec<BookingView>,
}

impl From<BookingSummary> for BookingView {
    fn from(summary: BookingSummary) -> Self {
        Self {
            check_in_date: summary.check_in_date,
            customer: summary.customer_email,
            package: summary.hotel_name,
        }
    }
}
