use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use time::{macros::date, Date};
use tracing::{info, instrument, warn};

use crate::{auth::extractors::AuthUser, error::ApiError, extract::JsonOrForm, state::AppState};

use super::dto::{
    parse_check_in_date, BookingList, BookingView, DeleteBookingRequest, ManageBookingRequest,
    NewBookingRequest, StatusMessage, UpdateBookingRequest,
};
use super::repo::BookingSummary;

/// Lower bound used when listing a customer's full booking history.
const BOOKING_EPOCH: Date = date!(1900 - 01 - 01);

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/book/newBooking", post(new_booking))
        .route("/book/manageBooking", post(manage_booking))
        .route("/book/updateBooking", post(update_booking))
        .route("/book/deleteBooking", post(delete_booking))
}

/// Most recent check-in first, as API clients expect.
fn sort_newest_first(bookings: &mut [BookingSummary]) {
    bookings.sort_by(|a, b| b.check_in_date.cmp(&a.check_in_date));
}

#[instrument(skip(state, payload))]
pub async fn new_booking(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    JsonOrForm(payload): JsonOrForm<NewBookingRequest>,
) -> Result<(StatusCode, Json<StatusMessage>), ApiError> {
    let check_in = payload.check_in_date.unwrap_or_default();
    let user_email = payload.user_email.unwrap_or_default();
    let hotel_name = payload.hotel_name.unwrap_or_default();
    if check_in.is_empty() || user_email.is_empty() || hotel_name.is_empty() {
        return Err(ApiError::validation("Invalid data format"));
    }
    let check_in = parse_check_in_date(&check_in)?;

    // Unknown references collapse to 400: this endpoint never reveals which
    // lookup failed.
    let customer = state
        .identity
        .find_user_by_email(&user_email)
        .await?
        .ok_or_else(|| ApiError::validation("Booking creation failed"))?;
    let package = state
        .catalog
        .find_by_hotel_name(&hotel_name)
        .await?
        .ok_or_else(|| ApiError::validation("Booking creation failed"))?;

    let booking = state
        .bookings
        .create(customer.id, package.id, check_in)
        .await?;
    info!(
        booking_id = %booking.id,
        customer = %customer.email,
        hotel = %package.hotel_name,
        "booking created"
    );

    Ok((
        StatusCode::CREATED,
        Json(StatusMessage {
            message: "Booking created successfully".into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn manage_booking(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    JsonOrForm(payload): JsonOrForm<ManageBookingRequest>,
) -> Result<(StatusCode, Json<BookingList>), ApiError> {
    let user_email = payload.user_email.unwrap_or_default();
    if user_email.is_empty() {
        return Err(ApiError::validation("Missing required fields"));
    }

    let customer = state
        .identity
        .find_user_by_email(&user_email)
        .await?
        .ok_or_else(|| ApiError::validation(format!("No booking under {user_email}")))?;

    let mut bookings = state
        .bookings
        .list_for_customer_since(customer.id, BOOKING_EPOCH)
        .await?;
    sort_newest_first(&mut bookings);
    let data = bookings.into_iter().map(BookingView::from).collect();

    Ok((
        StatusCode::CREATED,
        Json(BookingList {
            message: "Booking retrieved successfully".into(),
            data,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_booking(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    JsonOrForm(payload): JsonOrForm<UpdateBookingRequest>,
) -> Result<(StatusCode, Json<StatusMessage>), ApiError> {
    let user_email = payload.user_email.unwrap_or_default();
    let old_check_in = payload.old_check_in_date.unwrap_or_default();
    let new_check_in = payload.new_check_in_date.unwrap_or_default();
    let hotel_name = payload.hotel_name.unwrap_or_default();
    if user_email.is_empty() || old_check_in.is_empty() || new_check_in.is_empty() || hotel_name.is_empty() {
        return Err(ApiError::validation("Invalid data format"));
    }
    let old_check_in = parse_check_in_date(&old_check_in)?;
    let new_check_in = parse_check_in_date(&new_check_in)?;

    let customer = state
        .identity
        .find_user_by_email(&user_email)
        .await?
        .ok_or_else(|| ApiError::validation("Booking update failed"))?;
    let package = state
        .catalog
        .find_by_hotel_name(&hotel_name)
        .await?
        .ok_or_else(|| ApiError::validation("Booking update failed"))?;

    let updated = state
        .bookings
        .reschedule(old_check_in, new_check_in, customer.id, package.id)
        .await?;
    if !updated {
        warn!(customer = %customer.email, hotel = %package.hotel_name, "booking update matched nothing");
        return Err(ApiError::validation("Booking update failed"));
    }

    Ok((
        StatusCode::CREATED,
        Json(StatusMessage {
            message: "Booking updated successfully".into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn delete_booking(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    JsonOrForm(payload): JsonOrForm<DeleteBookingRequest>,
) -> Result<(StatusCode, Json<StatusMessage>), ApiError> {
    let user_email = payload.user_email.unwrap_or_default();
    let check_in = payload.check_in_date.unwrap_or_default();
    let hotel_name = payload.hotel_name.unwrap_or_default();
    if user_email.is_empty() || check_in.is_empty() || hotel_name.is_empty() {
        return Err(ApiError::validation("Invalid data format"));
    }
    let check_in = parse_check_in_date(&check_in)?;

    let customer = state
        .identity
        .find_user_by_email(&user_email)
        .await?
        .ok_or_else(|| ApiError::validation("Booking deletion failed"))?;
    let package = state
        .catalog
        .find_by_hotel_name(&hotel_name)
        .await?
        .ok_or_else(|| ApiError::validation("Booking deletion failed"))?;

    let deleted = state
        .bookings
        .delete(check_in, customer.id, package.id)
        .await?;
    if !deleted {
        return Err(ApiError::validation("Booking deletion failed"));
    }

    Ok((
        StatusCode::CREATED,
        Json(StatusMessage {
            message: "Booking deleted successfully".into(),
        }),
    ))
}
