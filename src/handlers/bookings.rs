use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::errors::{AppError, AppResult};
use crate::models::{Booking, BookingPatch, BookingsQuery, CreateBookingRequest};
use crate::services::booking;
use crate::state::AppState;

fn invalid_body(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection.body_text(), "rejected request body");
    AppError::BadRequest("Invalid Input".to_string())
}

/// An id that cannot name a row is answered like any other missing booking.
fn booking_id(path: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    path.map(|Path(id)| id)
        .map_err(|rejection| AppError::NotFound(format!("Booking not found: {}", rejection.body_text())))
}

// POST /bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let Json(req) = payload.map_err(invalid_body)?;

    let booking = {
        let mut db = state.conn();
        booking::create_booking(&mut db, &state.config, req)?
    };

    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /bookings?booking_date=YYYY-MM-DD
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookingsQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = {
        let db = state.conn();
        booking::list_bookings(&db, query.booking_date.as_deref())?
    };
    Ok(Json(bookings))
}

// GET /bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Booking>> {
    let id = booking_id(path)?;
    let booking = {
        let db = state.conn();
        booking::get_booking(&db, id)?
    };
    Ok(Json(booking))
}

// PATCH /bookings/:id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BookingPatch>, JsonRejection>,
) -> AppResult<Json<Booking>> {
    let id = booking_id(path)?;

    let db = state.conn();
    // A missing booking wins over a malformed body.
    let Json(patch) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            booking::get_booking(&db, id)?;
            return Err(invalid_body(rejection));
        }
    };

    let booking = booking::update_booking(&db, &state.config, id, patch)?;
    Ok(Json(booking))
}

// DELETE /bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<serde_json::Value>> {
    let id = booking_id(path)?;
    {
        let db = state.conn();
        booking::delete_booking(&db, id)?;
    }
    Ok(Json(serde_json::json!({ "message": "Booking deleted successfully" })))
}
