use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, TransactionBehavior};

use crate::config::{AppConfig, TotalsOnUpdate};
use crate::db::queries::{self, NewBooking};
use crate::errors::{AppError, AppResult};
use crate::models::{Booking, BookingPatch, CreateBookingRequest, DEFAULT_PAYMENT_STATUS};
use crate::services::pricing;

/// Create a booking: resolve the customer by phone, snapshot item prices,
/// compute totals and persist everything in one transaction.
pub fn create_booking(
    conn: &mut Connection,
    config: &AppConfig,
    req: CreateBookingRequest,
) -> AppResult<Booking> {
    let phone = req.customer.phone.trim();
    if phone.is_empty() {
        return Err(AppError::BadRequest("customer phone is required".to_string()));
    }
    validate_date(&req.booking_date)?;
    validate_time("start_time", &req.start_time)?;
    validate_time("end_time", &req.end_time)?;
    if let Some(item) = req.items.iter().find(|i| i.quantity <= 0) {
        return Err(AppError::BadRequest(format!(
            "quantity for item {} must be positive",
            item.item_id
        )));
    }
    let payment_status = match req.payment_status.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_PAYMENT_STATUS,
        Some(status) => status,
    };

    // IMMEDIATE takes the write lock up front so the customer lookup and the
    // inserts see the same state.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let (customer_id, created) = queries::upsert_customer(&tx, phone, req.customer.name.trim())?;
    if created {
        tracing::info!(customer_id, "created customer");
    } else {
        tracing::debug!(customer_id, "linked existing customer");
    }

    let lines = pricing::price_lines(&req.items, config.item_policy, |item_id| {
        queries::get_inventory_price(&tx, item_id).map_err(AppError::from)
    })?;
    let totals = pricing::compute_totals(req.court_price, &lines, req.discount_amount)?;

    let booking_id = queries::insert_booking(
        &tx,
        &NewBooking {
            customer_id,
            court_number: req.court_number,
            booking_date: &req.booking_date,
            start_time: &req.start_time,
            end_time: &req.end_time,
            court_price: req.court_price,
            items_total: totals.items_total,
            discount_amount: req.discount_amount,
            final_total: totals.final_total,
            payment_status,
        },
    )?;
    for line in &lines {
        queries::insert_booking_item(&tx, booking_id, line)?;
    }

    tx.commit()?;

    tracing::info!(
        booking_id,
        customer_id,
        court = req.court_number,
        date = %req.booking_date,
        items = lines.len(),
        final_total = %totals.final_total,
        "booking created"
    );

    load_booking(conn, booking_id)
}

pub fn get_booking(conn: &Connection, id: i64) -> AppResult<Booking> {
    load_booking(conn, id)
}

pub fn list_bookings(conn: &Connection, booking_date: Option<&str>) -> AppResult<Vec<Booking>> {
    let date = booking_date.map(str::trim).unwrap_or("");
    if date.is_empty() {
        return Err(AppError::BadRequest(
            "Please provide a booking_date parameter".to_string(),
        ));
    }
    Ok(queries::get_bookings_for_date(conn, date)?)
}

/// Apply the supplied fields of `patch`. Totals are only touched when the
/// court price changes and the config asks for recomputation.
pub fn update_booking(
    conn: &Connection,
    config: &AppConfig,
    id: i64,
    patch: BookingPatch,
) -> AppResult<Booking> {
    let mut booking = load_booking(conn, id)?;
    if patch.is_empty() {
        return Ok(booking);
    }

    if let Some(start_time) = patch.start_time {
        validate_time("start_time", &start_time)?;
        booking.start_time = start_time;
    }
    if let Some(end_time) = patch.end_time {
        validate_time("end_time", &end_time)?;
        booking.end_time = end_time;
    }
    if let Some(status) = patch.payment_status {
        let status = status.trim();
        if status.is_empty() {
            return Err(AppError::BadRequest("payment_status must not be empty".to_string()));
        }
        booking.payment_status = status.to_string();
    }
    if let Some(court_price) = patch.court_price {
        booking.court_price = court_price;
        if config.totals_on_update == TotalsOnUpdate::Recompute {
            booking.final_total = pricing::final_total(
                booking.court_price,
                booking.items_total,
                booking.discount_amount,
            )?;
        }
    }

    if !queries::update_booking(conn, &booking)? {
        return Err(not_found(id));
    }
    tracing::info!(booking_id = id, "booking updated");

    Ok(booking)
}

pub fn delete_booking(conn: &Connection, id: i64) -> AppResult<()> {
    if !queries::delete_booking(conn, id)? {
        return Err(not_found(id));
    }
    tracing::info!(booking_id = id, "booking deleted");
    Ok(())
}

fn load_booking(conn: &Connection, id: i64) -> AppResult<Booking> {
    queries::get_booking_by_id(conn, id)?.ok_or_else(|| not_found(id))
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Booking {id} not found"))
}

fn validate_date(date: &str) -> AppResult<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| AppError::BadRequest(format!("booking_date must be YYYY-MM-DD, got {date:?}")))
}

/// Wall-clock times are stored as given; accept `HH:MM` or `HH:MM:SS`.
fn validate_time(field: &str, time: &str) -> AppResult<()> {
    NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .map(|_| ())
        .map_err(|_| AppError::BadRequest(format!("{field} must be HH:MM or HH:MM:SS, got {time:?}")))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::config::ItemPolicy;
    use crate::db;
    use crate::models::{CustomerInput, ItemType, LineItemRequest};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn request(phone: &str, items: Vec<LineItemRequest>) -> CreateBookingRequest {
        CreateBookingRequest {
            customer: CustomerInput {
                phone: phone.to_string(),
                name: "Alice".to_string(),
            },
            court_number: 3,
            booking_date: "2025-06-15".to_string(),
            start_time: "18:00:00".to_string(),
            end_time: "19:00:00".to_string(),
            court_price: dec("20.00"),
            discount_amount: Decimal::ZERO,
            payment_status: None,
            items,
        }
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_create_booking_computes_totals() {
        let mut conn = db::init_db(":memory:").unwrap();
        let racket =
            queries::create_inventory_item(&conn, "Racket", ItemType::Rental, dec("5.00")).unwrap();

        let booking = create_booking(
            &mut conn,
            &AppConfig::default(),
            request("555-1000", vec![LineItemRequest { item_id: racket, quantity: 2 }]),
        )
        .unwrap();

        assert_eq!(booking.items_total, dec("10.00"));
        assert_eq!(booking.final_total, dec("30.00"));
        assert_eq!(booking.payment_status, "PENDING");
        assert_eq!(booking.items.len(), 1);
        assert_eq!(booking.items[0].price_at_booking, dec("5.00"));
        assert_eq!(booking.customer.phone, "555-1000");
    }

    #[test]
    fn test_create_booking_rejects_empty_phone() {
        let mut conn = db::init_db(":memory:").unwrap();
        let err = create_booking(&mut conn, &AppConfig::default(), request("  ", vec![])).unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(count(&conn, "customers"), 0);
        assert_eq!(count(&conn, "bookings"), 0);
    }

    #[test]
    fn test_create_booking_rejects_bad_date_and_quantity() {
        let mut conn = db::init_db(":memory:").unwrap();
        let config = AppConfig::default();

        let mut req = request("555-1000", vec![]);
        req.booking_date = "15/06/2025".to_string();
        assert!(matches!(
            create_booking(&mut conn, &config, req),
            Err(AppError::BadRequest(_))
        ));

        let req = request("555-1000", vec![LineItemRequest { item_id: 1, quantity: 0 }]);
        assert!(matches!(
            create_booking(&mut conn, &config, req),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_strict_policy_leaves_no_partial_state() {
        let mut conn = db::init_db(":memory:").unwrap();
        let config = AppConfig {
            item_policy: ItemPolicy::Strict,
            ..AppConfig::default()
        };

        let err = create_booking(
            &mut conn,
            &config,
            request("555-4444", vec![LineItemRequest { item_id: 42, quantity: 1 }]),
        )
        .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(count(&conn, "customers"), 0);
        assert_eq!(count(&conn, "bookings"), 0);
    }

    #[test]
    fn test_update_recomputes_final_total() {
        let mut conn = db::init_db(":memory:").unwrap();
        let config = AppConfig::default();
        let booking = create_booking(&mut conn, &config, request("555-1000", vec![])).unwrap();

        let patch = BookingPatch {
            court_price: Some(dec("35.00")),
            ..BookingPatch::default()
        };
        let updated = update_booking(&conn, &config, booking.id, patch).unwrap();

        assert_eq!(updated.court_price, dec("35.00"));
        assert_eq!(updated.final_total, dec("35.00"));
        assert_eq!(updated.start_time, "18:00:00");
    }

    #[test]
    fn test_update_keeps_totals_when_configured() {
        let mut conn = db::init_db(":memory:").unwrap();
        let config = AppConfig {
            totals_on_update: TotalsOnUpdate::Keep,
            ..AppConfig::default()
        };
        let booking = create_booking(&mut conn, &config, request("555-1000", vec![])).unwrap();

        let patch = BookingPatch {
            court_price: Some(dec("35.00")),
            payment_status: Some("PAID".to_string()),
            ..BookingPatch::default()
        };
        update_booking(&conn, &config, booking.id, patch).unwrap();

        let stored = get_booking(&conn, booking.id).unwrap();
        assert_eq!(stored.court_price, dec("35.00"));
        assert_eq!(stored.final_total, dec("20.00"));
        assert_eq!(stored.payment_status, "PAID");
    }

    #[test]
    fn test_update_and_delete_missing_booking() {
        let conn = db::init_db(":memory:").unwrap();
        let config = AppConfig::default();

        assert!(matches!(
            update_booking(&conn, &config, 999, BookingPatch::default()),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(delete_booking(&conn, 999), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_list_requires_date() {
        let conn = db::init_db(":memory:").unwrap();
        assert!(matches!(list_bookings(&conn, None), Err(AppError::BadRequest(_))));
        assert!(matches!(list_bookings(&conn, Some(" ")), Err(AppError::BadRequest(_))));
        assert!(list_bookings(&conn, Some("2025-06-15")).unwrap().is_empty());
    }
}
