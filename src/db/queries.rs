use std::collections::HashMap;
use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::models::{Booking, BookingItem, Customer, InventoryItem, ItemType};
use crate::services::pricing::PricedLine;

// ── Customers ──

/// Insert the customer unless the phone is already known. Returns the
/// customer id and whether a new row was created.
pub fn upsert_customer(conn: &Connection, phone: &str, name: &str) -> rusqlite::Result<(i64, bool)> {
    let inserted = conn.execute(
        "INSERT INTO customers (phone, name) VALUES (?1, ?2)
         ON CONFLICT(phone) DO NOTHING",
        params![phone, name],
    )?;

    let id: i64 = conn.query_row(
        "SELECT id FROM customers WHERE phone = ?1",
        params![phone],
        |row| row.get(0),
    )?;

    Ok((id, inserted > 0))
}

#[cfg(test)]
pub fn get_customer_by_phone(conn: &Connection, phone: &str) -> rusqlite::Result<Option<Customer>> {
    conn.query_row(
        "SELECT id, phone, name, loyalty_points, created_at FROM customers WHERE phone = ?1",
        params![phone],
        |row| parse_customer_row(row, 0),
    )
    .optional()
}

fn parse_customer_row(row: &Row, offset: usize) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(offset)?,
        phone: row.get(offset + 1)?,
        name: row.get(offset + 2)?,
        loyalty_points: row.get(offset + 3)?,
        created_at: parse_timestamp(&row.get::<_, String>(offset + 4)?),
    })
}

// ── Inventory ──

#[cfg(test)]
pub fn create_inventory_item(
    conn: &Connection,
    name: &str,
    item_type: ItemType,
    price: Decimal,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO inventory_items (name, type, current_price) VALUES (?1, ?2, ?3)",
        params![name, item_type.as_str(), price.to_string()],
    )?;
    Ok(conn.last_insert_rowid())
}

#[cfg(test)]
pub fn set_inventory_price(conn: &Connection, id: i64, price: Decimal) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE inventory_items SET current_price = ?1 WHERE id = ?2",
        params![price.to_string(), id],
    )?;
    Ok(count > 0)
}

#[cfg(test)]
pub fn set_inventory_active(conn: &Connection, id: i64, active: bool) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE inventory_items SET is_active = ?1 WHERE id = ?2",
        params![active as i32, id],
    )?;
    Ok(count > 0)
}

/// Current price of an inventory item, regardless of its active flag.
pub fn get_inventory_price(conn: &Connection, id: i64) -> rusqlite::Result<Option<Decimal>> {
    conn.query_row(
        "SELECT current_price FROM inventory_items WHERE id = ?1",
        params![id],
        |row| decimal_col(row, 0),
    )
    .optional()
}

pub fn list_active_inventory(conn: &Connection) -> rusqlite::Result<Vec<InventoryItem>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type, current_price, is_active
         FROM inventory_items WHERE is_active = 1 ORDER BY name ASC, id ASC",
    )?;

    let rows = stmt.query_map([], |row| parse_inventory_row(row, 0))?;

    let mut items = vec![];
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}

fn parse_inventory_row(row: &Row, offset: usize) -> rusqlite::Result<InventoryItem> {
    let type_str: String = row.get(offset + 2)?;
    let item_type = ItemType::parse(&type_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            offset + 2,
            Type::Text,
            format!("unknown inventory type: {type_str}").into(),
        )
    })?;

    Ok(InventoryItem {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        item_type,
        current_price: decimal_col(row, offset + 3)?,
        is_active: row.get::<_, i32>(offset + 4)? != 0,
    })
}

// ── Bookings ──

/// Column values for a booking row about to be inserted.
pub struct NewBooking<'a> {
    pub customer_id: i64,
    pub court_number: i64,
    pub booking_date: &'a str,
    pub start_time: &'a str,
    pub end_time: &'a str,
    pub court_price: Decimal,
    pub items_total: Decimal,
    pub discount_amount: Decimal,
    pub final_total: Decimal,
    pub payment_status: &'a str,
}

pub fn insert_booking(conn: &Connection, booking: &NewBooking) -> rusqlite::Result<i64> {
    let created_at = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string();

    conn.execute(
        "INSERT INTO bookings (customer_id, court_number, booking_date, start_time, end_time,
                               court_price, items_total, discount_amount, final_total,
                               payment_status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            booking.customer_id,
            booking.court_number,
            booking.booking_date,
            booking.start_time,
            booking.end_time,
            booking.court_price.to_string(),
            booking.items_total.to_string(),
            booking.discount_amount.to_string(),
            booking.final_total.to_string(),
            booking.payment_status,
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_booking_item(conn: &Connection, booking_id: i64, line: &PricedLine) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO booking_items (booking_id, item_id, quantity, price_at_booking)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            booking_id,
            line.item_id,
            line.quantity,
            line.price_at_booking.to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

const BOOKING_COLUMNS: &str = "b.id, b.customer_id, b.court_number, b.booking_date, b.start_time, b.end_time,
     b.court_price, b.items_total, b.discount_amount, b.final_total, b.payment_status, b.created_at,
     c.id, c.phone, c.name, c.loyalty_points, c.created_at";

const BOOKING_ITEM_COLUMNS: &str = "bi.id, bi.booking_id, bi.item_id, bi.quantity, bi.price_at_booking,
     i.id, i.name, i.type, i.current_price, i.is_active";

pub fn get_booking_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Booking>> {
    let booking = conn
        .query_row(
            &format!(
                "SELECT {BOOKING_COLUMNS}
                 FROM bookings b JOIN customers c ON c.id = b.customer_id
                 WHERE b.id = ?1"
            ),
            params![id],
            parse_booking_row,
        )
        .optional()?;

    let Some(mut booking) = booking else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_ITEM_COLUMNS}
         FROM booking_items bi JOIN inventory_items i ON i.id = bi.item_id
         WHERE bi.booking_id = ?1 ORDER BY bi.id ASC"
    ))?;
    let rows = stmt.query_map(params![id], parse_booking_item_row)?;
    for row in rows {
        booking.items.push(row?);
    }

    Ok(Some(booking))
}

/// All bookings stored under exactly `date`, each with customer and items.
pub fn get_bookings_for_date(conn: &Connection, date: &str) -> rusqlite::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS}
         FROM bookings b JOIN customers c ON c.id = b.customer_id
         WHERE b.booking_date = ?1 ORDER BY b.start_time ASC, b.id ASC"
    ))?;
    let rows = stmt.query_map(params![date], parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_ITEM_COLUMNS}
         FROM booking_items bi
         JOIN inventory_items i ON i.id = bi.item_id
         JOIN bookings b ON b.id = bi.booking_id
         WHERE b.booking_date = ?1 ORDER BY bi.id ASC"
    ))?;
    let rows = stmt.query_map(params![date], parse_booking_item_row)?;

    let mut items_by_booking: HashMap<i64, Vec<BookingItem>> = HashMap::new();
    for row in rows {
        let item = row?;
        items_by_booking.entry(item.booking_id).or_default().push(item);
    }

    for booking in &mut bookings {
        if let Some(items) = items_by_booking.remove(&booking.id) {
            booking.items = items;
        }
    }

    Ok(bookings)
}

/// Write back the mutable columns of a booking.
pub fn update_booking(conn: &Connection, booking: &Booking) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings
         SET start_time = ?1, end_time = ?2, payment_status = ?3, court_price = ?4, final_total = ?5
         WHERE id = ?6",
        params![
            booking.start_time,
            booking.end_time,
            booking.payment_status,
            booking.court_price.to_string(),
            booking.final_total.to_string(),
            booking.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_booking_row(row: &Row) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        court_number: row.get(2)?,
        booking_date: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        court_price: decimal_col(row, 6)?,
        items_total: decimal_col(row, 7)?,
        discount_amount: decimal_col(row, 8)?,
        final_total: decimal_col(row, 9)?,
        payment_status: row.get(10)?,
        created_at: parse_timestamp(&row.get::<_, String>(11)?),
        customer: parse_customer_row(row, 12)?,
        items: vec![],
    })
}

fn parse_booking_item_row(row: &Row) -> rusqlite::Result<BookingItem> {
    Ok(BookingItem {
        id: row.get(0)?,
        booking_id: row.get(1)?,
        item_id: row.get(2)?,
        quantity: row.get(3)?,
        price_at_booking: decimal_col(row, 4)?,
        inventory_details: parse_inventory_row(row, 5)?,
    })
}

// ── Helpers ──

/// Money is stored as TEXT so the decimal scale survives the round trip.
fn decimal_col(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_timestamp(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc())
}
