use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Customer, InventoryItem};

pub const DEFAULT_PAYMENT_STATUS: &str = "PENDING";

/// A court reservation with its customer and line items populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub customer_id: i64,
    pub customer: Customer,
    pub court_number: i64,
    pub booking_date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub court_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub items_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_total: Decimal,
    pub payment_status: String,
    pub created_at: NaiveDateTime,
    pub items: Vec<BookingItem>,
}

/// A purchased or rented item on a booking. `price_at_booking` is a snapshot
/// of the inventory price taken when the booking was created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingItem {
    pub id: i64,
    pub booking_id: i64,
    pub item_id: i64,
    pub inventory_details: InventoryItem,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_at_booking: Decimal,
}
