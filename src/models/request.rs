use rust_decimal::Decimal;
use serde::Deserialize;

/// Body of `POST /bookings`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub customer: CustomerInput,
    pub court_number: i64,
    pub booking_date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub court_price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItemRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerInput {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineItemRequest {
    pub item_id: i64,
    pub quantity: i64,
}

/// Body of `PATCH /bookings/:id`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingPatch {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub payment_status: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub court_price: Option<Decimal>,
}

impl BookingPatch {
    pub fn is_empty(&self) -> bool {
        self.start_time.is_none()
            && self.end_time.is_none()
            && self.payment_status.is_none()
            && self.court_price.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct BookingsQuery {
    pub booking_date: Option<String>,
}
