use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A customer, identified uniquely by phone number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub phone: String,
    pub name: String,
    pub loyalty_points: i64,
    pub created_at: NaiveDateTime,
}
