pub mod booking;
pub mod customer;
pub mod inventory;
pub mod request;

pub use booking::{Booking, BookingItem, DEFAULT_PAYMENT_STATUS};
pub use customer::Customer;
pub use inventory::{InventoryItem, ItemType};
pub use request::{BookingPatch, BookingsQuery, CreateBookingRequest, CustomerInput, LineItemRequest};
