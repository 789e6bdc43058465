pub mod booking;
pub mod pricing;
