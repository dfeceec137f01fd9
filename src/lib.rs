//! Booking confirmation prediction service.
//!
//! Trains a bagged decision-tree ensemble on synthetic historical
//! bookings at startup, then serves confirmation-probability predictions
//! (single and batch) plus training metrics over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod ml;
pub mod models;
