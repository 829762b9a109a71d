//! # MentorBook Core
//!
//! Domain model and booking logic for mentor appointments: slot calendars,
//! the appointment lifecycle, and the storage traits both depend on.

pub mod errors;
pub mod lock;
pub mod models;
pub mod services;
pub mod store;
