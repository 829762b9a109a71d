pub mod appointment;
pub mod health;
pub mod notification;
pub mod time_slot;
