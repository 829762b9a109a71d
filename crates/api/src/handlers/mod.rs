pub mod appointment;
pub mod notification;
pub mod time_slot;
