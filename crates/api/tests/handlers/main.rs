mod appointment_test;
mod middleware_test;
mod notification_test;
mod test_utils;
mod time_slot_test;
