//! # Time Slot Day Service
//!
//! Sole authority over slot availability for an admin's calendar date.
//!
//! Every operation that reads a calendar, checks it and writes it back runs
//! under a mutex keyed by `(admin_id, date)`, so two requests racing for the
//! same slot are serialized and exactly one of them wins. The store's version
//! check rejects stale writes coming from other processes.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::errors::{BookingError, BookingResult};
use crate::lock::KeyedLocks;
use crate::models::time_slot::{month_bounds, validate_slot_times, TimeSlot, TimeSlotDay};
use crate::store::TimeSlotStore;

type DayKey = (String, NaiveDate);

pub struct TimeSlotDayService {
    store: Arc<dyn TimeSlotStore>,
    day_locks: KeyedLocks<DayKey>,
}

impl TimeSlotDayService {
    pub fn new(store: Arc<dyn TimeSlotStore>) -> Self {
        Self {
            store,
            day_locks: KeyedLocks::new(),
        }
    }

    /// Creates the admin's calendar for `date`, or merges `new_slots` into the
    /// existing one.
    ///
    /// Booked slots always survive a merge unchanged; see
    /// [`TimeSlotDay::merge_slots`].
    pub async fn create_or_update_day(
        &self,
        admin_id: &str,
        date: NaiveDate,
        new_slots: Vec<TimeSlot>,
    ) -> BookingResult<TimeSlotDay> {
        validate_slot_times(&new_slots)?;

        let _guard = self.day_locks.lock((admin_id.to_string(), date)).await;

        let day = match self.store.find_by_admin_id_and_date(admin_id, date).await? {
            Some(mut existing) => {
                debug!(
                    "Merging {} slots into existing day: admin_id={}, date={}, booked={}",
                    new_slots.len(),
                    admin_id,
                    date,
                    existing.booked_count()
                );
                existing.merge_slots(new_slots);
                existing
            }
            None => {
                debug!(
                    "Creating day with {} slots: admin_id={}, date={}",
                    new_slots.len(),
                    admin_id,
                    date
                );
                TimeSlotDay::new(admin_id, date, new_slots)
            }
        };

        self.store.save(day).await
    }

    /// Reserves the slot at `time`.
    ///
    /// # Errors
    ///
    /// * `BookingError::DayNotFound` - no calendar for the admin and date
    /// * `BookingError::SlotUnavailable` - no such slot, or it is booked or unavailable
    pub async fn mark_slot_as_booked(
        &self,
        admin_id: &str,
        date: NaiveDate,
        time: &str,
    ) -> BookingResult<TimeSlotDay> {
        let _guard = self.day_locks.lock((admin_id.to_string(), date)).await;

        let mut day = self.load_day(admin_id, date).await?;
        day.book_slot(time)?;
        let day = self.store.save(day).await?;

        info!("Slot booked: admin_id={}, date={}, time={}", admin_id, date, time);
        Ok(day)
    }

    /// Frees the slot at `time`.
    ///
    /// A time that no longer exists in the calendar is not an error; the
    /// calendar is written back unchanged.
    pub async fn release_slot(
        &self,
        admin_id: &str,
        date: NaiveDate,
        time: &str,
    ) -> BookingResult<TimeSlotDay> {
        let _guard = self.day_locks.lock((admin_id.to_string(), date)).await;

        let mut day = self.load_day(admin_id, date).await?;
        if day.release_slot(time) {
            info!("Slot released: admin_id={}, date={}, time={}", admin_id, date, time);
        } else {
            debug!(
                "No slot to release: admin_id={}, date={}, time={}",
                admin_id, date, time
            );
        }

        self.store.save(day).await
    }

    pub async fn get_day_by_admin_and_date(
        &self,
        admin_id: &str,
        date: NaiveDate,
    ) -> BookingResult<TimeSlotDay> {
        self.load_day(admin_id, date).await
    }

    /// All of the admin's calendars dated within the given month.
    pub async fn get_slots_by_admin_and_month(
        &self,
        admin_id: &str,
        year: i32,
        month: u32,
    ) -> BookingResult<Vec<TimeSlotDay>> {
        let (start, end) = month_bounds(year, month)?;
        self.store
            .find_by_admin_id_and_date_between(admin_id, start, end)
            .await
    }

    async fn load_day(&self, admin_id: &str, date: NaiveDate) -> BookingResult<TimeSlotDay> {
        self.store
            .find_by_admin_id_and_date(admin_id, date)
            .await?
            .ok_or_else(|| BookingError::day_not_found(admin_id, date))
    }
}
