use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};

/// Format of a slot's time of day, e.g. `"09:30"`.
pub const SLOT_TIME_FORMAT: &str = "%H:%M";

/// A bookable time of day inside one admin's calendar date.
///
/// `available` and `booked` are tracked independently. A slot can only be
/// reserved while `available && !booked`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub time: String,
    pub available: bool,
    pub booked: bool,
}

impl TimeSlot {
    /// A free slot at `time`.
    pub fn open(time: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            available: true,
            booked: false,
        }
    }

    pub fn is_bookable(&self) -> bool {
        self.available && !self.booked
    }

    fn reserve(&mut self) {
        self.available = false;
        self.booked = true;
    }

    fn release(&mut self) {
        self.available = true;
        self.booked = false;
    }
}

/// All slots one admin offers on one calendar date.
///
/// Unique per `(admin_id, date)`. `version` is bumped by the store on every
/// successful save and is used to reject stale writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlotDay {
    pub id: Uuid,
    pub admin_id: String,
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
    #[serde(default)]
    pub version: i64,
}

impl TimeSlotDay {
    /// A calendar that has not been persisted yet.
    pub fn new(admin_id: impl Into<String>, date: NaiveDate, slots: Vec<TimeSlot>) -> Self {
        let mut day = Self {
            id: Uuid::new_v4(),
            admin_id: admin_id.into(),
            date,
            slots,
            version: 0,
        };
        day.sort_slots();
        day
    }

    pub fn slot(&self, time: &str) -> Option<&TimeSlot> {
        self.slots.iter().find(|slot| slot.time == time)
    }

    fn slot_mut(&mut self, time: &str) -> Option<&mut TimeSlot> {
        self.slots.iter_mut().find(|slot| slot.time == time)
    }

    /// Marks the slot at `time` as booked.
    ///
    /// Fails when no slot has that time, or the slot is not bookable.
    pub fn book_slot(&mut self, time: &str) -> BookingResult<()> {
        let admin_id = self.admin_id.clone();
        let date = self.date;
        match self.slot_mut(time) {
            Some(slot) if slot.is_bookable() => {
                slot.reserve();
                Ok(())
            }
            _ => Err(BookingError::slot_unavailable(&admin_id, date, time)),
        }
    }

    /// Frees the slot at `time`. Returns `false` if no slot has that time.
    pub fn release_slot(&mut self, time: &str) -> bool {
        match self.slot_mut(time) {
            Some(slot) => {
                slot.release();
                true
            }
            None => false,
        }
    }

    /// Replaces the calendar's availability with `new_slots` while keeping
    /// every booked slot exactly as it is.
    ///
    /// Unbooked slots that are not resubmitted are dropped. A submitted slot
    /// whose time is already booked is ignored.
    pub fn merge_slots(&mut self, new_slots: Vec<TimeSlot>) {
        let mut merged: Vec<TimeSlot> = self.slots.drain(..).filter(|slot| slot.booked).collect();
        let booked_times: HashSet<String> = merged.iter().map(|slot| slot.time.clone()).collect();

        merged.extend(
            new_slots
                .into_iter()
                .filter(|slot| !booked_times.contains(&slot.time)),
        );

        self.slots = merged;
        self.sort_slots();
    }

    pub fn booked_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.booked).count()
    }

    // "HH:mm" strings sort chronologically.
    fn sort_slots(&mut self) {
        self.slots.sort_by(|a, b| a.time.cmp(&b.time));
    }
}

/// Checks that every time is a valid `HH:mm` and that no time repeats.
pub fn validate_slot_times(slots: &[TimeSlot]) -> BookingResult<()> {
    let mut seen = HashSet::with_capacity(slots.len());
    for slot in slots {
        parse_slot_time(&slot.time)?;
        if !seen.insert(slot.time.as_str()) {
            return Err(BookingError::Validation(format!(
                "Duplicate time slot {}",
                slot.time
            )));
        }
    }
    Ok(())
}

/// Parses a slot time, requiring the zero-padded `HH:mm` form.
pub fn parse_slot_time(time: &str) -> BookingResult<NaiveTime> {
    let parsed = NaiveTime::parse_from_str(time, SLOT_TIME_FORMAT)
        .map_err(|_| BookingError::Validation(format!("Invalid slot time '{}', expected HH:mm", time)))?;
    if parsed.format(SLOT_TIME_FORMAT).to_string() != time {
        return Err(BookingError::Validation(format!(
            "Invalid slot time '{}', expected HH:mm",
            time
        )));
    }
    Ok(parsed)
}

/// First day of the month and first day of the following month.
pub fn month_bounds(year: i32, month: u32) -> BookingResult<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| BookingError::Validation(format!("Invalid month {}-{}", year, month)))?;
    let end = if start.month() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| BookingError::Validation(format!("Invalid month {}-{}", year, month)))?;
    Ok((start, end))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTimeSlotRequest {
    pub time: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl From<CreateTimeSlotRequest> for TimeSlot {
    fn from(request: CreateTimeSlotRequest) -> Self {
        Self {
            time: request.time,
            available: request.available,
            booked: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTimeSlotDayRequest {
    pub admin_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub slots: Vec<CreateTimeSlotRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotTimeRequest {
    pub time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}
