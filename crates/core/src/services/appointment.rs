//! # Appointment Service
//!
//! Orchestrates the appointment lifecycle and keeps the admin's slot calendar
//! a mirror of it:
//!
//! - create: reserve the slot, then persist a `SCHEDULED` appointment
//! - cancel: persist `CANCELLED`, then release the slot
//! - complete: persist `COMPLETED`, slot stays booked
//!
//! Cancelled and completed appointments are terminal. Each transition notifies
//! the [`NotificationService`] after it has been persisted.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::lock::KeyedLocks;
use crate::models::appointment::{
    Appointment, AppointmentStatus, CreateAppointmentRequest, UpdateAppointmentDetailsRequest,
};
use crate::services::notification::NotificationService;
use crate::services::time_slot_day::TimeSlotDayService;
use crate::store::AppointmentStore;

pub struct AppointmentService {
    store: Arc<dyn AppointmentStore>,
    time_slots: Arc<TimeSlotDayService>,
    notifier: Arc<dyn NotificationService>,
    appointment_locks: KeyedLocks<Uuid>,
}

impl AppointmentService {
    pub fn new(
        store: Arc<dyn AppointmentStore>,
        time_slots: Arc<TimeSlotDayService>,
        notifier: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            store,
            time_slots,
            notifier,
            appointment_locks: KeyedLocks::new(),
        }
    }

    /// Books the requested slot and records a scheduled appointment for it.
    ///
    /// Nothing is persisted if the slot cannot be reserved. If the appointment
    /// cannot be saved after the reservation, the slot is released again and
    /// the save error is returned, unless the store reports the slot as taken
    /// by another appointment.
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> BookingResult<Appointment> {
        self.time_slots
            .mark_slot_as_booked(&request.admin_id, request.date, &request.time)
            .await?;

        let appointment = Appointment::scheduled(request);
        let appointment = match self.store.save(appointment.clone()).await {
            Ok(saved) => saved,
            // Another scheduled appointment already holds this slot in the store;
            // the reservation is theirs and must stay booked.
            Err(err @ BookingError::SlotUnavailable { .. }) => {
                warn!(
                    "Slot already held by another appointment, rejecting {}: admin_id={}, date={}, time={}",
                    appointment.id, appointment.admin_id, appointment.date, appointment.time
                );
                return Err(err);
            }
            Err(err) => {
                warn!(
                    "Failed to save appointment {}, releasing slot: admin_id={}, date={}, time={}",
                    appointment.id, appointment.admin_id, appointment.date, appointment.time
                );
                if let Err(release_err) = self
                    .time_slots
                    .release_slot(&appointment.admin_id, appointment.date, &appointment.time)
                    .await
                {
                    warn!(
                        "Failed to release slot after aborted booking {}: {}",
                        appointment.id, release_err
                    );
                }
                return Err(err);
            }
        };

        info!(
            "Appointment scheduled: id={}, student_id={}, admin_id={}, date={}, time={}",
            appointment.id,
            appointment.student_id,
            appointment.admin_id,
            appointment.date,
            appointment.time
        );
        self.notify(&appointment).await;
        Ok(appointment)
    }

    /// Cancels a scheduled appointment and frees its slot.
    ///
    /// The slot released is the one stored on the appointment. If the release
    /// fails the appointment is saved back as scheduled and the error returned.
    pub async fn cancel_appointment(&self, id: Uuid) -> BookingResult<Appointment> {
        let _guard = self.appointment_locks.lock(id).await;

        let previous = self.load(id).await?;
        let mut appointment = previous.clone();
        appointment.transition_to(AppointmentStatus::Cancelled)?;
        let appointment = self.store.save(appointment).await?;

        if let Err(err) = self
            .time_slots
            .release_slot(&appointment.admin_id, appointment.date, &appointment.time)
            .await
        {
            // The slot is still booked, so the appointment goes back to SCHEDULED
            // and the cancel can be retried.
            warn!(
                "Failed to release slot for cancelled appointment {}, restoring it: {}",
                appointment.id, err
            );
            if let Err(restore_err) = self.store.save(previous).await {
                warn!(
                    "Failed to restore appointment {} after aborted cancel: {}",
                    appointment.id, restore_err
                );
            }
            return Err(err);
        }

        info!("Appointment cancelled: id={}", appointment.id);
        self.notify(&appointment).await;
        Ok(appointment)
    }

    /// Marks a scheduled appointment as held. Its slot stays booked.
    pub async fn complete_appointment(&self, id: Uuid) -> BookingResult<Appointment> {
        let _guard = self.appointment_locks.lock(id).await;

        let mut appointment = self.load(id).await?;
        appointment.transition_to(AppointmentStatus::Completed)?;
        let appointment = self.store.save(appointment).await?;

        info!("Appointment completed: id={}", appointment.id);
        self.notify(&appointment).await;
        Ok(appointment)
    }

    /// Sets notes and meeting link on a scheduled appointment. `None` fields
    /// are left as they are.
    pub async fn update_appointment_details(
        &self,
        id: Uuid,
        request: UpdateAppointmentDetailsRequest,
    ) -> BookingResult<Appointment> {
        let _guard = self.appointment_locks.lock(id).await;

        let mut appointment = self.load(id).await?;
        appointment.ensure_open()?;

        if let Some(notes) = request.notes {
            appointment.notes = Some(notes);
        }
        if let Some(meeting_link) = request.meeting_link {
            appointment.meeting_link = Some(meeting_link);
        }
        appointment.updated_at = chrono::Utc::now();

        self.store.save(appointment).await
    }

    pub async fn get_appointment(&self, id: Uuid) -> BookingResult<Appointment> {
        self.load(id).await
    }

    pub async fn get_appointments_by_admin(&self, admin_id: &str) -> BookingResult<Vec<Appointment>> {
        self.store.find_by_admin_id(admin_id).await
    }

    pub async fn get_appointments_by_student(
        &self,
        student_id: &str,
    ) -> BookingResult<Vec<Appointment>> {
        self.store.find_by_student_id(student_id).await
    }

    pub async fn get_appointments_by_team(&self, team_id: &str) -> BookingResult<Vec<Appointment>> {
        self.store.find_by_team_id(team_id).await
    }

    async fn load(&self, id: Uuid) -> BookingResult<Appointment> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(BookingError::AppointmentNotFound(id))
    }

    async fn notify(&self, appointment: &Appointment) {
        let label = appointment.status.as_str();
        if let Err(err) = self
            .notifier
            .create_notification_for_appointment(appointment, label)
            .await
        {
            warn!(
                "Failed to create {} notification for appointment {}: {}",
                label, appointment.id, err
            );
        }
    }
}
