//! Booking workflow
//!
//! Role- and ownership-checked operations over the appointment store.
//! The workflow owns the authorization rules; the store below it knows
//! nothing about callers, and the HTTP layer above it only translates
//! errors.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{BookingError, BookingResult};
use crate::models::{
    Appointment, AppointmentKind, AppointmentPatch, AppointmentStatus, Caller, NewAppointment,
    Role,
};
use crate::store::AppointmentRepository;

/// Client-supplied booking request. Any patient id in the payload is
/// ignored; the stored patient is always the authenticated caller.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub doctor_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub appointment_type: AppointmentKind,
    pub consultation_fee: Decimal,
}

pub struct BookingWorkflow {
    appointments: Arc<dyn AppointmentRepository>,
}

impl BookingWorkflow {
    pub fn new(appointments: Arc<dyn AppointmentRepository>) -> Self {
        Self { appointments }
    }

    /// Book a new appointment. Patient role only.
    pub async fn create(
        &self,
        caller: Caller,
        request: BookingRequest,
    ) -> BookingResult<Appointment> {
        if caller.role != Role::Patient {
            return Err(BookingError::PatientRoleRequired);
        }
        if request.consultation_fee <= Decimal::ZERO {
            return Err(BookingError::Validation(
                "Consultation fee must be positive".to_string(),
            ));
        }

        let appointment = self
            .appointments
            .create(NewAppointment {
                patient_id: caller.subject,
                doctor_id: request.doctor_id,
                appointment_date: request.appointment_date,
                appointment_type: request.appointment_type,
                consultation_fee: request.consultation_fee,
            })
            .await?;

        tracing::info!(
            appointment_id = %appointment.id,
            patient_id = %appointment.patient_id,
            doctor_id = %appointment.doctor_id,
            "appointment booked"
        );
        Ok(appointment)
    }

    /// List the caller's own appointments as a patient.
    pub async fn list_for_patient(&self, caller: Caller) -> BookingResult<Vec<Appointment>> {
        if caller.role != Role::Patient {
            return Err(BookingError::NotAuthorized);
        }
        self.appointments.find_by_patient(caller.subject).await
    }

    /// List the caller's own appointments as a doctor.
    pub async fn list_for_doctor(&self, caller: Caller) -> BookingResult<Vec<Appointment>> {
        if caller.role != Role::Doctor {
            return Err(BookingError::NotAuthorized);
        }
        self.appointments.find_by_doctor(caller.subject).await
    }

    /// Transition an appointment's status. Assigned doctor only; the
    /// transition must be allowed by the lifecycle table.
    pub async fn set_status(
        &self,
        caller: Caller,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> BookingResult<Appointment> {
        if caller.role != Role::Doctor {
            return Err(BookingError::NotAuthorized);
        }

        let appointment = self.appointments.find_by_id(appointment_id).await?;
        if appointment.doctor_id != caller.subject {
            return Err(BookingError::NotAuthorized);
        }
        if !appointment.status.can_transition_to(status) {
            return Err(BookingError::InvalidTransition {
                from: appointment.status,
                to: status,
            });
        }

        let updated = self
            .appointments
            .update(
                appointment_id,
                AppointmentPatch { status: Some(status), ..AppointmentPatch::default() },
            )
            .await?;
        tracing::info!(
            appointment_id = %appointment_id,
            from = %appointment.status,
            to = %status,
            "appointment status updated"
        );
        Ok(updated)
    }

    /// Cancel an appointment. Allowed for the booking patient or the
    /// assigned doctor; idempotent when already cancelled; fails
    /// `Conflict` on a completed appointment.
    pub async fn cancel(&self, caller: Caller, appointment_id: Uuid) -> BookingResult<Appointment> {
        let appointment = self.appointments.find_by_id(appointment_id).await?;

        let authorized = match caller.role {
            Role::Patient => appointment.patient_id == caller.subject,
            Role::Doctor => appointment.doctor_id == caller.subject,
        };
        if !authorized {
            return Err(BookingError::NotAuthorized);
        }

        // Idempotent: a second cancellation leaves the record untouched.
        if appointment.status == AppointmentStatus::Cancelled {
            return Ok(appointment);
        }
        if !appointment.status.can_transition_to(AppointmentStatus::Cancelled) {
            return Err(BookingError::InvalidTransition {
                from: appointment.status,
                to: AppointmentStatus::Cancelled,
            });
        }

        let updated = self
            .appointments
            .update(
                appointment_id,
                AppointmentPatch {
                    status: Some(AppointmentStatus::Cancelled),
                    ..AppointmentPatch::default()
                },
            )
            .await?;
        tracing::info!(appointment_id = %appointment_id, by = %caller.subject, "appointment cancelled");
        Ok(updated)
    }
}
