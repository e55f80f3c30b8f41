//! Appointment and payment storage
//!
//! Repository traits decouple the workflows from the backing store.
//! The in-memory implementation keeps both collections behind one
//! `RwLock`: writers are serialized per store, readers take snapshot
//! reads, and the two-record payment completion happens under a single
//! write guard so no reader can observe a half-applied confirmation.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{BookingError, BookingResult};
use crate::models::{
    Appointment, AppointmentPatch, AppointmentStatus, NewAppointment, NewPayment, PaymentRecord,
    PaymentStatus,
};

/// Storage contract for appointment records.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Append a new appointment with a fresh id, `pending` status, and
    /// `pending` payment status.
    async fn create(&self, new: NewAppointment) -> BookingResult<Appointment>;
    async fn find_by_id(&self, id: Uuid) -> BookingResult<Appointment>;
    /// All appointments booked by the patient, insertion order preserved.
    async fn find_by_patient(&self, patient_id: Uuid) -> BookingResult<Vec<Appointment>>;
    /// All appointments assigned to the doctor, insertion order preserved.
    async fn find_by_doctor(&self, doctor_id: Uuid) -> BookingResult<Vec<Appointment>>;
    /// Merge the patch into the stored record and stamp the update time.
    ///
    /// The lifecycle rules are re-checked against the stored record inside
    /// the same critical section as the write, so a status change that
    /// raced past a workflow-level check still cannot leave a terminal
    /// status or rewind a completed payment: a table-invalid status patch
    /// fails `InvalidTransition`, a payment rollback fails `AlreadyPaid`.
    /// Patching a field to its current value is a timestamp-only no-op.
    async fn update(&self, id: Uuid, patch: AppointmentPatch) -> BookingResult<Appointment>;
}

/// Storage contract for payment records.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, new: NewPayment) -> BookingResult<PaymentRecord>;
    /// Find the payment matching both the appointment and the intent id.
    async fn find_by_intent(
        &self,
        appointment_id: Uuid,
        payment_intent_id: &str,
    ) -> BookingResult<PaymentRecord>;
    /// Complete a payment and its appointment in one logical operation:
    /// payment status -> `completed`, appointment payment status ->
    /// `completed`, appointment status -> `confirmed`. Implementations
    /// must not expose a state where only one record is updated, and must
    /// re-check eligibility on the stored records inside the same critical
    /// section: a terminal appointment fails `NotPayable`, an
    /// already-completed payment fails `AlreadyPaid`, regardless of what a
    /// caller observed before the write.
    async fn complete(
        &self,
        appointment_id: Uuid,
        payment_intent_id: &str,
    ) -> BookingResult<(PaymentRecord, Appointment)>;
}

#[derive(Default)]
struct LedgerInner {
    appointments: Vec<Appointment>,
    payments: Vec<PaymentRecord>,
}

/// In-memory store backing both repositories.
#[derive(Default, Clone)]
pub struct InMemoryBookingStore {
    inner: Arc<RwLock<LedgerInner>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryBookingStore {
    async fn create(&self, new: NewAppointment) -> BookingResult<Appointment> {
        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: new.patient_id,
            doctor_id: new.doctor_id,
            appointment_date: new.appointment_date,
            appointment_type: new.appointment_type,
            consultation_fee: new.consultation_fee,
            status: AppointmentStatus::Pending,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let mut inner = self.inner.write().await;
        inner.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn find_by_id(&self, id: Uuid) -> BookingResult<Appointment> {
        let inner = self.inner.read().await;
        inner
            .appointments
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(BookingError::AppointmentNotFound)
    }

    async fn find_by_patient(&self, patient_id: Uuid) -> BookingResult<Vec<Appointment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .appointments
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect())
    }

    async fn find_by_doctor(&self, doctor_id: Uuid) -> BookingResult<Vec<Appointment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, patch: AppointmentPatch) -> BookingResult<Appointment> {
        let mut inner = self.inner.write().await;
        let appointment = inner
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(BookingError::AppointmentNotFound)?;

        // Validate against the record as it is now, not as the caller saw
        // it: a check done on an earlier snapshot may have raced a
        // concurrent cancellation or completion.
        if let Some(status) = patch.status {
            if status != appointment.status && !appointment.status.can_transition_to(status) {
                return Err(BookingError::InvalidTransition {
                    from: appointment.status,
                    to: status,
                });
            }
        }
        if let Some(payment_status) = patch.payment_status {
            if appointment.payment_status == PaymentStatus::Completed
                && payment_status == PaymentStatus::Pending
            {
                return Err(BookingError::AlreadyPaid);
            }
        }

        if let Some(status) = patch.status {
            appointment.status = status;
        }
        if let Some(payment_status) = patch.payment_status {
            appointment.payment_status = payment_status;
        }
        appointment.updated_at = Utc::now();
        Ok(appointment.clone())
    }
}

#[async_trait]
impl PaymentRepository for InMemoryBookingStore {
    async fn create(&self, new: NewPayment) -> BookingResult<PaymentRecord> {
        let now = Utc::now();
        let payment = PaymentRecord {
            id: Uuid::new_v4(),
            appointment_id: new.appointment_id,
            payment_intent_id: new.payment_intent_id,
            amount: new.amount,
            status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let mut inner = self.inner.write().await;
        inner.payments.push(payment.clone());
        Ok(payment)
    }

    async fn find_by_intent(
        &self,
        appointment_id: Uuid,
        payment_intent_id: &str,
    ) -> BookingResult<PaymentRecord> {
        let inner = self.inner.read().await;
        inner
            .payments
            .iter()
            .find(|p| p.appointment_id == appointment_id && p.payment_intent_id == payment_intent_id)
            .cloned()
            .ok_or(BookingError::PaymentNotFound)
    }

    async fn complete(
        &self,
        appointment_id: Uuid,
        payment_intent_id: &str,
    ) -> BookingResult<(PaymentRecord, Appointment)> {
        // Single write guard over both collections: the two updates are
        // invisible to readers until the guard drops.
        let mut inner = self.inner.write().await;
        let now = Utc::now();

        let payment_index = inner
            .payments
            .iter()
            .position(|p| {
                p.appointment_id == appointment_id && p.payment_intent_id == payment_intent_id
            })
            .ok_or(BookingError::PaymentNotFound)?;
        let appointment_index = inner
            .appointments
            .iter()
            .position(|a| a.id == appointment_id)
            .ok_or(BookingError::AppointmentNotFound)?;

        // Eligibility re-checked under the same guard as the write, so a
        // cancellation that landed after the workflow's snapshot check
        // cannot be overwritten.
        if inner.payments[payment_index].status == PaymentStatus::Completed {
            return Err(BookingError::AlreadyPaid);
        }
        if inner.appointments[appointment_index].status.is_terminal() {
            return Err(BookingError::NotPayable);
        }

        {
            let payment = &mut inner.payments[payment_index];
            payment.status = PaymentStatus::Completed;
            payment.updated_at = now;
        }
        {
            let appointment = &mut inner.appointments[appointment_index];
            appointment.payment_status = PaymentStatus::Completed;
            appointment.status = AppointmentStatus::Confirmed;
            appointment.updated_at = now;
        }

        Ok((
            inner.payments[payment_index].clone(),
            inner.appointments[appointment_index].clone(),
        ))
    }
}
