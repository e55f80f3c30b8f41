//! Payment workflow
//!
//! Mints payment intents against the external processor and confirms
//! them. The amount is derived from the appointment's stored fee,
//! converted to integer minor units for the processor and back to
//! decimal for the stored record; the conversion is exact or it fails.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{BookingError, BookingResult};
use crate::models::{Appointment, Caller, NewPayment, PaymentStatus, Role};
use crate::processor::PaymentProcessor;
use crate::store::{AppointmentRepository, PaymentRepository};

/// Minor units per major currency unit (cents per dollar).
const MINOR_UNITS: i64 = 100;

/// Result of minting an intent; only the client secret is exposed.
#[derive(Debug, Clone)]
pub struct CreatedIntent {
    pub client_secret: String,
}

pub struct PaymentWorkflow {
    appointments: Arc<dyn AppointmentRepository>,
    payments: Arc<dyn PaymentRepository>,
    processor: Arc<dyn PaymentProcessor>,
    currency: String,
}

impl PaymentWorkflow {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        payments: Arc<dyn PaymentRepository>,
        processor: Arc<dyn PaymentProcessor>,
    ) -> Self {
        Self {
            appointments,
            payments,
            processor,
            currency: "usd".to_string(),
        }
    }

    /// Mint a payment intent for the appointment's fee.
    ///
    /// Patient role, bound patient only. Fails `AlreadyPaid` when the
    /// appointment's payment status is already completed.
    pub async fn create_intent(
        &self,
        caller: Caller,
        appointment_id: Uuid,
    ) -> BookingResult<CreatedIntent> {
        let appointment = self.authorize_patient(caller, appointment_id).await?;

        if appointment.payment_status == PaymentStatus::Completed {
            return Err(BookingError::AlreadyPaid);
        }

        let amount_minor = to_minor_units(appointment.consultation_fee)?;
        let intent = self
            .processor
            .create_intent(amount_minor, &self.currency)
            .await?;

        self.payments
            .create(NewPayment {
                appointment_id,
                payment_intent_id: intent.intent_id.clone(),
                amount: from_minor_units(intent.amount_minor),
            })
            .await?;

        tracing::info!(
            appointment_id = %appointment_id,
            intent_id = %intent.intent_id,
            amount_minor,
            "payment intent created"
        );
        Ok(CreatedIntent { client_secret: intent.client_secret })
    }

    /// Confirm a payment.
    ///
    /// On success the payment record, the appointment's payment status,
    /// and the appointment status are updated in one logical operation;
    /// a concurrent reader never observes a partial confirmation.
    pub async fn confirm(
        &self,
        caller: Caller,
        appointment_id: Uuid,
        payment_intent_id: &str,
    ) -> BookingResult<Appointment> {
        let appointment = self.authorize_patient(caller, appointment_id).await?;
        if appointment.status.is_terminal() {
            return Err(BookingError::NotPayable);
        }

        let payment = self
            .payments
            .find_by_intent(appointment_id, payment_intent_id)
            .await?;
        if payment.status == PaymentStatus::Completed {
            return Err(BookingError::AlreadyPaid);
        }

        self.processor.confirm_intent(payment_intent_id).await?;
        let (_, appointment) = self
            .payments
            .complete(appointment_id, payment_intent_id)
            .await?;

        tracing::info!(
            appointment_id = %appointment_id,
            intent_id = %payment_intent_id,
            "payment confirmed"
        );
        Ok(appointment)
    }

    async fn authorize_patient(
        &self,
        caller: Caller,
        appointment_id: Uuid,
    ) -> BookingResult<Appointment> {
        if caller.role != Role::Patient {
            return Err(BookingError::NotAuthorized);
        }
        let appointment = self.appointments.find_by_id(appointment_id).await?;
        if appointment.patient_id != caller.subject {
            return Err(BookingError::NotAuthorized);
        }
        Ok(appointment)
    }
}

/// Convert a decimal fee to integer minor units, failing on sub-cent
/// amounts so the round trip stays exact.
pub fn to_minor_units(amount: Decimal) -> BookingResult<i64> {
    let scaled = amount * Decimal::from(MINOR_UNITS);
    if scaled.fract() != Decimal::ZERO {
        return Err(BookingError::Validation(format!(
            "amount {amount} is not representable in minor units"
        )));
    }
    scaled
        .to_i64()
        .ok_or_else(|| BookingError::Validation(format!("amount {amount} out of range")))
}

/// Convert integer minor units back to a decimal amount.
pub fn from_minor_units(amount_minor: i64) -> Decimal {
    Decimal::new(amount_minor, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentKind, AppointmentStatus};
    use crate::processor::SimulatedProcessor;
    use crate::store::InMemoryBookingStore;
    use crate::workflow::{BookingRequest, BookingWorkflow};
    use chrono::Utc;
    use std::str::FromStr;

    struct Fixture {
        booking: BookingWorkflow,
        payments: PaymentWorkflow,
        store: Arc<InMemoryBookingStore>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryBookingStore::new());
        let booking = BookingWorkflow::new(store.clone());
        let payments = PaymentWorkflow::new(
            store.clone(),
            store.clone(),
            Arc::new(SimulatedProcessor::new()),
        );
        Fixture { booking, payments, store }
    }

    fn request(doctor: Uuid, fee: Decimal) -> BookingRequest {
        BookingRequest {
            doctor_id: doctor,
            appointment_date: Utc::now(),
            appointment_type: AppointmentKind::InPerson,
            consultation_fee: fee,
        }
    }

    fn intent_id_of(client_secret: &str) -> &str {
        client_secret
            .split("_secret_")
            .next()
            .unwrap_or(client_secret)
    }

    #[test]
    fn minor_unit_conversion_round_trips_integral_cents() {
        for (text, minor) in [("150.00", 15000), ("99.99", 9999), ("0.01", 1)] {
            let amount = Decimal::from_str(text).unwrap();
            let converted = to_minor_units(amount).unwrap();
            assert_eq!(converted, minor);
            assert_eq!(from_minor_units(converted), amount);
        }
    }

    #[test]
    fn sub_cent_amounts_are_rejected() {
        let amount = Decimal::from_str("10.005").unwrap();
        assert!(matches!(
            to_minor_units(amount),
            Err(BookingError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn full_booking_and_payment_scenario() {
        let f = fixture();
        let patient = Uuid::new_v4();
        let doctor = Uuid::new_v4();

        // Patient books with fee 150.00
        let appointment = f
            .booking
            .create(
                Caller::patient(patient),
                request(doctor, Decimal::from_str("150.00").unwrap()),
            )
            .await
            .unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Pending);
        assert_eq!(appointment.payment_status, PaymentStatus::Pending);

        // Doctor confirms
        let confirmed = f
            .booking
            .set_status(Caller::doctor(doctor), appointment.id, AppointmentStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(confirmed.status, AppointmentStatus::Confirmed);
        assert_eq!(confirmed.payment_status, PaymentStatus::Pending);

        // Patient mints the intent: 150.00 -> 15000 minor units
        let intent = f
            .payments
            .create_intent(Caller::patient(patient), appointment.id)
            .await
            .unwrap();
        let intent_id = intent_id_of(&intent.client_secret).to_string();
        let record = f
            .store
            .find_by_intent(appointment.id, &intent_id)
            .await
            .unwrap();
        assert_eq!(record.amount, Decimal::from_str("150.00").unwrap());
        assert_eq!(to_minor_units(record.amount).unwrap(), 15000);

        // Patient confirms with the matching intent id
        let paid = f
            .payments
            .confirm(Caller::patient(patient), appointment.id, &intent_id)
            .await
            .unwrap();
        assert_eq!(paid.status, AppointmentStatus::Confirmed);
        assert_eq!(paid.payment_status, PaymentStatus::Completed);

        let stored_payment = f
            .store
            .find_by_intent(appointment.id, &intent_id)
            .await
            .unwrap();
        assert_eq!(stored_payment.status, PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn confirmation_is_atomic_for_readers() {
        let f = fixture();
        let patient = Uuid::new_v4();
        let appointment = f
            .booking
            .create(Caller::patient(patient), request(Uuid::new_v4(), Decimal::from(150)))
            .await
            .unwrap();
        let intent = f
            .payments
            .create_intent(Caller::patient(patient), appointment.id)
            .await
            .unwrap();
        let intent_id = intent_id_of(&intent.client_secret).to_string();

        let reader_store = f.store.clone();
        let appointment_id = appointment.id;
        let reader = tokio::spawn(async move {
            // Snapshot reads racing the confirmation must never observe
            // payment=completed with status!=confirmed or vice versa.
            for _ in 0..200 {
                let a = reader_store.find_by_id(appointment_id).await.unwrap();
                match (a.payment_status, a.status) {
                    (PaymentStatus::Pending, _) => {}
                    (PaymentStatus::Completed, AppointmentStatus::Confirmed) => {}
                    (payment, status) => {
                        panic!("observed partial confirmation: {payment:?}/{status}")
                    }
                }
                tokio::task::yield_now().await;
            }
        });

        f.payments
            .confirm(Caller::patient(patient), appointment.id, &intent_id)
            .await
            .unwrap();
        reader.await.unwrap();
    }

    #[tokio::test]
    async fn second_intent_after_completion_fails_already_paid() {
        let f = fixture();
        let patient = Uuid::new_v4();
        let appointment = f
            .booking
            .create(Caller::patient(patient), request(Uuid::new_v4(), Decimal::from(150)))
            .await
            .unwrap();
        let intent = f
            .payments
            .create_intent(Caller::patient(patient), appointment.id)
            .await
            .unwrap();
        let intent_id = intent_id_of(&intent.client_secret).to_string();
        f.payments
            .confirm(Caller::patient(patient), appointment.id, &intent_id)
            .await
            .unwrap();

        let again = f
            .payments
            .create_intent(Caller::patient(patient), appointment.id)
            .await;
        assert!(matches!(again, Err(BookingError::AlreadyPaid)));

        let reconfirm = f
            .payments
            .confirm(Caller::patient(patient), appointment.id, &intent_id)
            .await;
        assert!(matches!(reconfirm, Err(BookingError::AlreadyPaid)));
    }

    #[tokio::test]
    async fn only_the_bound_patient_may_pay() {
        let f = fixture();
        let patient = Uuid::new_v4();
        let appointment = f
            .booking
            .create(Caller::patient(patient), request(Uuid::new_v4(), Decimal::from(150)))
            .await
            .unwrap();

        let other = f
            .payments
            .create_intent(Caller::patient(Uuid::new_v4()), appointment.id)
            .await;
        assert!(matches!(other, Err(BookingError::NotAuthorized)));

        let doctor = f
            .payments
            .create_intent(Caller::doctor(appointment.doctor_id), appointment.id)
            .await;
        assert!(matches!(doctor, Err(BookingError::NotAuthorized)));
    }

    #[tokio::test]
    async fn unknown_appointment_or_intent_fails_not_found() {
        let f = fixture();
        let patient = Uuid::new_v4();

        let missing = f
            .payments
            .create_intent(Caller::patient(patient), Uuid::new_v4())
            .await;
        assert!(matches!(missing, Err(BookingError::AppointmentNotFound)));

        let appointment = f
            .booking
            .create(Caller::patient(patient), request(Uuid::new_v4(), Decimal::from(150)))
            .await
            .unwrap();
        let wrong_intent = f
            .payments
            .confirm(Caller::patient(patient), appointment.id, "pi_nope")
            .await;
        assert!(matches!(wrong_intent, Err(BookingError::PaymentNotFound)));
    }

    #[tokio::test]
    async fn cancelled_appointment_is_not_payable() {
        let f = fixture();
        let patient = Uuid::new_v4();
        let appointment = f
            .booking
            .create(Caller::patient(patient), request(Uuid::new_v4(), Decimal::from(150)))
            .await
            .unwrap();
        let intent = f
            .payments
            .create_intent(Caller::patient(patient), appointment.id)
            .await
            .unwrap();
        let intent_id = intent_id_of(&intent.client_secret).to_string();

        f.booking
            .cancel(Caller::patient(patient), appointment.id)
            .await
            .unwrap();

        let result = f
            .payments
            .confirm(Caller::patient(patient), appointment.id, &intent_id)
            .await;
        assert!(matches!(result, Err(BookingError::NotPayable)));
    }
}
