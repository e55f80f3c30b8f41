use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of an authenticated caller as seen by the booking workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
}

/// Authenticated caller: subject id plus role, derived per request from
/// the presented credential. Authorization decisions key off this pair.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub subject: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn patient(subject: Uuid) -> Self {
        Self { subject, role: Role::Patient }
    }

    pub fn doctor(subject: Uuid) -> Self {
        Self { subject, role: Role::Doctor }
    }
}

/// Appointment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Whether a transition to `next` is allowed by the lifecycle table.
    ///
    /// `pending -> confirmed -> completed`, with `cancelled` reachable from
    /// either non-terminal status. `completed` and `cancelled` are terminal.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        self.valid_transitions().contains(&next)
    }

    /// All statuses reachable from the current one.
    pub fn valid_transitions(self) -> &'static [AppointmentStatus] {
        match self {
            AppointmentStatus::Pending => {
                &[AppointmentStatus::Confirmed, AppointmentStatus::Cancelled]
            }
            AppointmentStatus::Confirmed => {
                &[AppointmentStatus::Completed, AppointmentStatus::Cancelled]
            }
            AppointmentStatus::Completed | AppointmentStatus::Cancelled => &[],
        }
    }

    pub fn is_terminal(self) -> bool {
        self.valid_transitions().is_empty()
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppointmentStatus::Pending => f.write_str("pending"),
            AppointmentStatus::Confirmed => f.write_str("confirmed"),
            AppointmentStatus::Completed => f.write_str("completed"),
            AppointmentStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Payment status of an appointment or payment record.
///
/// Transitions only `pending -> completed`, never backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
}

/// Kind of consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentKind {
    #[serde(rename = "in-person")]
    InPerson,
    #[serde(rename = "virtual")]
    Virtual,
}

/// A scheduled consultation between a patient and a doctor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub appointment_type: AppointmentKind,
    pub consultation_fee: Decimal,
    pub status: AppointmentStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an appointment. The patient id comes from the
/// caller's credential, never from the client payload.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub appointment_type: AppointmentKind,
    pub consultation_fee: Decimal,
}

/// Partial update merged into a stored appointment.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppointmentPatch {
    pub status: Option<AppointmentStatus>,
    pub payment_status: Option<PaymentStatus>,
}

/// Provisional record correlating an appointment to an external payment
/// processor transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub payment_intent_id: String,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for storing a freshly minted payment intent.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub appointment_id: Uuid,
    pub payment_intent_id: String,
    pub amount: Decimal,
}
