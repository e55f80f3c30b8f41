//! External payment processor capability
//!
//! The workflow talks to the processor through a trait so a real network
//! client and the in-process simulator are interchangeable. The simulator
//! mirrors the hosted processor's intent shape (`pi_*` ids, a
//! `*_secret_*` client secret) and never injects failures; fault
//! behavior belongs to the implementation chosen at wiring time, not the
//! domain core.

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

use crate::error::{BookingError, BookingResult};

/// An intent minted by the processor for a pending charge.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    /// Opaque correlation token, e.g. `pi_6f0c…`
    pub intent_id: String,
    /// Client-facing secret handed to the payment form
    pub client_secret: String,
    /// Amount in integer minor currency units
    pub amount_minor: i64,
    pub currency: String,
}

/// Outbound boundary to the payment processor.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create an intent for the given amount in minor units.
    async fn create_intent(&self, amount_minor: i64, currency: &str)
        -> BookingResult<PaymentIntent>;

    /// Confirm a previously created intent.
    async fn confirm_intent(&self, intent_id: &str) -> BookingResult<()>;
}

/// Deterministic in-process processor used by the demo deployment and
/// the test suite.
#[derive(Default)]
pub struct SimulatedProcessor;

impl SimulatedProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedProcessor {
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> BookingResult<PaymentIntent> {
        if amount_minor <= 0 {
            return Err(BookingError::Processor(format!(
                "refusing non-positive amount {amount_minor}"
            )));
        }

        let intent_id = format!("pi_{}", Uuid::new_v4().simple());
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();
        let client_secret = format!("{intent_id}_secret_{nonce}");

        tracing::debug!(intent_id = %intent_id, amount_minor, currency, "minted simulated intent");
        Ok(PaymentIntent {
            intent_id,
            client_secret,
            amount_minor,
            currency: currency.to_string(),
        })
    }

    async fn confirm_intent(&self, intent_id: &str) -> BookingResult<()> {
        tracing::debug!(intent_id = %intent_id, "confirmed simulated intent");
        Ok(())
    }
}
