use anyhow::Result;
use std::sync::Arc;

use auth_identity::{
    DoctorDirectory, IdentityConfig, IdentityService, InMemoryDoctorDirectory,
    InMemoryUserRepository,
};
use booking_service::{
    BookingWorkflow, InMemoryBookingStore, PaymentProcessor, PaymentWorkflow, SimulatedProcessor,
};

/// Main CareBook server state
#[derive(Clone)]
pub struct CareBookServer {
    /// Server configuration
    pub config: ServerConfig,
    /// Identity service (registration, login, token verification)
    pub identity: Arc<IdentityService>,
    /// Public doctor directory
    pub directory: Arc<dyn DoctorDirectory>,
    /// Booking workflow over the appointment store
    pub booking: Arc<BookingWorkflow>,
    /// Payment workflow over the payment store and processor
    pub payments: Arc<PaymentWorkflow>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server name
    pub name: String,
    /// Address the HTTP listener binds to
    pub bind_addr: String,
    /// HS256 signing secret for bearer tokens
    pub jwt_secret: String,
    /// Issuer claim for bearer tokens
    pub jwt_issuer: String,
    /// Token lifetime in days
    pub token_ttl_days: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "CareBook Engine".to_string(),
            bind_addr: "0.0.0.0:5000".to_string(),
            jwt_secret: "secret".to_string(),
            jwt_issuer: "carebook".to_string(),
            token_ttl_days: 30,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to
    /// the defaults above.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            name: std::env::var("CAREBOOK_NAME").unwrap_or(defaults.name),
            bind_addr: std::env::var("CAREBOOK_BIND_ADDR").unwrap_or(defaults.bind_addr),
            jwt_secret: std::env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            jwt_issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.jwt_issuer),
            token_ttl_days: std::env::var("JWT_TTL_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.token_ttl_days),
        }
    }
}

impl CareBookServer {
    /// Create a server instance backed by the in-memory stores with the
    /// demo doctor catalog seeded. This is the demo deployment; swapping
    /// in persistent repositories only changes this constructor.
    pub async fn new_in_memory(config: ServerConfig) -> Result<Self> {
        let identity_config = IdentityConfig {
            jwt_secret: config.jwt_secret.clone(),
            jwt_issuer: config.jwt_issuer.clone(),
            token_ttl_days: config.token_ttl_days,
            ..IdentityConfig::default()
        };
        let identity = Arc::new(IdentityService::new(
            Arc::new(InMemoryUserRepository::new()),
            identity_config,
        ));

        let directory: Arc<dyn DoctorDirectory> =
            Arc::new(InMemoryDoctorDirectory::with_seed_catalog().await);

        let store = Arc::new(InMemoryBookingStore::new());
        let processor: Arc<dyn PaymentProcessor> = Arc::new(SimulatedProcessor::new());
        let booking = Arc::new(BookingWorkflow::new(store.clone()));
        let payments = Arc::new(PaymentWorkflow::new(store.clone(), store, processor));

        tracing::info!(name = %config.name, "server state initialized");
        Ok(Self { config, identity, directory, booking, payments })
    }
}

impl std::fmt::Debug for CareBookServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CareBookServer")
            .field("config", &self.config)
            .finish()
    }
}
