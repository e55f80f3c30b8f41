/// Identity service configuration
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// HS256 signing secret for issued tokens
    pub jwt_secret: String,
    /// `iss` claim stamped into and required from every token
    pub jwt_issuer: String,
    /// Token lifetime in days
    pub token_ttl_days: i64,
    /// Minimum accepted password length
    pub password_min_length: usize,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "secret".to_string(),
            jwt_issuer: "carebook".to_string(),
            token_ttl_days: 30,
            password_min_length: 8,
        }
    }
}
