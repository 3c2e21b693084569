//! Client configuration

use rust_decimal::Decimal;

use crate::pricing::default_vat_rate;

/// Client configuration for connecting to the order-management backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// ISO currency code stamped on every order
    pub currency: String,

    /// VAT rate applied to vatable lines (fraction, e.g. 0.16)
    pub vat_rate: Decimal,
}

impl ClientConfig {
    /// Create a new configuration with default timeout, currency and VAT rate
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            currency: "MXN".to_string(),
            vat_rate: default_vat_rate(),
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the currency code
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Override the VAT rate (fraction, e.g. 0.16 for 16%)
    pub fn with_vat_rate(mut self, rate: Decimal) -> Self {
        self.vat_rate = rate;
        self
    }

    /// Create an HTTP backend from this configuration
    pub fn build_backend(&self) -> crate::HttpBackend {
        crate::HttpBackend::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
