// config.rs
use std::env;
use std::time::Duration;

use crate::errors::{AppError, Result};

const SANDBOX_BASE_URL: &str = "https://sandbox.safaricom.co.ke";
const PRODUCTION_BASE_URL: &str = "https://api.safaricom.co.ke";

const DEFAULT_AMOUNT: &str = "1";
const DEFAULT_ACCOUNT_REFERENCE: &str = "Kelvin Carter";
const DEFAULT_TRANSACTION_DESC: &str = "Mpesa Daraja API STK Push Demo";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub hostname: String,
    pub callback_url: String,
    pub mpesa_consumer_key: String,
    pub mpesa_consumer_secret: String,
    pub mpesa_short_code: String,
    pub mpesa_passkey: String,
    pub phone_number: String,
    pub mpesa_environment: String,
    /// Overrides the host picked from `mpesa_environment`.
    pub mpesa_base_url: Option<String>,
    pub http_timeout: Option<Duration>,
    pub stk_amount: String,
    pub stk_account_reference: String,
    pub stk_transaction_desc: String,
}

/// Daraja endpoints resolved against the configured host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MpesaUrls {
    pub auth_url: String,
    pub stk_push_url: String,
    pub register_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Credentials are not checked
    /// here; Daraja rejects the call if they are missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                AppError::configuration(format!("PORT must be a number, got {:?}: {}", raw, e))
            })?,
            None => 2000,
        };

        let http_timeout = match lookup("MPESA_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    AppError::configuration(format!(
                        "MPESA_HTTP_TIMEOUT_SECS must be a number of seconds, got {:?}: {}",
                        raw, e
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(AppConfig {
            port,
            hostname: lookup("HOSTNAME").unwrap_or_else(|| "localhost".to_string()),
            callback_url: lookup("CALLBACK_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            mpesa_consumer_key: lookup("CONSUMER_KEY").unwrap_or_default(),
            mpesa_consumer_secret: lookup("CONSUMER_SECRET").unwrap_or_default(),
            mpesa_short_code: lookup("BUSINESS_SHORT_CODE").unwrap_or_default(),
            mpesa_passkey: lookup("PASSKEY").unwrap_or_default(),
            phone_number: lookup("PHONE_NUMBER").unwrap_or_default(),
            mpesa_environment: lookup("MPESA_ENVIRONMENT")
                .unwrap_or_else(|| "sandbox".to_string()),
            mpesa_base_url: lookup("MPESA_BASE_URL")
                .filter(|url| !url.trim().is_empty())
                .map(|url| url.trim_end_matches('/').to_string()),
            http_timeout,
            stk_amount: lookup("STK_AMOUNT").unwrap_or_else(|| DEFAULT_AMOUNT.to_string()),
            stk_account_reference: lookup("STK_ACCOUNT_REFERENCE")
                .unwrap_or_else(|| DEFAULT_ACCOUNT_REFERENCE.to_string()),
            stk_transaction_desc: lookup("STK_TRANSACTION_DESC")
                .unwrap_or_else(|| DEFAULT_TRANSACTION_DESC.to_string()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.mpesa_environment == "production"
    }

    pub fn base_url(&self) -> &str {
        match &self.mpesa_base_url {
            Some(url) => url,
            None if self.is_production() => PRODUCTION_BASE_URL,
            None => SANDBOX_BASE_URL,
        }
    }

    pub fn get_mpesa_urls(&self) -> MpesaUrls {
        let base_url = self.base_url();

        MpesaUrls {
            auth_url: format!("{}/oauth/v1/generate?grant_type=client_credentials", base_url),
            stk_push_url: format!("{}/mpesa/stkpush/v1/processrequest", base_url),
            register_url: format!("{}/mpesa/c2b/v1/registerurl", base_url),
        }
    }

    /// Public URL Daraja should call back on, e.g. `callback_endpoint("callback")`.
    pub fn callback_endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.callback_url, path.trim_start_matches('/'))
    }

    pub fn get_config_info(&self) -> serde_json::Value {
        serde_json::json!({
            "environment": self.mpesa_environment,
            "is_production": self.is_production(),
            "base_url": self.base_url(),
            "business_shortcode": self.mpesa_short_code,
            "callback_url": self.callback_url,
            "consumer_key_set": !self.mpesa_consumer_key.is_empty(),
            "consumer_secret_set": !self.mpesa_consumer_secret.is_empty(),
            "passkey_set": !self.mpesa_passkey.is_empty(),
            "http_timeout_secs": self.http_timeout.map(|t| t.as_secs()),
            "port": self.port,
            "hostname": self.hostname,
        })
    }
}
