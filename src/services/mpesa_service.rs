// services/mpesa_service.rs
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as base64, Engine as _};
use chrono::Local;
use reqwest::{header, Client, Response};
use serde_json::Value;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::mpesa::{AuthResponse, RegisterUrlRequest, StkPushRequest};

const TRANSACTION_TYPE: &str = "CustomerPayBillOnline";
const RESPONSE_TYPE: &str = "Completed";

/// Talks to the Daraja API. Every call fetches its own token; nothing is
/// cached between requests.
#[derive(Debug, Clone)]
pub struct MpesaService {
    config: Arc<AppConfig>,
    client: Client,
}

impl MpesaService {
    pub fn new(config: Arc<AppConfig>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(MpesaService { config, client })
    }

    pub async fn get_access_token(&self) -> Result<String> {
        info!("Requesting new access token");
        let auth_string = format!(
            "{}:{}",
            self.config.mpesa_consumer_key, self.config.mpesa_consumer_secret
        );
        let encoded_auth = base64.encode(auth_string);

        let auth_url = self.config.get_mpesa_urls().auth_url;

        let response = self
            .client
            .get(&auth_url)
            .header(header::AUTHORIZATION, format!("Basic {}", encoded_auth))
            .send()
            .await?;

        let response = ensure_success(response, "M-Pesa auth").await?;
        let body = response.text().await?;

        let auth_response: AuthResponse = serde_json::from_str(&body).map_err(|e| {
            error!("OAuth response was not JSON: {} - {}", e, body);
            AppError::auth(format!("OAuth response was not valid JSON: {}", e))
        })?;

        match auth_response.access_token.filter(|token| !token.is_empty()) {
            Some(token) => {
                info!(expires_in = ?auth_response.expires_in, "Access token obtained");
                Ok(token)
            }
            None => {
                error!("No access token in OAuth response: {}", body);
                Err(AppError::auth("No access token in OAuth response"))
            }
        }
    }

    pub fn build_stk_push_request(&self, timestamp: String) -> StkPushRequest {
        let phone = format_phone_number(&self.config.phone_number);
        let password = generate_password(
            &self.config.mpesa_short_code,
            &self.config.mpesa_passkey,
            &timestamp,
        );

        StkPushRequest {
            business_short_code: self.config.mpesa_short_code.clone(),
            password,
            timestamp,
            transaction_type: TRANSACTION_TYPE.to_string(),
            amount: self.config.stk_amount.clone(),
            party_a: phone.clone(),
            party_b: self.config.mpesa_short_code.clone(),
            phone_number: phone,
            callback_url: self.config.callback_endpoint("callback"),
            account_reference: self.config.stk_account_reference.clone(),
            transaction_desc: self.config.stk_transaction_desc.clone(),
        }
    }

    /// Sends the STK push and returns Daraja's acknowledgement body. The
    /// payment result arrives later on `/callback`.
    pub async fn initiate_stk_push(&self, access_token: &str) -> Result<Value> {
        let stk_request = self.build_stk_push_request(generate_timestamp());
        info!(
            "STK push for {} - KSh {}",
            stk_request.phone_number, stk_request.amount
        );

        let stk_url = self.config.get_mpesa_urls().stk_push_url;
        let response = self
            .client
            .post(&stk_url)
            .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&stk_request)
            .send()
            .await?;

        let response = ensure_success(response, "STK push").await?;
        let body = read_body(response).await?;

        match body.get("CheckoutRequestID").and_then(Value::as_str) {
            Some(checkout_id) => info!(checkout_request_id = checkout_id, "STK Push Response: {}", body),
            None => info!("STK Push Response: {}", body),
        }
        Ok(body)
    }

    pub fn build_register_url_request(&self) -> RegisterUrlRequest {
        RegisterUrlRequest {
            short_code: self.config.mpesa_short_code.clone(),
            response_type: RESPONSE_TYPE.to_string(),
            confirmation_url: self.config.callback_endpoint("confirmation"),
            validation_url: self.config.callback_endpoint("validation"),
        }
    }

    pub async fn register_urls(&self, access_token: &str) -> Result<Value> {
        let register_request = self.build_register_url_request();
        info!(
            "C2B: registering {} and {}",
            register_request.confirmation_url, register_request.validation_url
        );

        let register_url = self.config.get_mpesa_urls().register_url;
        let response = self
            .client
            .post(&register_url)
            .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&register_request)
            .send()
            .await?;

        let response = ensure_success(response, "C2B register").await?;
        let body = read_body(response).await?;
        info!("C2B Register Response: {}", body);
        Ok(body)
    }
}

async fn ensure_success(response: Response, operation: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    error!("{} failed: {} - {}", operation, status, body);
    Err(AppError::network(format!("{} failed: {}", operation, status)))
}

/// Parses the body as JSON, keeping it as a JSON string when it is not.
async fn read_body(response: Response) -> Result<Value> {
    let text = response.text().await?;
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

pub fn generate_timestamp() -> String {
    Local::now().format("%Y%m%d%H%M%S").to_string()
}

pub fn generate_password(short_code: &str, passkey: &str, timestamp: &str) -> String {
    base64.encode(format!("{}{}{}", short_code, passkey, timestamp))
}

pub fn format_phone_number(phone: &str) -> String {
    let phone = phone.trim().trim_start_matches('+');
    if phone.starts_with("254") && phone.len() == 12 {
        return phone.to_string();
    }
    if phone.starts_with("07") && phone.len() == 10 {
        return format!("254{}", &phone[1..]);
    }
    if phone.starts_with('7') && phone.len() == 9 {
        return format!("254{}", phone);
    }
    phone.to_string()
}
