// handlers/mpesa_handlers.rs
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::mpesa::{CallbackOutcome, StkCallback, StkCallbackEnvelope};
use crate::services::mpesa_service::generate_timestamp;
use crate::state::AppState;

pub const STK_PUSH_ACCEPTED: &str =
    "Request is successful. Please enter M-Pesa PIN to complete the transaction";

pub async fn root_handler() -> &'static str {
    info!("Timestamp: {}", generate_timestamp());
    "MPESA integration with Rust"
}

// STK Push Handlers
pub async fn initiate_stk_push(State(state): State<AppState>) -> Response {
    let mpesa_service = &state.mpesa_service;

    let access_token = match mpesa_service.get_access_token().await {
        Ok(token) => token,
        Err(e) => {
            error!("Access Token Error: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to get access token").into_response();
        }
    };

    match mpesa_service.initiate_stk_push(&access_token).await {
        Ok(_) => (StatusCode::OK, STK_PUSH_ACCEPTED).into_response(),
        Err(e) => {
            error!("STK Push Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "STK Push request failed").into_response()
        }
    }
}

pub async fn mpesa_callback(body: Bytes) -> Result<impl IntoResponse, AppError> {
    let envelope: StkCallbackEnvelope = serde_json::from_slice(&body).map_err(|e| {
        warn!(
            "Invalid callback data received: {} - {}",
            e,
            String::from_utf8_lossy(&body)
        );
        AppError::invalid_data(format!("Invalid STK callback: {}", e))
    })?;

    let callback = envelope.body.stk_callback;
    let outcome = log_outcome(&callback);
    info!(
        checkout_request_id = %callback.checkout_request_id,
        outcome = outcome.as_str(),
        "STK callback acknowledged"
    );

    Ok((StatusCode::OK, "Callback received"))
}

fn log_outcome(callback: &StkCallback) -> CallbackOutcome {
    let outcome = callback.outcome();
    let headline = outcome_headline(outcome, &callback.checkout_request_id);

    match outcome {
        CallbackOutcome::Success => {
            info!("{}", headline);
            info!(
                merchant_request_id = ?callback.merchant_request_id,
                amount = ?callback.metadata_value("Amount"),
                receipt = ?callback.metadata_value("MpesaReceiptNumber"),
                phone = ?callback.metadata_value("PhoneNumber"),
                "Details: {}",
                callback.result_desc
            );
        }
        CallbackOutcome::DeclinedByCustomer | CallbackOutcome::TimedOut => {
            warn!("{}", headline);
            warn!("Reason: {}", callback.result_desc);
        }
        CallbackOutcome::Failed => {
            warn!("{}", headline);
            warn!("ResultCode: {} Reason: {}", callback.result_code, callback.result_desc);
        }
    }

    outcome
}

fn outcome_headline(outcome: CallbackOutcome, checkout_id: &str) -> String {
    match outcome {
        CallbackOutcome::Success => {
            format!("✅ Transaction successful for CheckoutRequestID: {}", checkout_id)
        }
        CallbackOutcome::DeclinedByCustomer => {
            format!("❌ Transaction declined by customer for CheckoutRequestID: {}", checkout_id)
        }
        CallbackOutcome::TimedOut => {
            format!("⏳ Transaction timed out for CheckoutRequestID: {}", checkout_id)
        }
        CallbackOutcome::Failed => {
            format!("⚠️ Transaction failed for CheckoutRequestID: {}", checkout_id)
        }
    }
}
