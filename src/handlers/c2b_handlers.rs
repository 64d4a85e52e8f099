// handlers/c2b_handlers.rs
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};

use crate::models::mpesa::AckResponse;
use crate::state::AppState;

pub async fn register_url(State(state): State<AppState>) -> Response {
    let mpesa_service = &state.mpesa_service;

    let access_token = match mpesa_service.get_access_token().await {
        Ok(token) => token,
        Err(e) => {
            error!("Access Token Error (C2B): {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to get access token for C2B",
            )
                .into_response();
        }
    };

    match mpesa_service.register_urls(&access_token).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            error!("C2B Register Error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "C2B URL registration failed").into_response()
        }
    }
}

pub async fn confirmation_callback(body: Bytes) -> impl IntoResponse {
    info!("Confirmation Callback: {}", describe_body(&body));
    (StatusCode::OK, Json(AckResponse::success()))
}

pub async fn validation_callback(body: Bytes) -> impl IntoResponse {
    info!("Validation Callback: {}", describe_body(&body));
    (StatusCode::OK, Json(AckResponse::success()))
}

fn describe_body(body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(json) => json.to_string(),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}
