#![allow(dead_code)]

use std::collections::HashMap;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use mpesa_gateway::{config::AppConfig, routes::build_router, state::AppState};
use serde_json::json;
use tower::util::ServiceExt;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

pub const CONSUMER_KEY: &str = "test_consumer_key";
pub const CONSUMER_SECRET: &str = "test_consumer_secret";
pub const ACCESS_TOKEN: &str = "c9SQxWWhmdVRlyh0zh8gZDTkubVF";

pub fn test_config(base_url: &str) -> AppConfig {
    let vars: HashMap<&str, String> = [
        ("CONSUMER_KEY", CONSUMER_KEY.to_string()),
        ("CONSUMER_SECRET", CONSUMER_SECRET.to_string()),
        ("BUSINESS_SHORT_CODE", "174379".to_string()),
        ("PASSKEY", "testpass".to_string()),
        ("PHONE_NUMBER", "254708374149".to_string()),
        ("CALLBACK_URL", "https://merchant.example.com".to_string()),
        ("MPESA_BASE_URL", base_url.to_string()),
    ]
    .into_iter()
    .collect();

    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("test config")
}

pub fn test_app(base_url: &str) -> Router {
    let state = AppState::new(test_config(base_url)).expect("app state");
    build_router(state)
}

pub async fn mount_oauth_token(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/oauth/v1/generate"))
        .and(query_param("grant_type", "client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token,
            "expires_in": "3599"
        })))
        .mount(server)
        .await;
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, String::from_utf8(bytes.to_vec()).unwrap())
}
