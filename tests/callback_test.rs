use axum::http::StatusCode;
use wiremock::MockServer;

mod common;

async fn post_callback(body: &str) -> (StatusCode, String) {
    let server = MockServer::start().await;
    let app = common::test_app(&server.uri());
    common::send(&app, "POST", "/callback", Some(body)).await
}

#[tokio::test]
async fn test_successful_payment_is_acknowledged() {
    let (status, body) = post_callback(
        r#"{"Body":{"stkCallback":{"ResultCode":"0","ResultDesc":"ok","CheckoutRequestID":"abc"}}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Callback received");
}

#[tokio::test]
async fn test_declined_payment_is_acknowledged() {
    let (status, body) = post_callback(
        r#"{"Body":{"stkCallback":{"ResultCode":"1032","ResultDesc":"cancelled","CheckoutRequestID":"abc"}}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Callback received");
}

#[tokio::test]
async fn test_timeout_and_unknown_codes_are_acknowledged() {
    for code in ["1037", "1", "2001"] {
        let payload = format!(
            r#"{{"Body":{{"stkCallback":{{"ResultCode":"{}","ResultDesc":"x","CheckoutRequestID":"abc"}}}}}}"#,
            code
        );
        let (status, _) = post_callback(&payload).await;
        assert_eq!(status, StatusCode::OK, "code {}", code);
    }
}

#[tokio::test]
async fn test_daraja_payload_with_numeric_code_and_metadata() {
    let (status, _) = post_callback(
        r#"{
            "Body": {
                "stkCallback": {
                    "MerchantRequestID": "29115-34620561-1",
                    "CheckoutRequestID": "ws_CO_191220191020363925",
                    "ResultCode": 0,
                    "ResultDesc": "The service request is processed successfully.",
                    "CallbackMetadata": {
                        "Item": [
                            {"Name": "Amount", "Value": 1.00},
                            {"Name": "MpesaReceiptNumber", "Value": "NLJ7RT61SV"},
                            {"Name": "TransactionDate", "Value": 20191219102115},
                            {"Name": "PhoneNumber", "Value": 254708374149}
                        ]
                    }
                }
            }
        }"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_stk_callback_is_rejected() {
    let (status, body) = post_callback("{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid callback data");
}

#[tokio::test]
async fn test_incomplete_or_invalid_payloads_are_rejected() {
    for payload in [
        r#"{"Body":{}}"#,
        r#"{"Body":{"stkCallback":{"ResultDesc":"ok","CheckoutRequestID":"abc"}}}"#,
        r#"{"Body":{"stkCallback":{"ResultCode":"0","ResultDesc":"ok"}}}"#,
        "not json at all",
        "",
    ] {
        let (status, _) = post_callback(payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {:?}", payload);
    }
}
