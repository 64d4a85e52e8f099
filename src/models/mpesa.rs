use serde::{Deserialize, Deserializer, Serialize};

// Outbound Structs
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct StkPushRequest {
    #[serde(rename = "BusinessShortCode")]
    pub business_short_code: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "TransactionType")]
    pub transaction_type: String,
    #[serde(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "PartyA")]
    pub party_a: String,
    #[serde(rename = "PartyB")]
    pub party_b: String,
    #[serde(rename = "PhoneNumber")]
    pub phone_number: String,
    #[serde(rename = "CallBackURL")]
    pub callback_url: String,
    #[serde(rename = "AccountReference")]
    pub account_reference: String,
    #[serde(rename = "TransactionDesc")]
    pub transaction_desc: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterUrlRequest {
    #[serde(rename = "ShortCode")]
    pub short_code: String,
    #[serde(rename = "ResponseType")]
    pub response_type: String,
    #[serde(rename = "ConfirmationURL")]
    pub confirmation_url: String,
    #[serde(rename = "ValidationURL")]
    pub validation_url: String,
}

// STK Callback
#[derive(Debug, Deserialize)]
pub struct StkCallbackEnvelope {
    #[serde(rename = "Body")]
    pub body: CallbackBody,
}

#[derive(Debug, Deserialize)]
pub struct CallbackBody {
    #[serde(rename = "stkCallback")]
    pub stk_callback: StkCallback,
}

#[derive(Debug, Deserialize)]
pub struct StkCallback {
    #[serde(rename = "MerchantRequestID", default)]
    pub merchant_request_id: Option<String>,

    #[serde(rename = "CheckoutRequestID")]
    pub checkout_request_id: String,

    #[serde(rename = "ResultCode", deserialize_with = "deserialize_result_code")]
    pub result_code: String,

    #[serde(rename = "ResultDesc")]
    pub result_desc: String,

    #[serde(rename = "CallbackMetadata", default)]
    pub callback_metadata: Option<CallbackMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackMetadata {
    #[serde(rename = "Item", default)]
    pub items: Vec<CallbackItem>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackItem {
    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(rename = "Value", default)]
    pub value: Option<serde_json::Value>,
}

impl StkCallback {
    pub fn outcome(&self) -> CallbackOutcome {
        CallbackOutcome::classify(&self.result_code)
    }

    pub fn metadata_value(&self, name: &str) -> Option<&serde_json::Value> {
        self.callback_metadata
            .as_ref()?
            .items
            .iter()
            .find(|item| item.name == name)?
            .value
            .as_ref()
    }
}

/// Daraja sends `ResultCode` as a number, but string codes are accepted too.
fn deserialize_result_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCode {
        Text(String),
        Number(i64),
    }

    Ok(match RawCode::deserialize(deserializer)? {
        RawCode::Text(code) => code.trim().to_string(),
        RawCode::Number(code) => code.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOutcome {
    Success,
    DeclinedByCustomer,
    TimedOut,
    Failed,
}

impl CallbackOutcome {
    pub fn classify(result_code: &str) -> Self {
        match result_code {
            "0" => CallbackOutcome::Success,
            "1032" => CallbackOutcome::DeclinedByCustomer,
            "1037" => CallbackOutcome::TimedOut,
            _ => CallbackOutcome::Failed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackOutcome::Success => "success",
            CallbackOutcome::DeclinedByCustomer => "declined_by_customer",
            CallbackOutcome::TimedOut => "timed_out",
            CallbackOutcome::Failed => "failed",
        }
    }
}

// C2B acknowledgement
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AckResponse {
    #[serde(rename = "ResultCode")]
    pub result_code: String,
    #[serde(rename = "ResultDesc")]
    pub result_desc: String,
}

impl AckResponse {
    pub fn success() -> Self {
        AckResponse {
            result_code: "0".to_string(),
            result_desc: "Success".to_string(),
        }
    }
}
