//! TwoTap request and response bodies.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use tapcart::fields::FieldsInput;

/// Status message while TwoTap is still working on a cart or purchase.
pub const STILL_PROCESSING: &str = "still_processing";

/// Status message once a cart has been processed.
pub const DONE: &str = "done";

/// A cart or purchase status reported by TwoTap.
pub trait StatusMessage {
    fn message(&self) -> &str;

    fn is_still_processing(&self) -> bool {
        self.message() == STILL_PROCESSING
    }

    fn is_done(&self) -> bool {
        self.message() == DONE
    }
}

/// `POST /v1.0/cart` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartRequest {
    pub products: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_url: Option<String>,
}

/// Cart status, as returned by the cart endpoints and the `cart_finished` callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartStatus {
    #[serde(deserialize_with = "id_string")]
    pub cart_id: String,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Cart sites, left untyped until fields input is synthesized from them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sites: Option<Value>,

    /// Anything else TwoTap reports, such as `unknown_urls`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StatusMessage for CartStatus {
    fn message(&self) -> &str {
        &self.message
    }
}

/// SMS confirmation callbacks for a purchase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmSettings {
    pub method: String,
    pub phone: String,
    pub sms_confirm_url: String,
    pub sms_finished_url: String,
}

impl ConfirmSettings {
    #[must_use]
    pub fn sms(phone: &str, sms_confirm_url: &str, sms_finished_url: &str) -> Self {
        Self {
            method: "sms".to_owned(),
            phone: phone.to_owned(),
            sms_confirm_url: sms_confirm_url.to_owned(),
            sms_finished_url: sms_finished_url.to_owned(),
        }
    }
}

/// `POST /v1.0/purchase` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseRequest {
    pub cart_id: String,
    pub fields_input: FieldsInput,
    pub products: Vec<String>,
    pub confirm: ConfirmSettings,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_url: Option<String>,
}

/// Purchase status, as returned by the purchase endpoints and the
/// `purchase_finished` callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseStatus {
    #[serde(deserialize_with = "id_string")]
    pub purchase_id: String,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Anything else TwoTap reports, such as per-site order details.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StatusMessage for PurchaseStatus {
    fn message(&self) -> &str {
        &self.message
    }
}

/// `POST /v1.0/purchase/confirm` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmRequest {
    #[serde(deserialize_with = "id_string")]
    pub purchase_id: String,
}

/// TwoTap identifiers arrive as strings or numbers depending on the endpoint.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}
