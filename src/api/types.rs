//! Wire types for the Absher backend API
//!
//! All request/response bodies are snake_case JSON, matching the backend's
//! pydantic models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Currency used by the portal when an action does not specify one
pub const DEFAULT_CURRENCY: &str = "SAR";

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
}

/// An action the assistant wants to perform on the user's behalf.
///
/// `data` is a free-form payload; when the action requires payment it carries
/// at least `service_type`, `amount` and `currency`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedAction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
}

impl ProposedAction {
    /// The service category this action belongs to, if the backend supplied one.
    ///
    /// Empty strings count as absent: confirmation cannot be correlated
    /// without a real value.
    pub fn service_type(&self) -> Option<&str> {
        self.data
            .get("service_type")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    }

    /// The fee for this action, when the backend has calculated one.
    pub fn amount(&self) -> Option<f64> {
        self.data.get("amount").and_then(|v| v.as_f64())
    }

    pub fn currency(&self) -> &str {
        self.data
            .get("currency")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_CURRENCY)
    }

    /// Whether accepting this action runs the payment sub-flow.
    pub fn requires_payment(&self) -> bool {
        self.amount().is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(default)]
    pub proposed_action: Option<ProposedAction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmActionRequest {
    pub user_id: String,
    pub action_id: String,
    pub accepted: bool,
    pub service_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmActionResponse {
    pub status: String,
    pub detail: String,
}

/// Card details collected by the payment sheet.
///
/// This is a simulated charge: fields are presence-checked only, never
/// validated against a real issuer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PaymentCard {
    pub card_holder: String,
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChargeRequest {
    pub user_id: String,
    pub action_id: String,
    pub amount: f64,
    pub currency: String,
    #[serde(flatten)]
    pub card: PaymentCard,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChargeResponse {
    pub status: String,
    #[serde(default)]
    pub failure_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    Sms,
    InApp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub channel: NotificationChannel,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub meta: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadMediaResponse {
    pub media_id: String,
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscribeResponse {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TtsRequest {
    pub text: String,
}

/// Arabic display name for a known service category
pub fn service_label(service_type: &str) -> Option<&'static str> {
    match service_type {
        "national_id" => Some("تجديد الهوية الوطنية"),
        "driver_license" => Some("تجديد رخصة القيادة"),
        "passport" => Some("تجديد جواز السفر"),
        "vehicle_registration" => Some("تجديد استمارة المركبة"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action_with_data(data: serde_json::Value) -> ProposedAction {
        serde_json::from_value(serde_json::json!({
            "id": "act-1",
            "type": "service_renewal",
            "description": "تجديد الهوية الوطنية",
            "data": data,
        }))
        .unwrap()
    }

    #[test]
    fn test_service_type_resolution() {
        let action = action_with_data(serde_json::json!({
            "service_type": "national_id",
            "amount": 150.0,
            "currency": "SAR",
        }));

        assert_eq!(action.service_type(), Some("national_id"));
        assert_eq!(action.amount(), Some(150.0));
        assert_eq!(action.currency(), "SAR");
        assert!(action.requires_payment());
    }

    #[test]
    fn test_blank_service_type_counts_as_absent() {
        let action = action_with_data(serde_json::json!({ "service_type": "  " }));
        assert_eq!(action.service_type(), None);

        let action = action_with_data(serde_json::json!({}));
        assert_eq!(action.service_type(), None);
        assert!(!action.requires_payment());
    }

    #[test]
    fn test_missing_currency_defaults_to_sar() {
        let action = action_with_data(serde_json::json!({ "amount": 80 }));
        assert_eq!(action.currency(), DEFAULT_CURRENCY);
        assert_eq!(action.amount(), Some(80.0));
    }

    #[test]
    fn test_chat_response_without_action() {
        let reply: ChatResponse =
            serde_json::from_str(r#"{"reply": "مرحبا"}"#).unwrap();
        assert!(reply.proposed_action.is_none());
    }

    #[test]
    fn test_charge_request_flattens_card_fields() {
        let request = ChargeRequest {
            user_id: "u1".into(),
            action_id: "act-1".into(),
            amount: 150.0,
            currency: "SAR".into(),
            card: PaymentCard {
                card_holder: "Abdullah".into(),
                card_number: "4111111111111111".into(),
                expiry_month: "04".into(),
                expiry_year: "2027".into(),
                cvv: "123".into(),
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["card_number"], "4111111111111111");
        assert_eq!(value["amount"], 150.0);
        assert!(value.get("card").is_none());
    }

    #[test]
    fn test_notification_deserialization() {
        let raw = r#"{
            "id": "n1",
            "user_id": "u1",
            "channel": "sms",
            "message": "تم تسجيل دخولك بنجاح",
            "created_at": "2025-01-15T09:30:00Z",
            "meta": {}
        }"#;

        let notification: Notification = serde_json::from_str(raw).unwrap();
        assert_eq!(notification.channel, NotificationChannel::Sms);
        assert_eq!(notification.message, "تم تسجيل دخولك بنجاح");
    }

    #[test]
    fn test_service_labels() {
        assert!(service_label("national_id").is_some());
        assert!(service_label("passport").is_some());
        assert!(service_label("unknown_service").is_none());
    }
}
