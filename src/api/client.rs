//! Typed HTTP client for the Absher backend
//!
//! One method per backend capability. HTTP failures are normalized into the
//! `AssistantError` taxonomy: transport failures become `NetworkError` (or
//! `TimeoutError` past the client timeout), reachable-but-rejecting
//! responses become `RequestError` with the server's detail, and the two
//! special cases — login 401 and charge declines — get their own kinds.

use crate::api::types::*;
use crate::{AssistantError, Result};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info};

/// Client-side ceiling for ID photo uploads
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given backend base URL.
    ///
    /// Every request carries an explicit timeout so a hung backend surfaces
    /// as `TimeoutError` instead of leaving a control disabled forever.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AssistantError::ConfigError(format!("Failed to build HTTP client: {}", e))
            })?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("API client targeting {}", base_url);

        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transport_error(e: reqwest::Error) -> AssistantError {
        if e.is_timeout() {
            AssistantError::TimeoutError(e.to_string())
        } else {
            AssistantError::NetworkError(e.to_string())
        }
    }

    /// Pull the server's stated reason out of an error response body.
    ///
    /// The backend reports failures as `{"detail": "..."}`; anything else
    /// falls back to the raw body or the status line.
    async fn error_detail(response: reqwest::Response) -> String {
        let status = response.status();
        match response.text().await {
            Ok(body) if !body.trim().is_empty() => serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
                .unwrap_or(body),
            _ => format!("HTTP {}", status),
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .http
            .post(self.url("/login"))
            .json(&request)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AssistantError::AuthError("Invalid credentials".into()));
        }
        if !response.status().is_success() {
            return Err(AssistantError::RequestError(
                Self::error_detail(response).await,
            ));
        }

        response.json().await.map_err(|e| {
            AssistantError::NetworkError(format!("Malformed login response: {}", e))
        })
    }

    pub async fn send_chat(&self, user_id: &str, message: &str) -> Result<ChatResponse> {
        let request = ChatRequest {
            user_id: user_id.to_string(),
            message: message.to_string(),
        };

        debug!("Sending chat message ({} chars)", message.len());

        let response = self
            .http
            .post(self.url("/chat"))
            .json(&request)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(AssistantError::RequestError(
                Self::error_detail(response).await,
            ));
        }

        response.json().await.map_err(|e| {
            AssistantError::NetworkError(format!("Malformed chat response: {}", e))
        })
    }

    /// Report the user's decision on a proposed action.
    ///
    /// `service_type` is required for correlation on the backend; an absent
    /// value is a caller-side contract violation and is rejected here,
    /// before any network traffic.
    pub async fn confirm_action(
        &self,
        request: &ConfirmActionRequest,
    ) -> Result<ConfirmActionResponse> {
        if request.service_type.trim().is_empty() {
            return Err(AssistantError::ValidationError(
                "Cannot determine the service type for this action".into(),
            ));
        }

        let response = self
            .http
            .post(self.url("/confirm-action"))
            .json(request)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(AssistantError::RequestError(
                Self::error_detail(response).await,
            ));
        }

        response.json().await.map_err(|e| {
            AssistantError::NetworkError(format!("Malformed confirmation response: {}", e))
        })
    }

    /// Charge the fee for an accepted action.
    ///
    /// A non-"success" status in an otherwise fine response and a non-2xx
    /// response are both business-level declines, mapped uniformly to
    /// `PaymentDeclined`. Callers must never retry this automatically.
    pub async fn charge_payment(&self, request: &ChargeRequest) -> Result<ChargeResponse> {
        let response = self
            .http
            .post(self.url("/payment/charge"))
            .json(request)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(AssistantError::PaymentDeclined(
                Self::error_detail(response).await,
            ));
        }

        let receipt: ChargeResponse = response.json().await.map_err(|e| {
            AssistantError::NetworkError(format!("Malformed charge response: {}", e))
        })?;

        if receipt.status != "success" {
            return Err(AssistantError::PaymentDeclined(
                receipt
                    .failure_reason
                    .clone()
                    .unwrap_or_else(|| receipt.status.clone()),
            ));
        }

        Ok(receipt)
    }

    pub async fn fetch_notifications(&self, user_id: &str) -> Result<Vec<Notification>> {
        let response = self
            .http
            .get(self.url(&format!("/notifications/{}", user_id)))
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(AssistantError::RequestError(
                Self::error_detail(response).await,
            ));
        }

        response.json().await.map_err(|e| {
            AssistantError::NetworkError(format!("Malformed notifications response: {}", e))
        })
    }

    /// Trigger the backend's proactive notification engine.
    pub async fn run_proactive(&self) -> Result<()> {
        let response = self
            .http
            .post(self.url("/run_proactive"))
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(AssistantError::RequestError(
                Self::error_detail(response).await,
            ));
        }

        Ok(())
    }

    /// Upload a national-ID photo for background removal.
    ///
    /// The file must already have passed `validate_id_photo`; the check is
    /// repeated here so no caller can reach the network with an oversized or
    /// non-image payload.
    pub async fn upload_id_photo(
        &self,
        user_id: &str,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadMediaResponse> {
        validate_id_photo(mime_type, bytes.len() as u64)?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| AssistantError::ValidationError(format!("Invalid media type: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .text("user_id", user_id.to_string())
            .part("file", part);

        let response = self
            .http
            .post(self.url("/upload/id-photo"))
            .multipart(form)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(AssistantError::RequestError(
                Self::error_detail(response).await,
            ));
        }

        response.json().await.map_err(|e| {
            AssistantError::NetworkError(format!("Malformed upload response: {}", e))
        })
    }

    /// Transcribe a recorded clip (WAV bytes) into text.
    pub async fn transcribe(&self, wav_bytes: Vec<u8>) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(wav_bytes)
            .file_name("recording.wav")
            .mime_str("audio/wav")
            .map_err(|e| AssistantError::ValidationError(format!("Invalid media type: {}", e)))?;

        let form = reqwest::multipart::Form::new().part("audio", part);

        let response = self
            .http
            .post(self.url("/voice/transcribe"))
            .multipart(form)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(AssistantError::RequestError(
                Self::error_detail(response).await,
            ));
        }

        let body: TranscribeResponse = response.json().await.map_err(|e| {
            AssistantError::NetworkError(format!("Malformed transcription response: {}", e))
        })?;

        Ok(body.text)
    }

    /// Synthesize speech for a reply. Returns a playable encoded audio blob.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .post(self.url("/voice/tts"))
            .json(&TtsRequest {
                text: text.to_string(),
            })
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(AssistantError::RequestError(
                Self::error_detail(response).await,
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AssistantError::NetworkError(format!("Failed to read audio: {}", e)))?;

        Ok(bytes.to_vec())
    }

    pub async fn health(&self) -> bool {
        match self.http.get(self.url("/health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Validate an ID photo before any network round trip.
pub fn validate_id_photo(mime_type: &str, size_bytes: u64) -> Result<()> {
    if !mime_type.starts_with("image/") {
        return Err(AssistantError::ValidationError(
            "Please choose a valid image file".into(),
        ));
    }
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(AssistantError::ValidationError(
            "Image is larger than 10 MB".into(),
        ));
    }
    Ok(())
}

/// Guess a MIME type from a file name, for files picked by path.
pub fn mime_for_file(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit('.')
        .next()
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new("http://localhost:8000/", Duration::from_secs(30));
        assert!(client.is_ok());
        assert_eq!(client.unwrap().url("/chat"), "http://localhost:8000/chat");
    }

    #[test]
    fn test_upload_validation_rejects_non_images() {
        assert!(validate_id_photo("application/pdf", 1024).is_err());
        assert!(validate_id_photo("text/plain", 10).is_err());
        assert!(validate_id_photo("image/png", 1024).is_ok());
    }

    #[test]
    fn test_upload_validation_rejects_oversized_files() {
        let twelve_mb = 12 * 1024 * 1024;
        let err = validate_id_photo("image/jpeg", twelve_mb).unwrap_err();
        assert!(matches!(err, AssistantError::ValidationError(_)));

        // Exactly at the limit is allowed
        assert!(validate_id_photo("image/jpeg", MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn test_mime_guess_from_extension() {
        assert_eq!(mime_for_file("id_photo.JPG"), "image/jpeg");
        assert_eq!(mime_for_file("scan.png"), "image/png");
        assert_eq!(mime_for_file("notes.txt"), "application/octet-stream");
    }
}
