//! Request and response types for the MediVault portal API.
//!
//! Multi-word fields use camelCase serialization to match the API's JSON
//! format. Credential-carrying request bodies are wiped when dropped.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Login request body sent to POST /auth/login.
#[derive(Debug, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration payload sent to POST /auth/signup.
#[derive(Debug, Clone, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: String,
}

/// Response body from login/signup.
///
/// `token` is present on success; `message` carries the server's
/// human-readable outcome either way. Callers interpret success from the
/// status code, not from this body.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Current user profile from GET /api/me.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub pincode: String,
}

/// One uploaded report, as listed by GET /api/documents.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    pub id: u64,
    pub file_name: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub upload_date: Option<UploadDate>,
}

/// Upload timestamp as the server serializes it: epoch milliseconds from
/// the legacy serializer, ISO-8601 text from the newer one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UploadDate {
    EpochMillis(i64),
    Text(String),
}

impl UploadDate {
    /// Render for display; falls back to the raw value if the epoch
    /// milliseconds are out of range.
    pub fn display(&self) -> String {
        match self {
            UploadDate::EpochMillis(ms) => chrono::DateTime::<chrono::Utc>::from_timestamp_millis(*ms)
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| ms.to_string()),
            UploadDate::Text(s) => s.clone(),
        }
    }
}

/// Per-file response from POST /api/documents/upload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_record_camel_case() {
        let json = r#"{"id":7,"fileName":"scan.pdf","fileSize":2048,"uploadDate":1700000000000}"#;
        let record: ReportRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.file_name, "scan.pdf");
        assert_eq!(record.file_size, 2048);
        assert_eq!(
            record.upload_date,
            Some(UploadDate::EpochMillis(1700000000000))
        );
    }

    #[test]
    fn test_upload_date_accepts_both_shapes() {
        let millis: UploadDate = serde_json::from_str("1700000000000").unwrap();
        assert_eq!(millis, UploadDate::EpochMillis(1700000000000));
        assert_eq!(millis.display(), "2023-11-14 22:13");

        let text: UploadDate = serde_json::from_str("\"2024-01-15T10:30:00\"").unwrap();
        assert_eq!(text.display(), "2024-01-15T10:30:00");
    }

    #[test]
    fn test_auth_response_tolerates_missing_fields() {
        let body: AuthResponse = serde_json::from_str("{}").unwrap();
        assert!(body.token.is_none());
        assert!(body.message.is_none());

        let body: AuthResponse = serde_json::from_str(r#"{"token":"abc","message":"ok"}"#).unwrap();
        assert_eq!(body.token.as_deref(), Some("abc"));
        assert_eq!(body.message.as_deref(), Some("ok"));
    }
}
