use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Categorization of application errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AppErrorKind {
    NotFound,
    BadRequest,
    ValidationError,
    Unauthorized,
    Forbidden,
    Network,
    Timeout,
    InternalError,
}

impl fmt::Display for AppErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppErrorKind::NotFound => write!(f, "NotFound"),
            AppErrorKind::BadRequest => write!(f, "BadRequest"),
            AppErrorKind::ValidationError => write!(f, "ValidationError"),
            AppErrorKind::Unauthorized => write!(f, "Unauthorized"),
            AppErrorKind::Forbidden => write!(f, "Forbidden"),
            AppErrorKind::Network => write!(f, "Network"),
            AppErrorKind::Timeout => write!(f, "Timeout"),
            AppErrorKind::InternalError => write!(f, "InternalError"),
        }
    }
}

/// Structured application error shared by the backend client and the views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: AppErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_errors: HashMap<String, String>,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::NotFound,
            message: message.into(),
            field_errors: HashMap::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::BadRequest,
            message: message.into(),
            field_errors: HashMap::new(),
        }
    }

    pub fn validation(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        Self {
            kind: AppErrorKind::ValidationError,
            message: message.into(),
            field_errors,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::Unauthorized,
            message: message.into(),
            field_errors: HashMap::new(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::Forbidden,
            message: message.into(),
            field_errors: HashMap::new(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::Network,
            message: message.into(),
            field_errors: HashMap::new(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::Timeout,
            message: message.into(),
            field_errors: HashMap::new(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::InternalError,
            message: message.into(),
            field_errors: HashMap::new(),
        }
    }

    /// Map an HTTP status and error body from the auth endpoints.
    ///
    /// The auth service answers with JSON shaped like either
    /// `{"msg": "...", "code": 400}` or the older
    /// `{"error": "invalid_grant", "error_description": "..."}`. Whatever is
    /// found becomes the message; an unparseable body falls back to the
    /// status line.
    pub fn from_auth_response(status: u16, body: &str) -> Self {
        let message = extract_message(body, &["msg", "error_description", "message", "error"])
            .unwrap_or_else(|| format!("Authentication request failed (HTTP {})", status));
        Self::from_status(status, message)
    }

    /// Map an HTTP status and error body from the row-query endpoints.
    ///
    /// Query errors arrive as `{"message": "...", "code": "...", "details":
    /// ..., "hint": ...}`.
    pub fn from_rest_response(status: u16, body: &str) -> Self {
        let message = extract_message(body, &["message", "msg"])
            .unwrap_or_else(|| format!("Query request failed (HTTP {})", status));
        Self::from_status(status, message)
    }

    fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Self::unauthorized(message),
            403 => Self::forbidden(message),
            404 => Self::not_found(message),
            400 | 422 => Self::bad_request(message),
            _ => Self::internal(message),
        }
    }

    /// Message suitable for the login form. The backend's invalid-credentials
    /// wording is rewritten for clarity; everything else passes through.
    pub fn login_message(&self) -> String {
        if self.message.contains("Invalid") {
            "Invalid email or password".to_string()
        } else {
            self.message.clone()
        }
    }

    /// Single-line summary for forms that show one error at a time: the first
    /// field error when present, otherwise the top-level message.
    pub fn summary(&self) -> String {
        let mut fields: Vec<_> = self.field_errors.iter().collect();
        fields.sort_by_key(|(name, _)| name.as_str());
        fields
            .first()
            .map(|(_, msg)| msg.to_string())
            .unwrap_or_else(|| self.message.clone())
    }
}

/// Pull the first present string field out of a JSON error body.
fn extract_message(body: &str, keys: &[&str]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    keys.iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(|s| s.to_string())
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AppError {}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors = HashMap::new();
        for (field, errs) in errors.field_errors() {
            if let Some(first) = errs.first() {
                let msg = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                field_errors.insert(field.to_string(), msg);
            }
        }
        AppError::validation("Validation failed", field_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_extracts_msg_field() {
        let body = r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#;
        let err = AppError::from_auth_response(400, body);
        assert_eq!(err.kind, AppErrorKind::BadRequest);
        assert_eq!(err.message, "Invalid login credentials");
    }

    #[test]
    fn auth_error_extracts_legacy_error_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        let err = AppError::from_auth_response(400, body);
        assert_eq!(err.message, "Invalid login credentials");
    }

    #[test]
    fn auth_error_falls_back_to_status_for_garbage_body() {
        let err = AppError::from_auth_response(502, "<html>bad gateway</html>");
        assert_eq!(err.kind, AppErrorKind::InternalError);
        assert_eq!(err.message, "Authentication request failed (HTTP 502)");
    }

    #[test]
    fn rest_error_extracts_message_field() {
        let body = r#"{"message":"permission denied for table users","code":"42501"}"#;
        let err = AppError::from_rest_response(403, body);
        assert_eq!(err.kind, AppErrorKind::Forbidden);
        assert_eq!(err.message, "permission denied for table users");
    }

    #[test]
    fn status_mapping_covers_common_codes() {
        assert_eq!(
            AppError::from_rest_response(401, "{}").kind,
            AppErrorKind::Unauthorized
        );
        assert_eq!(
            AppError::from_rest_response(404, "{}").kind,
            AppErrorKind::NotFound
        );
        assert_eq!(
            AppError::from_rest_response(422, "{}").kind,
            AppErrorKind::BadRequest
        );
        assert_eq!(
            AppError::from_rest_response(500, "{}").kind,
            AppErrorKind::InternalError
        );
    }

    #[test]
    fn login_message_rewrites_invalid_credentials() {
        let err = AppError::bad_request("Invalid login credentials");
        assert_eq!(err.login_message(), "Invalid email or password");
    }

    #[test]
    fn login_message_passes_other_errors_through() {
        let err = AppError::bad_request("Email not confirmed");
        assert_eq!(err.login_message(), "Email not confirmed");
    }

    #[test]
    fn summary_prefers_field_errors() {
        let mut fields = HashMap::new();
        fields.insert("password".to_string(), "too short".to_string());
        let err = AppError::validation("Validation failed", fields);
        assert_eq!(err.summary(), "too short");

        let plain = AppError::network("connection refused");
        assert_eq!(plain.summary(), "connection refused");
    }

    #[test]
    fn display_impl_formats_kind_and_message() {
        let err = AppError::timeout("request timed out after 10s");
        assert_eq!(format!("{}", err), "Timeout: request timed out after 10s");
    }

    #[test]
    fn error_roundtrip_through_json() {
        let mut fields = HashMap::new();
        fields.insert("email".to_string(), "invalid format".to_string());
        let err = AppError::validation("Validation failed", fields);
        let json = serde_json::to_string(&err).unwrap();
        let parsed: AppError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, parsed);
    }
}
