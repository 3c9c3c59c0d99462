//! Error types for Pterodactyl API operations.

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Errors that can occur during Pterodactyl API operations.
#[derive(Debug, Error)]
pub enum PteroError {
    /// Configuration is missing or incomplete.
    #[error("Pterodactyl configuration required: {0}")]
    ConfigMissing(String),

    /// The panel rejected the request and described why.
    ///
    /// Only the first entry of the panel's `errors` list is kept.
    #[error("remote server responded with status {} ({}): {}", .error.status, .error.code, .error.detail)]
    Api {
        status_code: u16,
        error: ApiErrorDetail,
    },

    /// The panel rejected the request without a body.
    #[error("remote server responded with status {0}")]
    Status(StatusCode),

    /// The panel rejected the request and its error body could not be decoded.
    #[error("remote server responded with status {status}. additionally another error occurred while decoding the error: {source}")]
    UndecodableError {
        status: StatusCode,
        #[source]
        source: ErrorDecodeError,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The response body could not be drained.
    #[error("unable to read response body: {0}")]
    BodyError(#[source] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl PteroError {
    /// HTTP status code of a rejected request, if this error came from one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            Self::Status(status) | Self::UndecodableError { status, .. } => Some(status.as_u16()),
            _ => None,
        }
    }

    /// Returns true if the panel answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Result type alias for Pterodactyl operations.
pub type Result<T> = core::result::Result<T, PteroError>;

/// A single error entry reported by the panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorDetail {
    /// Error code. The panel sends it as a string, sometimes a numeric one.
    #[serde(default, deserialize_with = "string_or_number")]
    pub code: String,
    /// HTTP status as reported inside the body.
    #[serde(default, deserialize_with = "string_or_number")]
    pub status: String,
    /// Human-readable description.
    #[serde(default)]
    pub detail: String,
}

/// Why a non-success body could not be turned into an [`ApiErrorDetail`].
#[derive(Debug, Error)]
pub enum ErrorDecodeError {
    /// The body parsed but its `errors` list was empty or absent.
    #[error("no error details given")]
    NoDetails,

    /// The body is not a valid error envelope.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

/// Decode a panel error envelope, keeping only its first entry.
///
/// ```
/// let body = br#"{"errors":[{"code":"NotFoundHttpException","status":"404","detail":"Not Found"}]}"#;
/// let detail = pteroapi::decode_error(body).unwrap();
/// assert_eq!(detail.status, "404");
/// ```
pub fn decode_error(body: &[u8]) -> core::result::Result<ApiErrorDetail, ErrorDecodeError> {
    let envelope: ErrorEnvelope = serde_json::from_slice(body)?;
    envelope
        .errors
        .into_iter()
        .next()
        .ok_or(ErrorDecodeError::NoDetails)
}

/// Turn a non-success status and its body into the error handed to callers.
pub(crate) fn classify_failure(status: StatusCode, body: &[u8]) -> PteroError {
    if body.iter().all(u8::is_ascii_whitespace) {
        return PteroError::Status(status);
    }

    match decode_error(body) {
        Ok(error) => PteroError::Api {
            status_code: status.as_u16(),
            error,
        },
        Err(source) => PteroError::UndecodableError { status, source },
    }
}

fn string_or_number<'de, D>(deserializer: D) -> core::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Null(()) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_keeps_first_entry() {
        let body = br#"{"errors":[{"code":"1","status":"404","detail":"Not Found"},{"code":"2","status":"500","detail":"ignored"}]}"#;

        let detail = decode_error(body).unwrap();
        assert_eq!(detail.code, "1");
        assert_eq!(detail.status, "404");
        assert_eq!(detail.detail, "Not Found");
    }

    #[test]
    fn test_decode_error_empty_list() {
        let result = decode_error(br#"{"errors":[]}"#);
        assert!(matches!(result, Err(ErrorDecodeError::NoDetails)));
    }

    #[test]
    fn test_decode_error_missing_list() {
        let result = decode_error(br#"{"message":"Server Error"}"#);
        assert!(matches!(result, Err(ErrorDecodeError::NoDetails)));
    }

    #[test]
    fn test_decode_error_invalid_json() {
        let result = decode_error(b"<html>Bad Gateway</html>");
        assert!(matches!(result, Err(ErrorDecodeError::Json(_))));
    }

    #[test]
    fn test_decode_error_numeric_code() {
        let detail =
            decode_error(br#"{"errors":[{"code":422,"status":422,"detail":"bad"}]}"#).unwrap();
        assert_eq!(detail.code, "422");
        assert_eq!(detail.status, "422");
    }

    #[test]
    fn test_classify_failure_message() {
        let body = br#"{"errors":[{"code":"NotFoundHttpException","status":"404","detail":"The requested resource could not be found on the server."}]}"#;

        let err = classify_failure(StatusCode::NOT_FOUND, body);
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "remote server responded with status 404 (NotFoundHttpException): The requested resource could not be found on the server."
        );
    }

    #[test]
    fn test_classify_failure_empty_body() {
        let err = classify_failure(StatusCode::BAD_GATEWAY, b"");
        assert!(matches!(err, PteroError::Status(StatusCode::BAD_GATEWAY)));
        assert_eq!(
            err.to_string(),
            "remote server responded with status 502 Bad Gateway"
        );
    }

    #[test]
    fn test_classify_failure_without_details() {
        let err = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, br#"{"errors":[]}"#);
        assert!(matches!(
            err,
            PteroError::UndecodableError {
                source: ErrorDecodeError::NoDetails,
                ..
            }
        ));
        assert!(err.to_string().contains("no error details given"));
        assert_eq!(err.status_code(), Some(500));
    }
}
