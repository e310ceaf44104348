//! Desk API wire types

use serde::Deserialize;

/// Response of the OAuth refresh-token grant.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// One page of a list endpoint. The upstream omits `data` entirely on an
/// empty page.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Error body returned by the desk API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: Option<String>,
    pub error_code: Option<String>,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_defaults_expiry() {
        let grant: TokenResponse = serde_json::from_str(r#"{"access_token":"t"}"#).unwrap();
        assert_eq!(grant.access_token.as_deref(), Some("t"));
        assert_eq!(grant.expires_in, 3600);
    }

    #[test]
    fn test_page_missing_data_reads_empty() {
        let page: Page<serde_json::Value> = serde_json::from_str("{}").unwrap();
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_error_body_is_lenient() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"errorCode":"INVALID_OAUTH","message":"expired"}"#).unwrap();
        assert_eq!(body.error_code.as_deref(), Some("INVALID_OAUTH"));
        assert_eq!(body.message.as_deref(), Some("expired"));
    }
}
