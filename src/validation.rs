// Validation utilities module
// Custom validator functions for configuration values

use url::Url;
use validator::ValidationError;

/// Validates that every allowed CORS origin is a bare http(s) origin
/// (scheme and host, optional port, no path or trailing slash)
pub fn validate_origins(origins: &[String]) -> Result<(), ValidationError> {
    if origins.iter().all(|origin| is_origin(origin)) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_origin"))
    }
}

/// True when `origin` is exactly what a browser sends in an `Origin` header
fn is_origin(origin: &str) -> bool {
    match Url::parse(origin) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https") && url.origin().ascii_serialization() == origin
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_origins() {
        let origins = vec![
            "https://www.unfoldingcreative.com".to_string(),
            "http://localhost:3000".to_string(),
        ];
        assert!(validate_origins(&origins).is_ok());
    }

    #[test]
    fn test_rejects_paths_and_schemes() {
        assert!(validate_origins(&["https://shop.example.com/".to_string()]).is_err());
        assert!(validate_origins(&["shop.example.com".to_string()]).is_err());
        assert!(validate_origins(&["ftp://shop.example.com".to_string()]).is_err());
        assert!(validate_origins(&["https://".to_string()]).is_err());
    }

    #[test]
    fn test_rejects_credentials_queries_and_fragments() {
        assert!(validate_origins(&["https://user@shop.example.com".to_string()]).is_err());
        assert!(validate_origins(&["https://user:pw@shop.example.com".to_string()]).is_err());
        assert!(validate_origins(&["https://shop.example.com?x".to_string()]).is_err());
        assert!(validate_origins(&["https://shop.example.com#top".to_string()]).is_err());
        assert!(validate_origins(&["https://shop example.com".to_string()]).is_err());
    }

    #[test]
    fn test_empty_list_is_valid() {
        assert!(validate_origins(&[]).is_ok());
    }
}
