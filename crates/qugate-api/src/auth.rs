//! Credential gate: map a bearer token to a username.
//!
//! Authentication is an exact-match lookup of the token against the record
//! store; revoked tokens are filtered out there, and no expiry or scope
//! check happens beyond that. Two transport
//! bindings are supported: the `Authorization: Bearer` header, and a token
//! embedded in the query string or the submission payload.

use axum::http::HeaderMap;
use qugate_core::AppError;
use qugate_db::RecordStore;

/// Resolve a token string to the linked username. Unknown or inactive
/// tokens fail with `InvalidCredential`.
pub async fn authenticate(records: &dyn RecordStore, token: &str) -> Result<String, AppError> {
    let token = records
        .get_token_by_key(token)
        .await?
        .ok_or(AppError::InvalidCredential)?;
    Ok(token.user)
}

/// Extract the token from the `Authorization: Bearer` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Pick the effective credential: the bearer header wins over any
/// alternative binding (query parameter or payload field).
pub fn select_token(headers: &HeaderMap, fallback: Option<&str>) -> Result<String, AppError> {
    if let Some(token) = bearer_token(headers) {
        return Ok(token);
    }
    match fallback {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(AppError::InvalidCredential),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    #[test]
    fn test_bearer_header_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer tok123".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("tok123".to_string()));

        headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_header_wins_over_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer fromheader".parse().unwrap());
        assert_eq!(
            select_token(&headers, Some("frombody")).unwrap(),
            "fromheader"
        );
    }

    #[test]
    fn test_missing_credential_rejected() {
        let headers = HeaderMap::new();
        assert!(matches!(
            select_token(&headers, None),
            Err(AppError::InvalidCredential)
        ));
        assert_eq!(select_token(&headers, Some("tok")).unwrap(), "tok");
    }
}
