//! Caller identity supplied by the upstream session service.

use crate::error::{Error, Result};
use axum::http::HeaderMap;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller's user id, if the request carries a non-empty one
pub fn optional_user(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
}

/// The caller's user id, or `Unauthorized`
pub fn require_user(headers: &HeaderMap) -> Result<String> {
    optional_user(headers).ok_or(Error::Unauthorized)
}

/// Only the author of a recipe may change it
pub fn ensure_author(user_id: &str, author_id: &str) -> Result<()> {
    if user_id != author_id {
        return Err(Error::Forbidden(
            "Only the recipe author can modify this recipe".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_user_header() {
        let mut headers = HeaderMap::new();
        assert!(matches!(require_user(&headers), Err(Error::Unauthorized)));

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("  "));
        assert_eq!(optional_user(&headers), None);

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("user-42"));
        assert_eq!(require_user(&headers).unwrap(), "user-42");
    }

    #[test]
    fn test_ensure_author() {
        assert!(ensure_author("a", "a").is_ok());
        assert!(matches!(ensure_author("a", "b"), Err(Error::Forbidden(_))));
    }
}
