//! Session cookie handling

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use teamspace_core::Config;

/// Build the `Set-Cookie` value that stores a session token.
pub fn session_cookie(config: &Config, token: &str) -> String {
    let max_age = config.session_ttl_hours.max(0).saturating_mul(3600);
    with_secure(
        config,
        format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            config.session_cookie_name, token, max_age
        ),
    )
}

/// Build the `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(config: &Config) -> String {
    with_secure(
        config,
        format!(
            "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
            config.session_cookie_name
        ),
    )
}

fn with_secure(config: &Config, cookie: String) -> String {
    if config.is_production() {
        format!("{}; Secure", cookie)
    } else {
        cookie
    }
}

/// Session token from the named cookie, falling back to `Authorization: Bearer`.
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string());

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_named_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; teamspace-session=abc123; lang=en"),
        );
        assert_eq!(
            extract_session_token(&headers, "teamspace-session").as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn falls_back_to_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
        assert_eq!(
            extract_session_token(&headers, "teamspace-session").as_deref(),
            Some("tok")
        );

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert!(extract_session_token(&headers, "teamspace-session").is_none());
    }

    #[test]
    fn cookie_attributes() {
        let config = Config::development("./data");
        let cookie = session_cookie(&config, "tok");
        assert!(cookie.starts_with("teamspace-session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=2592000"));
        assert!(!cookie.contains("Secure"));

        assert!(clear_session_cookie(&config).contains("Max-Age=0"));
    }
}
