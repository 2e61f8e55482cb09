//! The `token` session cookie: building `Set-Cookie` values and reading the
//! token back from a request's `Cookie` headers.
//!
//! The cookie is `HttpOnly` and scoped to `/`. `Secure` is opt-in through
//! configuration; `SameSite` is not set.

use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, InvalidHeaderValue},
};
use chrono::{DateTime, Utc};

pub const SESSION_COOKIE_NAME: &str = "token";

/// RFC 7231 IMF-fixdate, the format cookie `Expires` attributes use.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionCookie {
    secure: bool,
}

impl SessionCookie {
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    /// `Set-Cookie` value carrying `token` until `expires_at`.
    pub fn issue(
        &self,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<HeaderValue, InvalidHeaderValue> {
        self.build(token, expires_at)
    }

    /// `Set-Cookie` value that makes the client drop its session cookie.
    pub fn clear(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        self.build("", DateTime::<Utc>::UNIX_EPOCH)
    }

    fn build(&self, value: &str, expires_at: DateTime<Utc>) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!(
            "{SESSION_COOKIE_NAME}={value}; Path=/; Expires={}; HttpOnly",
            expires_at.format(HTTP_DATE_FORMAT)
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }
}

/// Returns the session token from the request cookies, if one is present and
/// non-empty.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == SESSION_COOKIE_NAME).then(|| val.trim().trim_matches('"'))
        })
        .find(|token| !token.is_empty())
        .map(str::to_string)
}
