//! Request session: who is calling and with which role.
//!
//! Every `/api` handler takes a `SessionContext`. A request without a bearer
//! token is rejected with 401 before the handler runs. The role comes from the
//! `X-User-Role` header and falls back to the least privileged role.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
};
use shared::ViewerRole;
use tracing::{debug, warn};

pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub token: String,
    pub role: ViewerRole,
    pub user_id: Option<String>,
}

impl SessionContext {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, (StatusCode, &'static str)> {
        let token = extract_bearer_token(headers)?;

        let role = match header_text(headers, USER_ROLE_HEADER) {
            Some(value) => value.parse().unwrap_or_else(|_| {
                warn!("Unknown user role '{}', treating caller as assistant", value);
                ViewerRole::default()
            }),
            None => ViewerRole::default(),
        };

        Ok(SessionContext {
            token,
            role,
            user_id: header_text(headers, USER_ID_HEADER).map(str::to_string),
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = Self::from_headers(&parts.headers)?;
        debug!(
            "Session: user={:?}, role={}",
            session.user_id, session.role
        );
        Ok(session)
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, (StatusCode, &'static str)> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or((StatusCode::UNAUTHORIZED, "Missing Authorization header"))?
        .to_str()
        .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid Authorization header"))?;

    match value.trim().strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err((StatusCode::UNAUTHORIZED, "Expected a bearer token")),
    }
}

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_static(value));
        }
        headers
    }

    #[test]
    fn test_session_from_headers() {
        let session = SessionContext::from_headers(&headers(&[
            ("authorization", "Bearer abc123"),
            ("x-user-role", "Receptionist"),
            ("x-user-id", "staff-7"),
        ]))
        .unwrap();

        assert_eq!(session.token, "abc123");
        assert_eq!(session.role, ViewerRole::Receptionist);
        assert_eq!(session.user_id.as_deref(), Some("staff-7"));
    }

    #[test]
    fn test_missing_or_unknown_role_is_assistant() {
        let missing = SessionContext::from_headers(&headers(&[("authorization", "Bearer t")])).unwrap();
        assert_eq!(missing.role, ViewerRole::Assistant);
        assert!(missing.user_id.is_none());

        let unknown = SessionContext::from_headers(&headers(&[
            ("authorization", "Bearer t"),
            ("x-user-role", "janitor"),
        ]))
        .unwrap();
        assert_eq!(unknown.role, ViewerRole::Assistant);
    }

    #[test]
    fn test_missing_token_is_unauthorized() {
        for pairs in [
            &[][..],
            &[("authorization", "Bearer   ")][..],
            &[("authorization", "Basic dXNlcjpwYXNz")][..],
        ] {
            let (status, _) = SessionContext::from_headers(&headers(pairs)).unwrap_err();
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }
    }
}
