use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{self, Claims};
use crate::error::ApiError;

/// Authenticated identity extracted from the bearer token. Threaded through
/// each handler call as a request extension rather than an ambient global.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
        }
    }
}

/// Bearer authentication gate. Short-circuits before any validation runs;
/// on success the acting user is injected into the request.
pub async fn require_bearer(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(&headers).ok_or(ApiError::Unauthorized)?;

    let claims = auth::verify_token(&token).map_err(|_| ApiError::Unauthorized)?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Pull the token out of `Authorization: Bearer <token>`
fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get("authorization")?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
