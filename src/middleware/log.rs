use axum::{extract::Request, middleware::Next, response::Response};

use super::auth::AuthUser;

/// Route log: records method, path and the acting identity where present.
/// Fire-and-forget; never affects the response.
pub async fn log_route(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match request.extensions().get::<AuthUser>() {
        Some(user) => tracing::info!(target: "route", %method, %path, user = %user.name),
        None => tracing::info!(target: "route", %method, %path),
    }

    next.run(request).await
}
