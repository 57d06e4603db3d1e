//! API key authentication for the `/api` routes.

use crate::config::AuthConfig;
use crate::server::error::ApiError;
use crate::server::AppContext;
use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeader,
};
use tonearm_common::Error;

/// Check a bearer token against the configured API key.
fn check_auth(auth_config: &AuthConfig, bearer_token: Option<&str>) -> Result<(), Error> {
    if !auth_config.enabled {
        return Ok(());
    }

    match (bearer_token, auth_config.api_key.as_deref()) {
        (Some(token), Some(api_key)) if !api_key.is_empty() && token == api_key => Ok(()),
        _ => Err(Error::Unauthorized),
    }
}

/// Middleware for API key authentication
pub async fn api_auth_middleware(
    State(ctx): State<AppContext>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer_token = bearer.as_ref().map(|b| b.token());

    if let Err(e) = check_auth(&ctx.config.server.auth, bearer_token) {
        tracing::debug!(path = %request.uri().path(), "Rejected unauthenticated request");
        return Err(e.into());
    }

    Ok(next.run(request).await)
}
