use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::error::{ApiError, ErrorVerbosityProvider, MethodNotAllowedError};

/// Replaces axum's empty `405` with an [`ApiError`], e.g. for `PATCH /person/:id`.
pub async fn method_not_allowed<S: ErrorVerbosityProvider>(
    State(state): State<S>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let resp = next.run(req).await;

    if resp.status() != StatusCode::METHOD_NOT_ALLOWED {
        return Ok(resp);
    }

    tracing::warn!(%method, %path, "Method not allowed");

    Err(MethodNotAllowedError::new(state.error_verbosity()).into())
}
