use axum::{extract::State, http::Uri};

use crate::{
    error::{ApiError, ErrorVerbosityProvider, NotFoundError},
    state::ApiState,
};

/// Fallback for every path no route matches.
pub async fn not_found(State(state): State<ApiState>, uri: Uri) -> ApiError {
    tracing::debug!(%uri, "No route");

    NotFoundError::new(state.error_verbosity()).into()
}
