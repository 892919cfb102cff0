use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ErrorVerbosityProvider},
    extractor::path::IdPath,
    state::ApiState,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletePersonResponse {
    pub message: String,
}

impl IntoResponse for DeletePersonResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub async fn delete_person(
    IdPath(id): IdPath,
    State(state): State<ApiState>,
) -> Result<DeletePersonResponse, ApiError> {
    state
        .people()
        .delete(&id)
        .await
        .map_err(|err| super::api_error(state.error_verbosity(), err))?;

    Ok(DeletePersonResponse {
        message: "Person deleted successfully".to_string(),
    })
}
