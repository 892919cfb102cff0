use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::{ApiError, ErrorVerbosityProvider},
    extractor::json::ApiJson,
    model::person::{Person, PersonPayload},
    state::ApiState,
};

#[derive(Debug)]
pub struct CreatePersonResponse(pub Person);

impl IntoResponse for CreatePersonResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

pub async fn create_person(
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<PersonPayload>,
) -> Result<CreatePersonResponse, ApiError> {
    let person = state
        .people()
        .create(payload)
        .await
        .map_err(|err| super::api_error(state.error_verbosity(), err))?;

    Ok(CreatePersonResponse(person))
}
