use axum::extract::State;

use crate::{
    error::{ApiError, ErrorVerbosityProvider},
    extractor::{json::ApiJson, path::IdPath},
    model::person::PersonPayload,
    state::ApiState,
};

use super::PersonResponse;

/// Overwrites only the fields present in the body.
pub async fn update_person(
    IdPath(id): IdPath,
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<PersonPayload>,
) -> Result<PersonResponse, ApiError> {
    let person = state
        .people()
        .update(&id, payload)
        .await
        .map_err(|err| super::api_error(state.error_verbosity(), err))?;

    Ok(PersonResponse(person))
}
