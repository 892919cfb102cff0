use axum::extract::State;

use crate::{
    error::{ApiError, ErrorVerbosityProvider},
    extractor::path::IdPath,
    state::ApiState,
};

use super::PersonResponse;

pub async fn get_person(
    IdPath(id): IdPath,
    State(state): State<ApiState>,
) -> Result<PersonResponse, ApiError> {
    let person = state
        .people()
        .get(&id)
        .await
        .map_err(|err| super::api_error(state.error_verbosity(), err))?;

    Ok(PersonResponse(person))
}
