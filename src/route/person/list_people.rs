use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::{ApiError, ErrorVerbosityProvider},
    model::person::Person,
    state::ApiState,
};

#[derive(Debug)]
pub struct ListPeopleResponse(pub Vec<Person>);

impl IntoResponse for ListPeopleResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.0)).into_response()
    }
}

pub async fn list_people(State(state): State<ApiState>) -> Result<ListPeopleResponse, ApiError> {
    state
        .people()
        .list()
        .await
        .map(ListPeopleResponse)
        .map_err(|err| super::api_error(state.error_verbosity(), err))
}
