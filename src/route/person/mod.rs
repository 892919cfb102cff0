use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::{
    error::{ApiError, ErrorVerbosity, InternalServerError, NotFoundError, ValidationError},
    model::person::Person,
    service::person_service::ServiceError,
    state::ApiState,
};

pub mod create_person;
pub mod delete_person;
pub mod get_person;
pub mod list_people;
pub mod update_person;

pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new()
        .route(
            "/person",
            get(list_people::list_people).post(create_person::create_person),
        )
        .route(
            "/person/:id",
            get(get_person::get_person)
                .put(update_person::update_person)
                .delete(delete_person::delete_person),
        )
}

/// A single person with `200 OK`.
#[derive(Debug)]
pub struct PersonResponse(pub Person);

impl IntoResponse for PersonResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.0)).into_response()
    }
}

pub fn api_error(verbosity: ErrorVerbosity, err: ServiceError) -> ApiError {
    match err {
        ServiceError::Validation(errors) => {
            tracing::warn!(?errors, "Validation errors");

            ValidationError::from_validation_errors(verbosity, &errors).into()
        }
        ServiceError::NotFound => NotFoundError::person(verbosity).into(),
        ServiceError::Store(err) => InternalServerError::from_generic_error(verbosity, err).into(),
    }
}
