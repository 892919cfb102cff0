use std::fmt::Debug;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Json, Request},
};
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;

use crate::error::{
    ApiError, BodyError, ErrorVerbosity, ErrorVerbosityProvider, InternalServerError,
};

/// JSON request body that rejects with an [`ApiError`].
///
/// At full verbosity the rejection carries the expected schema of `T` as YAML.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + JsonSchema + Debug + Send,
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "json_extractor", skip_all)]
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| body_rejection::<T>(state.error_verbosity(), rejection))?;

        tracing::trace!(?body, "Extracted");

        Ok(ApiJson(body))
    }
}

fn body_rejection<T: JsonSchema>(verbosity: ErrorVerbosity, rejection: JsonRejection) -> ApiError {
    tracing::warn!(?rejection, "Rejection");

    match serde_yaml::to_string(&schema_for!(T)) {
        Ok(schema) => BodyError::new(verbosity, rejection.body_text(), schema).into(),
        Err(err) => InternalServerError::from_generic_error(verbosity, err).into(),
    }
}
