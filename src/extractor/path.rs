use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::{ApiError, ErrorVerbosityProvider, PathError};

/// The raw `:id` segment of a person route.
///
/// Only missing or undecodable segments are rejected here. Whether the id is
/// well formed is the service's call, since a malformed id simply matches no one.
#[derive(Debug)]
pub struct IdPath(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "id_path_extractor", skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(id)) => {
                tracing::trace!(%id, "Extracted");

                Ok(IdPath(id))
            }
            Err(rejection) => {
                tracing::warn!(?rejection, "Rejection");

                Err(PathError::new(state.error_verbosity(), rejection.body_text()).into())
            }
        }
    }
}
