use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::error::{ApiError, ErrorVerbosity, InternalServerError};

/// Builds the response handler for [`tower_http::catch_panic::CatchPanicLayer`].
///
/// A panicking handler yields the same generic `500` as any other internal error.
pub fn panic_response(
    verbosity: ErrorVerbosity,
) -> impl Fn(Box<dyn Any + Send + 'static>) -> Response + Clone + Send + Sync + 'static {
    move |panic| {
        let panic = if let Some(message) = panic.downcast_ref::<String>() {
            message.as_str()
        } else if let Some(message) = panic.downcast_ref::<&str>() {
            *message
        } else {
            "unknown panic payload"
        };

        ApiError::from(InternalServerError::from_panic(verbosity, panic)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    use super::*;

    async fn boom() -> &'static str {
        panic!("database password is hunter2")
    }

    #[tokio::test]
    async fn panicking_handler_becomes_generic_internal_error() {
        let app = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(panic_response(ErrorVerbosity::Full)));

        let request = Request::builder().uri("/boom").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = std::str::from_utf8(&bytes).unwrap();
        assert!(body.contains("An internal server error has occurred"));
        assert!(!body.contains("hunter2"));
    }
}
