use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::common::{ErrorCode, FieldError, UserId};
use crate::server::routes::ApiResponse;

/// Header carrying the acting user's id
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Extension key for the identity performing the request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Actor(pub UserId);

impl Actor {
    pub fn anonymous() -> Self {
        Self(UserId::nil())
    }
}

/// Middleware to resolve the acting user from the request
///
/// No header means the anonymous contributor; a malformed header is a 400.
pub async fn extract_actor(mut request: Request, next: Next) -> Response {
    let actor = match request.headers().get(ACTOR_HEADER) {
        None => Actor::anonymous(),
        Some(value) => match value.to_str().ok().and_then(|s| UserId::parse(s.trim()).ok()) {
            Some(id) => Actor(id),
            None => {
                debug!("Rejecting request with malformed actor header");
                return ApiResponse::<()>::failure(vec![FieldError::new(
                    ACTOR_HEADER,
                    ErrorCode::InvalidInput,
                )])
                .into_response();
            }
        },
    };

    request.extensions_mut().insert(actor);
    next.run(request).await
}
