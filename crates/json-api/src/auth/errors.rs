//! Authentication and authorization error responses.

use salvo::{
    http::{
        StatusError,
        header::{HeaderValue, WWW_AUTHENTICATE},
    },
    prelude::*,
};

use dialed_in_app::auth::AccessError;

/// The only message a client ever sees for a rejected credential.
pub(crate) const INVALID_TOKEN_MESSAGE: &str = "invalid or missing authentication token";

pub(crate) fn access_status_error(error: AccessError) -> StatusError {
    match error {
        AccessError::AuthenticationRequired => StatusError::unauthorized().brief(error.to_string()),
        AccessError::ActivationRequired => StatusError::forbidden().brief(error.to_string()),
    }
}

/// Render the uniform 401 for a malformed, unknown, expired or wrong-scope
/// bearer token.
pub(crate) fn render_invalid_token(res: &mut Response) {
    res.headers_mut()
        .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    res.render(StatusError::unauthorized().brief(INVALID_TOKEN_MESSAGE));
}
