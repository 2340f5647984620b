//! Bearer token authenticator.
//!
//! Requests without an `Authorization` header continue as
//! [`Principal::Anonymous`]. A header with the wrong scheme or a token of the
//! wrong shape is rejected before any lookup. Everything else is resolved
//! against the authentication scope.

use std::sync::Arc;

use salvo::{
    http::header::{AUTHORIZATION, HeaderValue, VARY},
    prelude::*,
};
use tracing::{debug, error};

use dialed_in_app::{
    auth::{AuthServiceError, Principal},
    domain::tokens::{plaintext::validate_plaintext, records::TokenScope},
};

use crate::{auth::render_invalid_token, extensions::*, state::State};

enum Credential {
    Missing,
    Malformed,
    Bearer(String),
}

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    res.headers_mut()
        .insert(VARY, HeaderValue::from_static("Authorization"));

    let token = match credential(req) {
        Credential::Missing => {
            depot.insert_principal(Principal::Anonymous);
            ctrl.call_next(req, depot, res).await;

            return;
        }
        Credential::Malformed => {
            debug!("rejected malformed authorization header");
            render_invalid_token(res);
            ctrl.skip_rest();

            return;
        }
        Credential::Bearer(token) => token,
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();

            return;
        }
    };

    match state.app.auth.authenticate_bearer(&token).await {
        Ok(user) => {
            depot.insert_principal(user.into());
        }
        Err(AuthServiceError::InvalidToken) => {
            render_invalid_token(res);
            ctrl.skip_rest();

            return;
        }
        Err(AuthServiceError::Sql(source)) => {
            error!("failed to resolve authentication token: {source}");
            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    }

    ctrl.call_next(req, depot, res).await;
}

fn credential(req: &Request) -> Credential {
    let Some(value) = req.headers().get(AUTHORIZATION) else {
        return Credential::Missing;
    };

    let Ok(value) = value.to_str() else {
        return Credential::Malformed;
    };

    let Some((scheme, token)) = value.split_once(' ') else {
        return Credential::Malformed;
    };

    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer")
        || validate_plaintext(TokenScope::Authentication, token).is_err()
    {
        return Credential::Malformed;
    }

    Credential::Bearer(token.to_owned())
}
