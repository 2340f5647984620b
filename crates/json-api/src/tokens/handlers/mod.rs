//! Token Handlers

pub(crate) mod activation;
pub(crate) mod authentication;
pub(crate) mod password_reset;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// Email-only request used to (re)issue activation and reset tokens.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct EmailRequest {
    pub email: String,
}

/// Acknowledgement for tokens delivered by mail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MessageResponse {
    pub message: String,
}
