//! Users

mod errors;
mod handlers;
mod models;

pub(crate) use errors::into_status_error;
pub(crate) use handlers::*;
pub(crate) use models::{UserResponse, validate_email, validate_password};
