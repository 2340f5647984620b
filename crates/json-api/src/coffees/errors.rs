//! Coffee Errors

use salvo::http::StatusError;
use serde_json::Value;
use tracing::error;

use dialed_in_app::domain::coffees::CoffeesServiceError;

use crate::errors::{edit_conflict, invalid_field};

pub(crate) fn into_status_error(error: CoffeesServiceError) -> StatusError {
    match error {
        CoffeesServiceError::AlreadyExists => StatusError::conflict().brief("coffee already exists"),
        CoffeesServiceError::NotFound => StatusError::not_found(),
        CoffeesServiceError::InvalidReference => invalid_field("coffee", "references an unknown user"),
        CoffeesServiceError::EditConflict => edit_conflict(),
        CoffeesServiceError::Sql(source) => {
            error!("coffees storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

pub(crate) fn validate_info(info: &Value) -> Result<(), StatusError> {
    if !info.is_object() {
        return Err(invalid_field("info", "must be a JSON object"));
    }

    Ok(())
}
