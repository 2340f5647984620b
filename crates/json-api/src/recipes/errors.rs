//! Recipe Errors

use salvo::http::StatusError;
use serde_json::Value;
use tracing::error;

use dialed_in_app::domain::recipes::RecipesServiceError;

use crate::errors::{edit_conflict, invalid_field};

pub(crate) fn into_status_error(error: RecipesServiceError) -> StatusError {
    match error {
        RecipesServiceError::NotFound => StatusError::not_found(),
        RecipesServiceError::UnknownMethod => invalid_field("method_id", "unknown brewing method"),
        RecipesServiceError::UnknownCoffee => invalid_field("coffee_uuid", "no matching coffee found"),
        RecipesServiceError::InvalidReference => {
            invalid_field("recipe", "references an unknown resource")
        }
        RecipesServiceError::EditConflict => edit_conflict(),
        RecipesServiceError::Sql(source) => {
            error!("recipes storage failure: {source}");

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
