//! Shared HTTP error responses.

use salvo::prelude::StatusError;

pub(crate) const EDIT_CONFLICT_MESSAGE: &str =
    "unable to update the record due to an edit conflict, please try again";

pub(crate) fn edit_conflict() -> StatusError {
    StatusError::conflict().brief(EDIT_CONFLICT_MESSAGE)
}

/// 422 naming the offending request field.
pub(crate) fn invalid_field(field: &str, message: impl std::fmt::Display) -> StatusError {
    StatusError::unprocessable_entity().brief(format!("{field}: {message}"))
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn invalid_field_names_the_field() {
        let error = invalid_field("token", "must be provided");

        assert_eq!(error.code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error.brief, "token: must be provided");
    }

    #[test]
    fn edit_conflict_is_409() {
        assert_eq!(edit_conflict().code, StatusCode::CONFLICT);
    }
}
