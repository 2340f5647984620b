//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use dialed_in_app::auth::{AuthenticatedUser, Principal};

use crate::auth::access_status_error;

const PRINCIPAL_DEPOT_KEY: &str = "principal";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_principal(&mut self, principal: Principal);

    /// Principal attached by the authenticator, `Anonymous` when none was.
    fn principal(&self) -> Principal;

    fn authenticated_user_or_401(&self) -> Result<AuthenticatedUser, StatusError>;

    fn activated_user_or_403(&self) -> Result<AuthenticatedUser, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_principal(&mut self, principal: Principal) {
        self.insert(PRINCIPAL_DEPOT_KEY, principal);
    }

    fn principal(&self) -> Principal {
        self.get::<Principal>(PRINCIPAL_DEPOT_KEY)
            .copied()
            .unwrap_or_default()
    }

    fn authenticated_user_or_401(&self) -> Result<AuthenticatedUser, StatusError> {
        self.principal()
            .require_authenticated()
            .map_err(access_status_error)
    }

    fn activated_user_or_403(&self) -> Result<AuthenticatedUser, StatusError> {
        self.principal()
            .require_activated()
            .map_err(access_status_error)
    }
}
