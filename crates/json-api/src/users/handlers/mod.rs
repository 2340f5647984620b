//! User Handlers

pub(crate) mod activate;
pub(crate) mod register;
pub(crate) mod reset_password;
pub(crate) mod update;
pub(crate) mod verify;
