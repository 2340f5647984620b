//! Users Data

use crate::{
    domain::{tokens::records::Token, users::records::User},
    versioning::Version,
};

/// New User Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// User Update Data. `version` is the version the caller last read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub version: Version,
}

/// A freshly registered (inactive) user and the activation token to mail.
#[derive(Debug, Clone)]
pub struct RegisteredUser {
    pub user: User,
    pub activation_token: Token,
}
