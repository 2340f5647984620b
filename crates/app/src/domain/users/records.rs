//! User Records

use jiff::Timestamp;

use crate::{uuids::TypedUuid, versioning::Version};

/// User UUID
pub type UserUuid = TypedUuid<User>;

/// User Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub activated: bool,
    pub created_at: Timestamp,
    pub version: Version,
}
