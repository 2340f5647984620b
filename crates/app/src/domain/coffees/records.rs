//! Coffee Records

use jiff::Timestamp;
use serde_json::Value;

use crate::{domain::users::records::UserUuid, uuids::TypedUuid, versioning::Version};

/// Coffee UUID
pub type CoffeeUuid = TypedUuid<Coffee>;

/// Coffee Record. `info` is the free-form catalog document (roaster, origin, notes).
#[derive(Debug, Clone, PartialEq)]
pub struct Coffee {
    pub uuid: CoffeeUuid,
    pub user_uuid: UserUuid,
    pub info: Value,
    pub created_at: Timestamp,
    pub version: Version,
}
