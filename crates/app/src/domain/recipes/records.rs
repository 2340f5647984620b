//! Recipe Records

use jiff::Timestamp;
use serde_json::Value;

use crate::{
    domain::{coffees::records::CoffeeUuid, users::records::UserUuid},
    uuids::TypedUuid,
    versioning::Version,
};

/// Recipe UUID
pub type RecipeUuid = TypedUuid<Recipe>;

/// Brewing method identifier (V60, Switch, ...).
pub type MethodId = i64;

/// Brewing Method Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub id: MethodId,
    pub name: String,
}

/// Recipe Record. `info` holds the method specific brew document.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub uuid: RecipeUuid,
    pub user_uuid: UserUuid,
    pub method_id: MethodId,
    pub coffee_uuid: Option<CoffeeUuid>,
    pub info: Value,
    pub created_at: Timestamp,
    pub version: Version,
}
