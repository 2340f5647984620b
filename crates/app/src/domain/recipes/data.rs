//! Recipes Data

use serde_json::Value;

use crate::{
    domain::{coffees::records::CoffeeUuid, recipes::records::MethodId},
    versioning::Version,
};

/// New Recipe Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub method_id: MethodId,
    pub coffee_uuid: Option<CoffeeUuid>,
    pub info: Value,
}

/// Recipe Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeUpdate {
    pub method_id: MethodId,
    pub coffee_uuid: Option<CoffeeUuid>,
    pub info: Value,
    pub version: Version,
}
