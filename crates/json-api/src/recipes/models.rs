//! Recipe request and response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use dialed_in_app::domain::recipes::records::{Method, MethodId, Recipe};

/// Recipe Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RecipeResponse {
    /// Recipe UUID
    pub uuid: Uuid,
    /// Brewing method
    pub method_id: MethodId,
    /// Coffee brewed, when recorded
    pub coffee_uuid: Option<Uuid>,
    /// Method specific brew parameters
    #[salvo(schema(value_type = Object))]
    pub info: Value,
    /// RFC 3339 creation time
    pub created_at: String,
    /// Version to send back with the next update
    pub version: i32,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            uuid: recipe.uuid.into_uuid(),
            method_id: recipe.method_id,
            coffee_uuid: recipe.coffee_uuid.map(|coffee| coffee.into_uuid()),
            info: recipe.info,
            created_at: recipe.created_at.to_string(),
            version: recipe.version.get(),
        }
    }
}

/// Brewing Method
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MethodResponse {
    pub id: MethodId,
    pub name: String,
}

impl From<Method> for MethodResponse {
    fn from(method: Method) -> Self {
        Self {
            id: method.id,
            name: method.name,
        }
    }
}
