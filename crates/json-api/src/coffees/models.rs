//! Coffee response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use dialed_in_app::domain::coffees::records::Coffee;

/// Coffee Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CoffeeResponse {
    /// Coffee UUID
    pub uuid: Uuid,
    /// Roaster, origin, tasting notes and so on
    #[salvo(schema(value_type = Object))]
    pub info: Value,
    /// RFC 3339 creation time
    pub created_at: String,
    /// Version to send back with the next update
    pub version: i32,
}

impl From<Coffee> for CoffeeResponse {
    fn from(coffee: Coffee) -> Self {
        Self {
            uuid: coffee.uuid.into_uuid(),
            info: coffee.info,
            created_at: coffee.created_at.to_string(),
            version: coffee.version.get(),
        }
    }
}
