//! Coffees Data

use serde_json::Value;

use crate::versioning::Version;

/// New Coffee Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCoffee {
    pub info: Value,
}

/// Coffee Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct CoffeeUpdate {
    pub info: Value,
    pub version: Version,
}
