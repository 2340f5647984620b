//! Authentication

mod errors;
mod principal;
mod service;

pub use errors::*;
pub use principal::*;
pub use service::*;
