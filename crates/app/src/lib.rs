//! Shared application domain and persistence modules.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod mailer;
pub mod rate_limit;
pub mod uuids;
pub mod versioning;

#[cfg(test)]
mod test;
