//! Dialed-In Domain Concerns

pub mod coffees;
pub mod recipes;
pub mod tokens;
pub mod users;
