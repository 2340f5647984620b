//! Optimistic concurrency for versioned records.
//!
//! Every mutable record carries a `version` that starts at [`Version::INITIAL`]
//! and is bumped by exactly one on each successful update. Updates are written
//! as a single conditional statement of the shape
//!
//! ```sql
//! UPDATE ... SET ..., version = version + 1
//! WHERE uuid = $1 AND version = $2
//! RETURNING ...
//! ```
//!
//! so the row lock taken by the statement is the only thing deciding the
//! winner of concurrent writes. Zero returned rows is reported as
//! [`VersionedUpdateError::EditConflict`].

use std::{fmt, future::Future};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Record version counter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct Version(i32);

impl Version {
    /// Version assigned to a freshly created record.
    pub const INITIAL: Self = Self(1);

    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// The version a successful update produces.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<i32> for Version {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

#[derive(Debug, Error)]
pub enum VersionedUpdateError {
    #[error("edit conflict")]
    EditConflict,

    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}

/// Run a conditional update and interpret its outcome.
///
/// `update` must resolve to the row returned by the `RETURNING` clause, or
/// `None` when the `WHERE uuid = .. AND version = ..` predicate matched nothing.
///
/// # Errors
///
/// Returns [`VersionedUpdateError::EditConflict`] when no row was updated and
/// [`VersionedUpdateError::Sql`] for any storage failure.
pub async fn conditional_update<T, F>(update: F) -> Result<T, VersionedUpdateError>
where
    F: Future<Output = Result<Option<T>, sqlx::Error>>,
{
    update.await?.ok_or(VersionedUpdateError::EditConflict)
}
