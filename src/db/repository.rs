//! Storage seam shared by every ledger entity.
//!
//! Implementations borrow a `rusqlite::Connection`; passing a `Transaction`
//! (it derefs to `Connection`) makes a whole sequence of calls atomic.

use crate::errors::{AppError, AppResult};

pub trait Repository {
    type Key;
    type Entity;

    fn get(&self, key: &Self::Key) -> AppResult<Option<Self::Entity>>;

    /// Insert or update; returns the entity as stored (new id / version).
    fn upsert(&self, entity: &Self::Entity) -> AppResult<Self::Entity>;

    /// Returns true if a row was removed.
    fn delete(&self, key: &Self::Key) -> AppResult<bool>;

    fn require(&self, key: &Self::Key) -> AppResult<Self::Entity>
    where
        Self::Key: std::fmt::Display,
    {
        self.get(key)?
            .ok_or_else(|| AppError::NotFound(format!("{} {}", self.entity_name(), key)))
    }

    fn entity_name(&self) -> &'static str;
}

/// Wrap a bad stored value into the rusqlite mapping error channel.
pub(crate) fn bad_column(idx: usize, what: &str, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        Box::new(AppError::InvalidInput(format!("invalid {}: '{}'", what, value))),
    )
}
