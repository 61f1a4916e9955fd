use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SchoolClass {
    pub id: i32,
    pub name: String,             // unique, case-sensitive
    pub rice_bowl_amount: f64,    // never negative
    pub created_at: OffsetDateTime,
}

/// Raised by a `ClassRepo` write that hits the unique name constraint.
#[derive(Debug, Error)]
#[error("class name {0:?} is already taken")]
pub struct DuplicateClassName(pub String);
