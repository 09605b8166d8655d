use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

/// Row of the `users` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,                          // assigned by the store
    pub name: String,
    pub email: String,                    // unique, enforced by the store
    pub created_at: PrimitiveDateTime,    // set by the store on insert
}
