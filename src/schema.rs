use sqlx::PgConnection;
use tracing::info;

use crate::error::{Error, Result};

const DROP_USERS: &str = "DROP TABLE IF EXISTS users";

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(100) UNIQUE NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Drop the users table (if any) and create it empty. Destructive: a failure
/// after the drop leaves no table behind.
pub async fn recreate_table(conn: &mut PgConnection) -> Result<()> {
    sqlx::query(DROP_USERS)
        .execute(&mut *conn)
        .await
        .map_err(Error::op("drop users table"))?;
    sqlx::query(CREATE_USERS)
        .execute(&mut *conn)
        .await
        .map_err(Error::op("create users table"))?;
    info!("users table recreated");
    Ok(())
}
