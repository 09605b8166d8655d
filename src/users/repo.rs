use sqlx::PgConnection;

use crate::error::{Error, Result};
use crate::users::User;

/// Insert a user; the store assigns `id` and `created_at`.
pub async fn create(conn: &mut PgConnection, name: &str, email: &str) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email)
        VALUES ($1, $2)
        RETURNING id, name, email, created_at
        "#,
    )
    .bind(name)
    .bind(email)
    .fetch_one(&mut *conn)
    .await
    .map_err(Error::op("create user"))?;
    Ok(user)
}

/// Find a user by id. `Ok(None)` when no row matches.
pub async fn find_by_id(conn: &mut PgConnection, id: i32) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(Error::op("get user"))?;
    Ok(user)
}

pub async fn list_all(conn: &mut PgConnection) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, created_at
        FROM users
        ORDER BY id
        "#,
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(Error::op("get users"))?;
    Ok(users)
}

/// Change name and email. Returns rows affected; 0 is not an error.
pub async fn update(conn: &mut PgConnection, id: i32, name: &str, email: &str) -> Result<u64> {
    let done = sqlx::query(
        r#"
        UPDATE users
           SET name = $1, email = $2
         WHERE id = $3
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(id)
    .execute(&mut *conn)
    .await
    .map_err(Error::op("update user"))?;
    Ok(done.rows_affected())
}

/// Returns rows affected; 0 is not an error.
pub async fn delete_by_id(conn: &mut PgConnection, id: i32) -> Result<u64> {
    let done = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(Error::op("delete user"))?;
    Ok(done.rows_affected())
}

pub async fn delete_all(conn: &mut PgConnection) -> Result<u64> {
    let done = sqlx::query("DELETE FROM users")
        .execute(&mut *conn)
        .await
        .map_err(Error::op("delete all users"))?;
    Ok(done.rows_affected())
}
