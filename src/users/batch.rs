use sqlx::{Connection, PgConnection};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::users::{repo, User};

/// Insert `n` users produced by `next_user` inside one transaction.
///
/// The first failing insert aborts the batch and the transaction is rolled
/// back, so the store either gains all `n` rows or none of them. If the
/// explicit rollback itself fails the transaction guard still rolls back
/// when dropped.
pub async fn run_batch<F>(conn: &mut PgConnection, n: usize, mut next_user: F) -> Result<Vec<User>>
where
    F: FnMut() -> (String, String),
{
    let mut tx = conn
        .begin()
        .await
        .map_err(Error::op("begin transaction"))?;

    let mut created = Vec::with_capacity(n);
    for i in 0..n {
        let (name, email) = next_user();
        match repo::create(&mut tx, &name, &email).await {
            Ok(user) => {
                debug!(id = user.id, name = %user.name, step = i + 1, of = n, "inserted in transaction");
                created.push(user);
            }
            Err(e) => {
                warn!(error = %e, step = i + 1, of = n, "batch insert failed; rolling back");
                if let Err(rb) = tx.rollback().await {
                    warn!(error = %rb, "explicit rollback failed");
                }
                return Err(e);
            }
        }
    }

    tx.commit().await.map_err(Error::op("commit transaction"))?;
    Ok(created)
}
