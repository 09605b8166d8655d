use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sqlx::PgConnection;
use tracing::{info, warn};

use crate::config::Operations;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::schema;
use crate::users::services::{random_id, random_user};
use crate::users::{batch, repo, User};

/// Rows inserted by the two-phase switch.
pub const TWO_PHASE_BATCH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Hold(Duration),
    Recreate,
    InsertOne,
    SelectOne,
    UpdateOne,
    SelectAll,
    DeleteOne,
    DeleteAll,
    Transaction,
    TwoPhase,
}

/// Selected steps in execution order.
pub fn plan(ops: &Operations) -> Vec<Step> {
    [
        (ops.holdconn, Step::Hold(Duration::from_secs(ops.hold_secs))),
        (ops.recreate, Step::Recreate),
        (ops.insertone, Step::InsertOne),
        (ops.selectone, Step::SelectOne),
        (ops.updateone, Step::UpdateOne),
        (ops.selectall, Step::SelectAll),
        (ops.delone, Step::DeleteOne),
        (ops.delall, Step::DeleteAll),
        (ops.usetrans, Step::Transaction),
        (ops.usetwophase, Step::TwoPhase),
    ]
    .into_iter()
    .filter_map(|(on, step)| on.then_some(step))
    .collect()
}

/// Run every selected step, stopping at the first error. Steps that already
/// ran are not undone.
pub async fn run(conn: &mut PgConnection, ops: &Operations) -> Result<()> {
    run_with_rng(conn, ops, &mut StdRng::from_entropy()).await
}

/// Run the selected steps, then close the connection whatever the outcome.
/// A step failure takes precedence over a close failure.
pub async fn run_then_close(mut db: Database, ops: &Operations) -> Result<()> {
    let outcome = run(db.conn(), ops).await;
    let closed = db.close().await;
    if let (Err(_), Err(e)) = (&outcome, &closed) {
        warn!(error = %e, "close failed");
    }
    outcome?;
    closed
}

pub async fn run_with_rng<R: Rng>(
    conn: &mut PgConnection,
    ops: &Operations,
    rng: &mut R,
) -> Result<()> {
    for step in plan(ops) {
        info!(?step, "running step");
        execute(conn, step, ops, rng).await?;
    }
    Ok(())
}

async fn execute<R: Rng>(
    conn: &mut PgConnection,
    step: Step,
    ops: &Operations,
    rng: &mut R,
) -> Result<()> {
    match step {
        Step::Hold(duration) => hold(duration).await,
        Step::Recreate => {
            schema::recreate_table(conn).await?;
            println!("Table created successfully");
        }
        Step::InsertOne => {
            let (name, email) = random_user(rng);
            let user = repo::create(conn, &name, &email).await?;
            println!("Created user with ID: {} name: {}", user.id, user.name);
        }
        Step::SelectOne => {
            let id = target_id(ops, rng);
            let user = repo::find_by_id(conn, id)
                .await?
                .ok_or(Error::NotFound(id))?;
            if ops.json {
                print_json(&user)?;
            } else {
                println!("User: {user:?}");
            }
        }
        Step::UpdateOne => {
            let id = target_id(ops, rng);
            let (name, email) = random_user(rng);
            let rows = repo::update(conn, id, &name, &email).await?;
            println!("Updated user with id: {id} ({rows} row(s))");
        }
        Step::SelectAll => {
            let users = repo::list_all(conn).await?;
            if ops.json {
                for user in &users {
                    print_json(user)?;
                }
            } else {
                println!("All users:");
                for user in &users {
                    println!("- {} ({})", user.name, user.email);
                }
            }
        }
        Step::DeleteOne => {
            let id = target_id(ops, rng);
            let rows = repo::delete_by_id(conn, id).await?;
            println!("delete user with id: {id} ({rows} row(s))");
        }
        Step::DeleteAll => {
            let rows = repo::delete_all(conn).await?;
            println!("delete all users ({rows} row(s))");
        }
        Step::Transaction => insert_in_transaction(conn, 1, rng).await?,
        Step::TwoPhase => insert_in_transaction(conn, TWO_PHASE_BATCH, rng).await?,
    }
    Ok(())
}

async fn hold(duration: Duration) {
    info!(secs = duration.as_secs(), "holding connection open");
    tokio::time::sleep(duration).await;
}

async fn insert_in_transaction<R: Rng>(
    conn: &mut PgConnection,
    n: usize,
    rng: &mut R,
) -> Result<()> {
    let users = batch::run_batch(conn, n, || random_user(&mut *rng)).await?;
    for user in &users {
        println!("Created user with name: {} in transaction", user.name);
    }
    Ok(())
}

fn target_id<R: Rng>(ops: &Operations, rng: &mut R) -> i32 {
    ops.id.unwrap_or_else(|| random_id(rng))
}

fn print_json(user: &User) -> Result<()> {
    println!("{}", to_json_line(user)?);
    Ok(())
}

fn to_json_line(user: &User) -> Result<String> {
    Ok(serde_json::to_string(user)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_selected_plans_nothing() {
        assert!(plan(&Operations::default()).is_empty());
    }

    #[test]
    fn plan_follows_fixed_order_regardless_of_flag_order() {
        let ops = Operations {
            usetwophase: true,
            delall: true,
            selectall: true,
            recreate: true,
            insertone: true,
            holdconn: true,
            hold_secs: 2,
            ..Operations::default()
        };
        assert_eq!(
            plan(&ops),
            vec![
                Step::Hold(Duration::from_secs(2)),
                Step::Recreate,
                Step::InsertOne,
                Step::SelectAll,
                Step::DeleteAll,
                Step::TwoPhase,
            ]
        );
    }

    #[test]
    fn update_runs_before_select_all_and_deletes_after() {
        let ops = Operations {
            selectone: true,
            updateone: true,
            selectall: true,
            delone: true,
            usetrans: true,
            ..Operations::default()
        };
        assert_eq!(
            plan(&ops),
            vec![
                Step::SelectOne,
                Step::UpdateOne,
                Step::SelectAll,
                Step::DeleteOne,
                Step::Transaction,
            ]
        );
    }

    #[test]
    fn explicit_id_overrides_random_target() {
        let ops = Operations {
            id: Some(42),
            ..Operations::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(target_id(&ops, &mut rng), 42);
    }

    #[test]
    fn random_target_is_small() {
        let mut rng = StdRng::seed_from_u64(9);
        let id = target_id(&Operations::default(), &mut rng);
        assert!((1..=10).contains(&id));
    }

    #[tokio::test(start_paused = true)]
    async fn hold_step_sleeps_for_hold_secs() {
        let ops = Operations {
            holdconn: true,
            hold_secs: 20,
            ..Operations::default()
        };
        let steps = plan(&ops);
        let [Step::Hold(duration)] = steps.as_slice() else {
            panic!("expected a single hold step, got {steps:?}");
        };
        let start = tokio::time::Instant::now();
        hold(*duration).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(20), "held only {elapsed:?}");
        assert!(elapsed < Duration::from_secs(21), "held {elapsed:?}");
    }

    #[test]
    fn json_line_round_trips_created_at() {
        let user = User {
            id: 3,
            name: "wsxedc".into(),
            email: "wsxedc@example.com".into(),
            created_at: time::macros::datetime!(2024-05-01 12:30:15.5),
        };
        let line = to_json_line(&user).expect("encode");
        let value: serde_json::Value = serde_json::from_str(&line).expect("json");
        assert_eq!(value["id"], 3);
        assert_eq!(value["email"], "wsxedc@example.com");
        assert!(value["created_at"].is_string(), "created_at not a string: {line}");

        let back: User = serde_json::from_str(&line).expect("decode");
        assert_eq!(back, user);
    }
}
