//! Transaction scoping for multi-row writes
//!
//! A write opens a transaction, runs its statements against the borrowed
//! connection and hands the outcome to [`settle`]. `Ok` commits, `Err` rolls
//! back before the error is returned. A transaction dropped without settling
//! (panic, cancelled request) is rolled back by sqlx when the connection
//! returns to the pool.

use sqlx::{Database, Transaction};

use crate::error::AppResult;

/// Commit on success, roll back on failure, and return the outcome
pub async fn settle<DB, T>(tx: Transaction<'_, DB>, outcome: AppResult<T>) -> AppResult<T>
where
    DB: Database,
{
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!("Rollback failed after \"{}\": {}", err, rollback_err);
            } else {
                tracing::debug!("Rolled back: {}", err);
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    async fn pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("CREATE TABLE counters (id INTEGER PRIMARY KEY, value INTEGER NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    async fn count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM counters")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_commit_on_success() {
        let pool = pool().await;
        let mut tx = pool.begin().await.unwrap();
        sqlx::query("INSERT INTO counters (value) VALUES (1)")
            .execute(&mut *tx)
            .await
            .unwrap();

        let value = settle(tx, Ok(42)).await.unwrap();
        assert_eq!(value, 42);
        assert_eq!(count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_rollback_on_failure() {
        let pool = pool().await;
        let mut tx = pool.begin().await.unwrap();
        sqlx::query("INSERT INTO counters (value) VALUES (1)")
            .execute(&mut *tx)
            .await
            .unwrap();

        let outcome: AppResult<()> = Err(AppError::NoCopiesAvailable(1));
        let err = settle(tx, outcome).await.unwrap_err();
        assert!(matches!(err, AppError::NoCopiesAvailable(1)));
        assert_eq!(count(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_dropped_transaction_rolls_back() {
        let pool = pool().await;
        {
            let mut tx = pool.begin().await.unwrap();
            sqlx::query("INSERT INTO counters (value) VALUES (1)")
                .execute(&mut *tx)
                .await
                .unwrap();
        }
        assert_eq!(count(&pool).await, 0);
    }
}
