//! SQL shared by the SQLite and PostgreSQL stores
//!
//! Statements stick to the common dialect (`$n` placeholders, `RETURNING`,
//! partial indexes) so both backends run the same text. `rental_store!`
//! expands the [`RentalStore`](super::RentalStore) impl for a concrete
//! store type and its connection type.

use crate::error::AppError;

pub(super) const PING: &str = "SELECT 1";

pub(super) const TITLES_LIST: &str = "SELECT * FROM titles ORDER BY name, id";

pub(super) const TITLES_GET: &str = "SELECT * FROM titles WHERE id = $1";

pub(super) const TITLES_COUNT: &str = "SELECT COUNT(*) FROM titles";

pub(super) const TITLES_CREATE: &str = r#"
    INSERT INTO titles (name, genre, available_copies, max_copies)
    VALUES ($1, $2, $3, $4)
    RETURNING *
"#;

pub(super) const TITLES_RENAME: &str = r#"
    UPDATE titles SET name = $1, genre = $2
    WHERE id = $3
    RETURNING *
"#;

// Shelf count is the admin's figure; owned copies follow from open rentals
pub(super) const TITLES_RESTOCK: &str = r#"
    UPDATE titles SET
        name = $1,
        genre = $2,
        available_copies = $3,
        max_copies = $3 + (
            SELECT COUNT(*) FROM rentals
            WHERE title_id = $4 AND return_date IS NULL
        )
    WHERE id = $4
    RETURNING *
"#;

pub(super) const TITLES_INVENTORY: &str = r#"
    SELECT t.id AS title_id, t.name, t.available_copies, t.max_copies,
           (SELECT COUNT(*) FROM rentals r
            WHERE r.title_id = t.id AND r.return_date IS NULL) AS open_rentals
    FROM titles t
    ORDER BY t.name, t.id
"#;

pub(super) const RENTALS_DELETE_FOR_TITLE: &str = "DELETE FROM rentals WHERE title_id = $1";

pub(super) const TITLES_DELETE: &str = "DELETE FROM titles WHERE id = $1";

// Decrement guarded by the stock check: zero affected rows means the title
// is missing or exhausted
pub(super) const RESERVE_COPY: &str = r#"
    UPDATE titles SET available_copies = available_copies - 1
    WHERE id = $1 AND available_copies > 0
"#;

pub(super) const RELEASE_COPY: &str = r#"
    UPDATE titles SET available_copies = available_copies + 1
    WHERE id = $1 AND available_copies < max_copies
"#;

pub(super) const TITLE_EXISTS: &str = "SELECT id FROM titles WHERE id = $1";

pub(super) const RENTALS_OPEN_FOR_PAIR: &str = r#"
    SELECT id FROM rentals
    WHERE renter_id = $1 AND title_id = $2 AND return_date IS NULL
"#;

pub(super) const RENTALS_CREATE: &str = r#"
    INSERT INTO rentals (renter_id, title_id, rental_date, due_date, return_date)
    VALUES ($1, $2, $3, $4, NULL)
    RETURNING *
"#;

pub(super) const RENTALS_CLOSE: &str = r#"
    UPDATE rentals SET return_date = $1
    WHERE id = $2 AND renter_id = $3 AND return_date IS NULL
    RETURNING *
"#;

pub(super) const RENTALS_GET: &str = "SELECT * FROM rentals WHERE id = $1 AND renter_id = $2";

pub(super) const RENTALS_OPEN_FOR_RENTER: &str = r#"
    SELECT r.id, r.renter_id, r.title_id, r.rental_date, r.due_date, r.return_date,
           t.name AS title_name, t.genre AS title_genre
    FROM rentals r
    JOIN titles t ON t.id = r.title_id
    WHERE r.renter_id = $1 AND r.return_date IS NULL
    ORDER BY r.due_date, r.id
"#;

pub(super) const RENTERS_CREATE: &str = r#"
    INSERT INTO renters (handle, credential_hash, role)
    VALUES ($1, $2, $3)
    RETURNING *
"#;

pub(super) const RENTERS_GET: &str = "SELECT * FROM renters WHERE id = $1";

pub(super) const RENTERS_GET_BY_HANDLE: &str = "SELECT * FROM renters WHERE handle = $1";

/// The partial unique index on open rentals caught a concurrent double rent
pub(super) fn open_rental_conflict(title_id: i64) -> impl FnOnce(sqlx::Error) -> AppError {
    move |err| match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::AlreadyRented(title_id),
        other => AppError::Database(other),
    }
}

pub(super) fn handle_conflict(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::Conflict("Username already exists".to_string())
        }
        other => AppError::Database(other),
    }
}

macro_rules! rental_store {
    ($store:ty, $conn:ty) => {
        use $crate::error::{AppError, AppResult};
        use $crate::models::{
            rental::due_date_for,
            renter::{NewRenter, RenterRow},
            InventoryLine, OpenRental, Rental, Renter, Title, TitleChanges,
        };
        use $crate::repository::{guard::settle, sql, RentalStore, RowStream};
        use ::chrono::{DateTime, Utc};
        use ::tokio_stream::StreamExt as _;

        async fn rent_within(
            conn: &mut $conn,
            renter_id: i64,
            title_id: i64,
            now: DateTime<Utc>,
        ) -> AppResult<Rental> {
            let reserved = ::sqlx::query(sql::RESERVE_COPY)
                .bind(title_id)
                .execute(&mut *conn)
                .await?
                .rows_affected();

            if reserved == 0 {
                let exists: Option<i64> = ::sqlx::query_scalar(sql::TITLE_EXISTS)
                    .bind(title_id)
                    .fetch_optional(&mut *conn)
                    .await?;
                return Err(match exists {
                    Some(_) => AppError::NoCopiesAvailable(title_id),
                    None => AppError::NotFound(format!("Title {} not found", title_id)),
                });
            }

            let already: Option<i64> = ::sqlx::query_scalar(sql::RENTALS_OPEN_FOR_PAIR)
                .bind(renter_id)
                .bind(title_id)
                .fetch_optional(&mut *conn)
                .await?;
            if already.is_some() {
                return Err(AppError::AlreadyRented(title_id));
            }

            ::sqlx::query_as::<_, Rental>(sql::RENTALS_CREATE)
                .bind(renter_id)
                .bind(title_id)
                .bind(now)
                .bind(due_date_for(now))
                .fetch_one(&mut *conn)
                .await
                .map_err(sql::open_rental_conflict(title_id))
        }

        async fn return_within(
            conn: &mut $conn,
            renter_id: i64,
            rental_id: i64,
            now: DateTime<Utc>,
        ) -> AppResult<Rental> {
            let closed = ::sqlx::query_as::<_, Rental>(sql::RENTALS_CLOSE)
                .bind(now)
                .bind(rental_id)
                .bind(renter_id)
                .fetch_optional(&mut *conn)
                .await?;

            let rental = match closed {
                Some(rental) => rental,
                None => {
                    let existing = ::sqlx::query_as::<_, Rental>(sql::RENTALS_GET)
                        .bind(rental_id)
                        .bind(renter_id)
                        .fetch_optional(&mut *conn)
                        .await?;
                    return Err(match existing {
                        Some(_) => AppError::AlreadyReturned(rental_id),
                        None => AppError::NotFound(format!("Rental {} not found", rental_id)),
                    });
                }
            };

            let released = ::sqlx::query(sql::RELEASE_COPY)
                .bind(rental.title_id)
                .execute(&mut *conn)
                .await?
                .rows_affected();
            if released == 0 {
                return Err(AppError::Internal(format!(
                    "Title {} has no outstanding copy for rental {}",
                    rental.title_id, rental.id
                )));
            }

            Ok(rental)
        }

        async fn delete_within(conn: &mut $conn, title_id: i64) -> AppResult<u64> {
            let rentals = ::sqlx::query(sql::RENTALS_DELETE_FOR_TITLE)
                .bind(title_id)
                .execute(&mut *conn)
                .await?
                .rows_affected();

            let titles = ::sqlx::query(sql::TITLES_DELETE)
                .bind(title_id)
                .execute(&mut *conn)
                .await?
                .rows_affected();
            if titles == 0 {
                return Err(AppError::NotFound(format!("Title {} not found", title_id)));
            }

            Ok(rentals)
        }

        #[::async_trait::async_trait]
        impl RentalStore for $store {
            async fn ping(&self) -> AppResult<()> {
                ::sqlx::query(sql::PING).execute(&self.pool).await?;
                Ok(())
            }

            async fn titles_list(&self) -> AppResult<Vec<Title>> {
                let titles = ::sqlx::query_as::<_, Title>(sql::TITLES_LIST)
                    .fetch_all(&self.pool)
                    .await?;
                Ok(titles)
            }

            async fn titles_get(&self, id: i64) -> AppResult<Title> {
                ::sqlx::query_as::<_, Title>(sql::TITLES_GET)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Title {} not found", id)))
            }

            async fn titles_count(&self) -> AppResult<i64> {
                let count: i64 = ::sqlx::query_scalar(sql::TITLES_COUNT)
                    .fetch_one(&self.pool)
                    .await?;
                Ok(count)
            }

            async fn titles_create(&self, name: &str, genre: &str, copies: i32) -> AppResult<Title> {
                let title = ::sqlx::query_as::<_, Title>(sql::TITLES_CREATE)
                    .bind(name)
                    .bind(genre)
                    .bind(copies)
                    .bind(copies)
                    .fetch_one(&self.pool)
                    .await?;
                Ok(title)
            }

            async fn titles_update(&self, id: i64, changes: &TitleChanges) -> AppResult<Title> {
                let query = match changes.available_copies {
                    Some(copies) => ::sqlx::query_as::<_, Title>(sql::TITLES_RESTOCK)
                        .bind(&changes.name)
                        .bind(&changes.genre)
                        .bind(copies)
                        .bind(id),
                    None => ::sqlx::query_as::<_, Title>(sql::TITLES_RENAME)
                        .bind(&changes.name)
                        .bind(&changes.genre)
                        .bind(id),
                };

                query
                    .fetch_optional(&self.pool)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Title {} not found", id)))
            }

            async fn titles_delete(&self, id: i64) -> AppResult<u64> {
                let mut tx = self.pool.begin().await?;
                let outcome = delete_within(&mut *tx, id).await;
                settle(tx, outcome).await
            }

            async fn titles_inventory(&self) -> AppResult<Vec<InventoryLine>> {
                let lines = ::sqlx::query_as::<_, InventoryLine>(sql::TITLES_INVENTORY)
                    .fetch_all(&self.pool)
                    .await?;
                Ok(lines)
            }

            fn rentals_open_for(&self, renter_id: i64) -> RowStream<'_, OpenRental> {
                Box::pin(
                    ::sqlx::query_as::<_, OpenRental>(sql::RENTALS_OPEN_FOR_RENTER)
                        .bind(renter_id)
                        .fetch(&self.pool)
                        .map(|row| row.map_err(AppError::from)),
                )
            }

            async fn rentals_get(&self, renter_id: i64, rental_id: i64) -> AppResult<Rental> {
                ::sqlx::query_as::<_, Rental>(sql::RENTALS_GET)
                    .bind(rental_id)
                    .bind(renter_id)
                    .fetch_optional(&self.pool)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Rental {} not found", rental_id)))
            }

            async fn rentals_rent(
                &self,
                renter_id: i64,
                title_id: i64,
                now: DateTime<Utc>,
            ) -> AppResult<Rental> {
                let mut tx = self.pool.begin().await?;
                let outcome = rent_within(&mut *tx, renter_id, title_id, now).await;
                settle(tx, outcome).await
            }

            async fn rentals_return(
                &self,
                renter_id: i64,
                rental_id: i64,
                now: DateTime<Utc>,
            ) -> AppResult<Rental> {
                let mut tx = self.pool.begin().await?;
                let outcome = return_within(&mut *tx, renter_id, rental_id, now).await;
                settle(tx, outcome).await
            }

            async fn renters_create(&self, renter: &NewRenter) -> AppResult<Renter> {
                let row = ::sqlx::query_as::<_, RenterRow>(sql::RENTERS_CREATE)
                    .bind(&renter.handle)
                    .bind(&renter.credential_hash)
                    .bind(renter.role.as_str())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(sql::handle_conflict)?;
                Renter::try_from(row)
            }

            async fn renters_get(&self, id: i64) -> AppResult<Renter> {
                let row = ::sqlx::query_as::<_, RenterRow>(sql::RENTERS_GET)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Renter {} not found", id)))?;
                Renter::try_from(row)
            }

            async fn renters_get_by_handle(&self, handle: &str) -> AppResult<Option<Renter>> {
                ::sqlx::query_as::<_, RenterRow>(sql::RENTERS_GET_BY_HANDLE)
                    .bind(handle)
                    .fetch_optional(&self.pool)
                    .await?
                    .map(Renter::try_from)
                    .transpose()
            }
        }
    };
}

pub(super) use rental_store;
