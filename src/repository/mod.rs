//! Repository layer for database operations
//!
//! Catalog and ledger access goes through [`RentalStore`], implemented once
//! per backend: [`SqliteStore`] (embedded file) and [`PgStore`] (PostgreSQL).
//! Both share the SQL text in `sql` and the transaction handling in [`guard`].

pub mod guard;
pub mod postgres;
mod sql;
pub mod sqlite;

use std::{ops::Deref, pin::Pin, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_stream::Stream;

use crate::{
    config::{DatabaseConfig, StoreBackend},
    error::AppResult,
    models::{
        renter::NewRenter, InventoryLine, OpenRental, Rental, Renter, Title, TitleChanges,
    },
};

pub use postgres::PgStore;
pub use sqlite::SqliteStore;

/// Lazily fetched rows, borrowed from the store's pool
pub type RowStream<'a, T> = Pin<Box<dyn Stream<Item = AppResult<T>> + Send + 'a>>;

/// Store-access interface shared by every backend
///
/// Write operations that touch more than one row (rent, return, title
/// removal) each run inside exactly one transaction.
#[async_trait]
pub trait RentalStore: Send + Sync {
    /// Round-trip to the store, for readiness checks
    async fn ping(&self) -> AppResult<()>;

    async fn titles_list(&self) -> AppResult<Vec<Title>>;

    async fn titles_get(&self, id: i64) -> AppResult<Title>;

    async fn titles_count(&self) -> AppResult<i64>;

    /// Insert a title with `copies` on the shelf and owned
    async fn titles_create(&self, name: &str, genre: &str, copies: i32) -> AppResult<Title>;

    /// Rename / re-genre a title; a copy count resets the shelf count and
    /// recomputes `max_copies` from the open rentals
    async fn titles_update(&self, id: i64, changes: &TitleChanges) -> AppResult<Title>;

    /// Delete the title and every rental referencing it; returns the number
    /// of rentals removed
    async fn titles_delete(&self, id: i64) -> AppResult<u64>;

    async fn titles_inventory(&self) -> AppResult<Vec<InventoryLine>>;

    /// Open rentals of a renter with their title, soonest due first
    fn rentals_open_for(&self, renter_id: i64) -> RowStream<'_, OpenRental>;

    /// Rental owned by `renter_id`, open or closed
    async fn rentals_get(&self, renter_id: i64, rental_id: i64) -> AppResult<Rental>;

    /// Reserve a copy and open a rental dated `now`
    async fn rentals_rent(&self, renter_id: i64, title_id: i64, now: DateTime<Utc>) -> AppResult<Rental>;

    /// Close the rental at `now` and put the copy back on the shelf
    async fn rentals_return(&self, renter_id: i64, rental_id: i64, now: DateTime<Utc>) -> AppResult<Rental>;

    async fn renters_create(&self, renter: &NewRenter) -> AppResult<Renter>;

    async fn renters_get(&self, id: i64) -> AppResult<Renter>;

    async fn renters_get_by_handle(&self, handle: &str) -> AppResult<Option<Renter>>;
}

/// Handle to the configured store, cloned into every service
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn RentalStore>,
}

impl Repository {
    /// Create a repository over an already connected store
    pub fn new(store: impl RentalStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Connect to the configured backend and run its migrations
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.backend {
            StoreBackend::Sqlite => Ok(Self::new(SqliteStore::connect(config).await?)),
            StoreBackend::Postgres => Ok(Self::new(PgStore::connect(config).await?)),
        }
    }
}

impl Deref for Repository {
    type Target = dyn RentalStore;

    fn deref(&self) -> &Self::Target {
        self.store.as_ref()
    }
}
