//! Rental ledger service: rent, return and open rentals with late fees

use chrono::{DateTime, Utc};
use tokio_stream::{Stream, StreamExt};

use crate::{
    error::AppResult,
    models::{Rental, RentalView},
    repository::Repository,
};

#[derive(Clone)]
pub struct LedgerService {
    repository: Repository,
}

impl LedgerService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Open rentals of a renter, soonest due first, assessed now
    pub fn open_rentals_for(&self, renter_id: i64) -> impl Stream<Item = AppResult<RentalView>> + '_ {
        self.open_rentals_at(renter_id, Utc::now())
    }

    /// Open rentals of a renter with late charges assessed at `now`
    pub fn open_rentals_at(
        &self,
        renter_id: i64,
        now: DateTime<Utc>,
    ) -> impl Stream<Item = AppResult<RentalView>> + '_ {
        self.repository
            .rentals_open_for(renter_id)
            .map(move |row| row.map(|open| RentalView::assess(open, now)))
    }

    /// Rent one copy of a title, due in seven days
    pub async fn rent(&self, renter_id: i64, title_id: i64) -> AppResult<Rental> {
        self.rent_at(renter_id, title_id, Utc::now()).await
    }

    /// Rent as of `now` (the rental and due dates derive from it)
    pub async fn rent_at(&self, renter_id: i64, title_id: i64, now: DateTime<Utc>) -> AppResult<Rental> {
        let rental = self.repository.rentals_rent(renter_id, title_id, now).await?;
        tracing::info!(
            "Ledger: renter id={} rented title id={} (rental id={}, due {})",
            renter_id, title_id, rental.id, rental.due_date
        );
        Ok(rental)
    }

    /// Return a rental owned by the renter
    pub async fn return_rental(&self, renter_id: i64, rental_id: i64) -> AppResult<Rental> {
        let rental = self.repository.rentals_return(renter_id, rental_id, Utc::now()).await?;
        tracing::info!(
            "Ledger: renter id={} returned rental id={} (title id={})",
            renter_id, rental.id, rental.title_id
        );
        Ok(rental)
    }

    pub async fn get_rental(&self, renter_id: i64, rental_id: i64) -> AppResult<Rental> {
        self.repository.rentals_get(renter_id, rental_id).await
    }
}
