//! Rental model, lifecycle state and late-fee assessment

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::title::TitleShort;

/// Days a renter may keep a title before it is overdue
pub const RENTAL_PERIOD_DAYS: i64 = 7;

/// Late fee charged per started day past the due date
pub const FEE_PER_DAY: i64 = 5;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Rental model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rental {
    pub id: i64,
    pub renter_id: i64,
    pub title_id: i64,
    pub rental_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    /// `None` while the rental is outstanding
    pub return_date: Option<DateTime<Utc>>,
}

/// Rental lifecycle: created open, closed once returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RentalState {
    Open,
    Closed,
}

impl Rental {
    pub fn state(&self) -> RentalState {
        match self.return_date {
            None => RentalState::Open,
            Some(_) => RentalState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == RentalState::Open
    }
}

/// Due date for a rental starting at `rental_date`
pub fn due_date_for(rental_date: DateTime<Utc>) -> DateTime<Utc> {
    rental_date + Duration::days(RENTAL_PERIOD_DAYS)
}

/// Overdue status and fee, derived at read time and never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LateCharge {
    pub late_days: i64,
    pub late_fee: Decimal,
    pub is_overdue: bool,
}

impl LateCharge {
    /// `late_days = max(0, ceil((now - due) / 1 day))`
    pub fn assess(due_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let elapsed = (now - due_date).num_milliseconds();
        let late_days = if elapsed <= 0 {
            0
        } else {
            (elapsed + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
        };

        Self {
            late_days,
            late_fee: Decimal::from(late_days * FEE_PER_DAY),
            is_overdue: late_days > 0,
        }
    }
}

/// Open rental joined with its title, as read from the ledger
#[derive(Debug, Clone, FromRow)]
pub struct OpenRental {
    #[sqlx(flatten)]
    pub rental: Rental,
    pub title_name: String,
    pub title_genre: String,
}

/// Open rental with its late charge, for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RentalView {
    pub id: i64,
    pub title: TitleShort,
    pub rental_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub late_days: i64,
    #[schema(value_type = String)]
    pub late_fee: Decimal,
    pub is_overdue: bool,
}

impl RentalView {
    pub fn assess(open: OpenRental, now: DateTime<Utc>) -> Self {
        let charge = LateCharge::assess(open.rental.due_date, now);
        Self {
            id: open.rental.id,
            title: TitleShort {
                id: open.rental.title_id,
                name: open.title_name,
                genre: open.title_genre,
            },
            rental_date: open.rental.rental_date,
            due_date: open.rental.due_date,
            return_date: open.rental.return_date,
            late_days: charge.late_days,
            late_fee: charge.late_fee,
            is_overdue: charge.is_overdue,
        }
    }
}
