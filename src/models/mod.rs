//! Data models for the rental server

pub mod rental;
pub mod renter;
pub mod title;

// Re-export commonly used types
pub use rental::{LateCharge, OpenRental, Rental, RentalState, RentalView};
pub use renter::{Renter, RenterClaims, Role};
pub use title::{InventoryLine, Title, TitleChanges};
