//! Rental endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tokio_stream::StreamExt;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{Rental, RentalView},
};

use super::AuthenticatedRenter;

/// Rental response with status message
#[derive(Serialize, ToSchema)]
pub struct RentalResponse {
    pub rental: Rental,
    pub message: String,
}

/// Rent a title for the authenticated renter
#[utoipa::path(
    post,
    path = "/titles/{id}/rent",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Title ID")),
    responses(
        (status = 201, description = "Title rented, due in 7 days", body = RentalResponse),
        (status = 404, description = "Title not found"),
        (status = 409, description = "No copies available or already rented")
    )
)]
pub async fn rent_title(
    State(state): State<crate::AppState>,
    AuthenticatedRenter(claims): AuthenticatedRenter,
    Path(title_id): Path<i64>,
) -> AppResult<(StatusCode, Json<RentalResponse>)> {
    let rental = state.services.ledger.rent(claims.renter_id, title_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(RentalResponse {
            rental,
            message: "Title rented successfully".to_string(),
        }),
    ))
}

/// Open rentals of the authenticated renter, with late fees
#[utoipa::path(
    get,
    path = "/rentals",
    tag = "rentals",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Open rentals, soonest due first", body = Vec<RentalView>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_rentals(
    State(state): State<crate::AppState>,
    AuthenticatedRenter(claims): AuthenticatedRenter,
) -> AppResult<Json<Vec<RentalView>>> {
    let rentals = state
        .services
        .ledger
        .open_rentals_for(claims.renter_id)
        .collect::<AppResult<Vec<_>>>()
        .await?;
    Ok(Json(rentals))
}

/// Get one of the authenticated renter's rentals
#[utoipa::path(
    get,
    path = "/rentals/{id}",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Rental ID")),
    responses(
        (status = 200, description = "Rental", body = Rental),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn get_rental(
    State(state): State<crate::AppState>,
    AuthenticatedRenter(claims): AuthenticatedRenter,
    Path(rental_id): Path<i64>,
) -> AppResult<Json<Rental>> {
    let rental = state.services.ledger.get_rental(claims.renter_id, rental_id).await?;
    Ok(Json(rental))
}

/// Return a rented title
#[utoipa::path(
    post,
    path = "/rentals/{id}/return",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Rental ID")),
    responses(
        (status = 200, description = "Title returned", body = RentalResponse),
        (status = 404, description = "Rental not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_rental(
    State(state): State<crate::AppState>,
    AuthenticatedRenter(claims): AuthenticatedRenter,
    Path(rental_id): Path<i64>,
) -> AppResult<Json<RentalResponse>> {
    let rental = state.services.ledger.return_rental(claims.renter_id, rental_id).await?;

    Ok(Json(RentalResponse {
        rental,
        message: "Title returned successfully".to_string(),
    }))
}
