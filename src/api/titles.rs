//! Catalog (title) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        title::{CreateTitle, UpdateTitle},
        InventoryLine, Title,
    },
};

use super::AuthenticatedRenter;

/// List the catalog
#[utoipa::path(
    get,
    path = "/titles",
    tag = "titles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Titles ordered by name", body = Vec<Title>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_titles(
    State(state): State<crate::AppState>,
    AuthenticatedRenter(_claims): AuthenticatedRenter,
) -> AppResult<Json<Vec<Title>>> {
    let titles = state.services.catalog.list_titles().await?;
    Ok(Json(titles))
}

/// Get title details by ID
#[utoipa::path(
    get,
    path = "/titles/{id}",
    tag = "titles",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Title ID")),
    responses(
        (status = 200, description = "Title details", body = Title),
        (status = 404, description = "Title not found")
    )
)]
pub async fn get_title(
    State(state): State<crate::AppState>,
    AuthenticatedRenter(_claims): AuthenticatedRenter,
    Path(id): Path<i64>,
) -> AppResult<Json<Title>> {
    let title = state.services.catalog.get_title(id).await?;
    Ok(Json(title))
}

/// Add a title (admin)
#[utoipa::path(
    post,
    path = "/titles",
    tag = "titles",
    security(("bearer_auth" = [])),
    request_body = CreateTitle,
    responses(
        (status = 201, description = "Title added with 5 copies", body = Title),
        (status = 400, description = "Name and genre are required"),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn create_title(
    State(state): State<crate::AppState>,
    AuthenticatedRenter(claims): AuthenticatedRenter,
    Json(title): Json<CreateTitle>,
) -> AppResult<(StatusCode, Json<Title>)> {
    claims.require_admin()?;

    let created = state.services.catalog.add_title(title).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Edit a title (admin)
#[utoipa::path(
    put,
    path = "/titles/{id}",
    tag = "titles",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Title ID")),
    request_body = UpdateTitle,
    responses(
        (status = 200, description = "Title updated", body = Title),
        (status = 400, description = "Invalid name, genre or copy count"),
        (status = 404, description = "Title not found")
    )
)]
pub async fn update_title(
    State(state): State<crate::AppState>,
    AuthenticatedRenter(claims): AuthenticatedRenter,
    Path(id): Path<i64>,
    Json(title): Json<UpdateTitle>,
) -> AppResult<Json<Title>> {
    claims.require_admin()?;

    let updated = state.services.catalog.edit_title(id, title).await?;
    Ok(Json(updated))
}

/// Remove a title and all of its rentals (admin)
#[utoipa::path(
    delete,
    path = "/titles/{id}",
    tag = "titles",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Title ID")),
    responses(
        (status = 204, description = "Title and its rentals removed"),
        (status = 404, description = "Title not found")
    )
)]
pub async fn delete_title(
    State(state): State<crate::AppState>,
    AuthenticatedRenter(claims): AuthenticatedRenter,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.catalog.remove_title(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Inventory audit (admin)
#[utoipa::path(
    get,
    path = "/inventory",
    tag = "titles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Per-title copy balance", body = Vec<InventoryLine>),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn inventory(
    State(state): State<crate::AppState>,
    AuthenticatedRenter(claims): AuthenticatedRenter,
) -> AppResult<Json<Vec<InventoryLine>>> {
    claims.require_admin()?;

    let lines = state.services.catalog.inventory().await?;
    Ok(Json(lines))
}
