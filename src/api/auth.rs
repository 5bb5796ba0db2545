//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{renter::Credentials, Renter},
};

use super::AuthenticatedRenter;

/// Token issued on register / login
#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub renter: Renter,
}

impl TokenResponse {
    fn bearer(token: String, renter: Renter) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            renter,
        }
    }
}

/// Register a new renter account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = Credentials,
    responses(
        (status = 201, description = "Renter registered", body = TokenResponse),
        (status = 400, description = "Missing or invalid username/password"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(credentials): Json<Credentials>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let (token, renter) = state.services.renters.register(credentials).await?;
    Ok((StatusCode::CREATED, Json(TokenResponse::bearer(token, renter))))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = Credentials,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(credentials): Json<Credentials>,
) -> AppResult<Json<TokenResponse>> {
    let (token, renter) = state.services.renters.authenticate(&credentials).await?;
    Ok(Json(TokenResponse::bearer(token, renter)))
}

/// Current renter
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Authenticated renter", body = Renter),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedRenter(claims): AuthenticatedRenter,
) -> AppResult<Json<Renter>> {
    let renter = state.services.renters.get_by_id(claims.renter_id).await?;
    Ok(Json(renter))
}
