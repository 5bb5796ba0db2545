//! API handlers for the rental REST endpoints

pub mod auth;
pub mod health;
pub mod openapi;
pub mod rentals;
pub mod titles;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::RenterClaims, AppState};

/// Extractor for the authenticated renter from a JWT bearer token
pub struct AuthenticatedRenter(pub RenterClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedRenter {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = RenterClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedRenter(claims))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Catalog
        .route("/titles", get(titles::list_titles).post(titles::create_title))
        .route(
            "/titles/:id",
            get(titles::get_title)
                .put(titles::update_title)
                .delete(titles::delete_title),
        )
        .route("/titles/:id/rent", post(rentals::rent_title))
        .route("/inventory", get(titles::inventory))
        // Rentals
        .route("/rentals", get(rentals::my_rentals))
        .route("/rentals/:id", get(rentals::get_rental))
        .route("/rentals/:id/return", post(rentals::return_rental))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
