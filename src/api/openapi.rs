//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, health, rentals, titles};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Movie Rental API",
        version = "1.0.0",
        description = "Movie catalog, rentals and inventory REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Titles
        titles::list_titles,
        titles::get_title,
        titles::create_title,
        titles::update_title,
        titles::delete_title,
        titles::inventory,
        // Rentals
        rentals::rent_title,
        rentals::my_rentals,
        rentals::get_rental,
        rentals::return_rental,
    ),
    components(
        schemas(
            // Auth
            auth::TokenResponse,
            crate::models::renter::Credentials,
            crate::models::renter::Renter,
            crate::models::renter::Role,
            // Titles
            crate::models::title::Title,
            crate::models::title::TitleShort,
            crate::models::title::CreateTitle,
            crate::models::title::UpdateTitle,
            crate::models::title::InventoryLine,
            // Rentals
            rentals::RentalResponse,
            crate::models::rental::Rental,
            crate::models::rental::RentalState,
            crate::models::rental::RentalView,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and login"),
        (name = "titles", description = "Catalog management"),
        (name = "rentals", description = "Renting and returning titles")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by secured paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
