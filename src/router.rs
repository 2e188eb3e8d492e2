use crate::handlers::{
    health::health_check,
    import::import_packages,
    packages::{create_package, delete_package, get_package, get_packages, update_package},
    postal_zones::{get_postal_zone, get_zone},
    transactions::{get_transaction, get_transactions},
    users::{create_user, delete_user, get_user, get_users, update_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // User CRUD routes
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", put(update_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        // Package CRUD and CSV import
        .route("/api/v1/packages", post(create_package))
        .route("/api/v1/packages", get(get_packages))
        .route("/api/v1/packages/import", post(import_packages))
        .route("/api/v1/packages/:package_id", get(get_package))
        .route("/api/v1/packages/:package_id", put(update_package))
        .route("/api/v1/packages/:package_id", delete(delete_package))
        // Transaction history (read only)
        .route("/api/v1/transactions", get(get_transactions))
        .route("/api/v1/transactions/:transaction_id", get(get_transaction))
        // Postal-zone lookups; the literal segment must come before :zip
        .route("/api/v1/postal-zones/zone", get(get_zone))
        .route("/api/v1/postal-zones/:zip", get(get_postal_zone))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
