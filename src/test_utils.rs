#[cfg(test)]
pub mod test_utils {
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use migration::{Migrator, MigratorTrait};
    use model::entities::{postal_zone, user};
    use moka::future::Cache;
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing, seeded with one user and two postal zones
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;

        let test_user = user::ActiveModel {
            name: Set("Test Worker".to_string()),
            email: Set("worker@example.com".to_string()),
            password_hash: Set("hashed".to_string()),
            role: Set(user::UserRole::Worker),
            ..Default::default()
        };
        test_user.insert(&db).await.expect("Failed to create test user");

        for (zip, city, state, zone) in [
            ("90001", "Los Angeles", "CA", "4"),
            ("10001", "New York", "NY", "8"),
        ] {
            postal_zone::ActiveModel {
                zip_code: Set(zip.to_string()),
                city: Set(city.to_string()),
                state: Set(state.to_string()),
                zone: Set(zone.to_string()),
                ..Default::default()
            }
            .insert(&db)
            .await
            .expect("Failed to seed postal zone");
        }

        let zone_cache = Cache::new(100);

        AppState { db, zone_cache }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr) // Output to stderr, which is captured by tests
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> (Router, AppState) {
        // Initialize tracing for tests
        let _ = init_test_tracing();

        let state = setup_test_app_state().await;
        let router = create_router(state.clone());
        (router, state)
    }
}
