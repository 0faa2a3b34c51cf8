//! services/admin-api/src/bin/api.rs

use admin_api_lib::{
    adapters::{JsonExporter, PgAdminStore},
    config::Config,
    error::ApiError,
    web::{
        courses_by_status_handler, create_user_handler, delete_user_handler, get_user_handler,
        index_handler, list_courses_handler, list_users_handler, update_course_status_handler,
        update_user_handler, user_courses_handler, users_by_career_handler, ApiDoc, AppState,
    },
};
use axum::{
    http::Method,
    routing::{get, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .min_connections(config.pool_min_connections)
        .max_connections(config.pool_max_connections)
        .connect(&config.database_url)
        .await?;
    let store = Arc::new(PgAdminStore::new(db_pool));
    info!("Running database migrations...");
    store.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        db: store,
        exporter: JsonExporter::new(config.export_dir.clone()),
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // --- 4. Create the Web Router ---
    let api_router = Router::new()
        .route("/", get(index_handler))
        .route(
            "/admin/users",
            get(list_users_handler).post(create_user_handler),
        )
        .route(
            "/admin/users/{id}",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .route("/admin/courses", get(list_courses_handler))
        .route(
            "/admin/courses/{id}/status",
            put(update_course_status_handler),
        )
        .route(
            "/admin/queries/users_by_career",
            get(users_by_career_handler),
        )
        .route(
            "/admin/queries/courses_by_status",
            get(courses_by_status_handler),
        )
        .route("/admin/queries/user_courses", get(user_courses_handler))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
