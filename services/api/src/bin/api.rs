//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, LinearFormClassifier},
    config::Config,
    error::ApiError,
    web::{
        auth::{login_handler, logout_handler, signup_handler},
        media::{delete_media_handler, list_media_handler, upload_media_handler},
        middleware::require_auth,
        rest::ApiDoc,
        results::{list_workouts_handler, save_workout_handler},
        reviews::{
            create_review_handler, delete_review_handler, get_review_handler,
            list_reviews_handler, update_review_handler,
        },
        state::AppState,
        users::{delete_user_handler, get_user_handler, list_users_handler, update_user_handler},
        ws_handler,
    },
};
use move_right_core::ports::FormClassifierService;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use tower_http::cors::CorsLayer;

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
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool.clone()));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Load the Form Classifier Model ---
    let classifier = Arc::new(LinearFormClassifier::from_file(&config.form_model_path)?);
    info!(
        "Form classifier loaded from {} ({:?})",
        config.form_model_path.display(),
        classifier.supported_exercises()
    );

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        db: db_adapter,
        config: config.clone(),
        classifier,
    });

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .frontend_origin
                .parse::<HeaderValue>()
                .map_err(|e| ApiError::Internal(format!("Invalid FRONTEND_ORIGIN: {}", e)))?,
        )
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // Browsing profiles and reviews is public; everything that writes (and
    // the live-capture channel) sits behind the session middleware. Paths
    // that mix the two get the middleware on their mutating methods only.
    let auth_mw = axum_middleware::from_fn_with_state(app_state.clone(), require_auth);

    let api_router = Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/users", get(list_users_handler))
        .route(
            "/users/{user_id}",
            get(get_user_handler).merge(
                put(update_user_handler)
                    .delete(delete_user_handler)
                    .route_layer(auth_mw.clone()),
            ),
        )
        .route(
            "/reviews",
            get(list_reviews_handler)
                .merge(post(create_review_handler).route_layer(auth_mw.clone())),
        )
        .route(
            "/reviews/{review_id}",
            get(get_review_handler).merge(
                put(update_review_handler)
                    .delete(delete_review_handler)
                    .route_layer(auth_mw.clone()),
            ),
        )
        .route(
            "/workout-results",
            post(save_workout_handler)
                .get(list_workouts_handler)
                .route_layer(auth_mw.clone()),
        )
        .route(
            "/media",
            post(upload_media_handler)
                .get(list_media_handler)
                .route_layer(auth_mw.clone()),
        )
        .route(
            "/media/{media_id}",
            delete(delete_media_handler).route_layer(auth_mw.clone()),
        )
        .route("/ws", get(ws_handler).route_layer(auth_mw))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
