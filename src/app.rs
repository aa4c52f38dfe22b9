use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::{middleware::from_fn, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::config;
use crate::database::DatabaseManager;
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, validate_user_middleware};

/// The full HTTP surface of the service
pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .merge(auth_public_routes())
        // Protected API
        .merge(protected_routes())
        // Global middleware
        .layer(DefaultBodyLimit::max(config().api.max_request_size_bytes))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router {
    use public::auth;

    Router::new()
        .route("/auth/register", post(auth::user_register))
        .route("/auth/login", post(auth::user_login))
}

fn protected_routes() -> Router {
    use protected::{auth, daily_records, habits};

    Router::new()
        .route("/auth/whoami", get(auth::whoami_get))
        // Habits
        .route("/habits", get(habits::habits_get).post(habits::habits_post))
        .route(
            "/habits/:id",
            get(habits::habit_get)
                .put(habits::habit_put)
                .patch(habits::habit_patch)
                .delete(habits::habit_delete),
        )
        // Daily records
        .route(
            "/daily-records",
            get(daily_records::records_get).post(daily_records::records_post),
        )
        .route(
            "/daily-records/:id",
            get(daily_records::record_get)
                .put(daily_records::record_put)
                .patch(daily_records::record_patch)
                .delete(daily_records::record_delete),
        )
        // Layers run bottom-up: the token is checked before the user lookup
        .route_layer(from_fn(validate_user_middleware))
        .route_layer(from_fn(jwt_auth_middleware))
}

fn cors_layer() -> CorsLayer {
    let security = &config().security;

    if !security.enable_cors {
        return CorsLayer::new();
    }

    if crate::is_development!() || security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Habit Tracker API",
            "version": version,
            "description": "Personal habit tracking with daily records and success tracking",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "public_auth": "/auth/register, /auth/login (public - token acquisition)",
                "auth": "/auth/whoami (protected)",
                "habits": "/habits[/:id] (protected)",
                "daily_records": "/daily-records[/:id] (protected)",
            }
        }
    }))
}

async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": true,
                    "message": "Database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
