//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Extension, Request},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::domains::auth::JwtService;
use crate::kernel::ServerDeps;
use crate::server::graphql::{create_schema, GraphQLContext};
use crate::server::middleware::{jwt_auth_middleware, AuthUser};
use crate::server::routes::{
    fire_event_handler, graphql_handler, graphql_playground, health_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub server_deps: Arc<ServerDeps>,
    pub jwt_service: Arc<JwtService>,
    pub internal_api_secret: Arc<str>,
}

/// Settings for the HTTP layer
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub internal_api_secret: String,
    /// Empty means any origin (development)
    pub allowed_origins: Vec<String>,
}

/// Middleware to create GraphQLContext per-request
async fn create_graphql_context(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Extract auth user from request extensions (populated by jwt_auth_middleware)
    let auth_user = request.extensions().get::<AuthUser>().cloned();

    let context = GraphQLContext::new(state.server_deps.clone(), auth_user);
    request.extensions_mut().insert(context);

    next.run(request).await
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

/// Build the Axum application router
pub fn build_app(server_deps: ServerDeps, settings: AppSettings) -> Router {
    // Create GraphQL schema (singleton)
    let schema = Arc::new(create_schema());

    let jwt_service = Arc::new(JwtService::new(&settings.jwt_secret, settings.jwt_issuer));

    let app_state = AppState {
        db_pool: server_deps.db_pool.clone(),
        server_deps: Arc::new(server_deps),
        jwt_service: jwt_service.clone(),
        internal_api_secret: Arc::from(settings.internal_api_secret),
    };

    let mut router = Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/internal/events", post(fire_event_handler));

    // GraphQL playground only in debug builds (development)
    #[cfg(debug_assertions)]
    {
        router = router.route("/graphql", get(graphql_playground));
    }

    router
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(create_graphql_context))
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors_layer(&settings.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(schema)
}
