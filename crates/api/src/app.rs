use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use store::{KvStore, RegistrationStore};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, require_bearer, trace_id};
use crate::routes::{health, referrals, registrations};

#[derive(Clone)]
pub struct AppState {
    pub store: RegistrationStore,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, kv: Arc<dyn KvStore>) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        store: RegistrationStore::new(kv),
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: any origin (the landing page is served from elsewhere)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Business routes, gated by the shared bearer token
    let protected_routes = Router::new()
        .route("/register", post(registrations::register))
        .route("/registrations", get(registrations::list_registrations))
        .route("/leaderboard", get(referrals::leaderboard))
        .route("/referral-stats/:email", get(referrals::referral_stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    // Health is public so load balancers can probe without the token
    let public_routes = Router::new().route("/health", get(health::health_check));

    let api = public_routes.merge(protected_routes);

    Router::new()
        .nest(&config.server.path_prefix, api)
        .route("/metrics", get(metrics_handler))
        // Global middleware (order matters: bottom layers run first)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
