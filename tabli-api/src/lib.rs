use axum::{
    http::Method,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod bookings;
pub mod checkin;
pub mod error;
pub mod middleware;
pub mod notify;
pub mod preferences;
pub mod restaurants;
pub mod staff;
pub mod state;
pub mod worker;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let staff_routes = staff::routes()
        .merge(auth::session_routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::staff_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(restaurants::routes())
        .merge(bookings::routes())
        .merge(checkin::routes())
        .merge(preferences::routes())
        .merge(auth::routes())
        .merge(staff_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
