pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/me", get(routes::auth::me));

    // Host-facing webinar management plus the public/attendee surface
    let webinar_routes = Router::new()
        .route("/", get(routes::webinar::list))
        .route("/", post(routes::webinar::create))
        .route("/{webinar_id}", get(routes::webinar::get))
        .route("/{webinar_id}", put(routes::webinar::update))
        .route("/{webinar_id}", delete(routes::webinar::delete))
        .route("/{webinar_id}/go-live", post(routes::webinar::go_live))
        .route("/{webinar_id}/end", post(routes::webinar::end))
        .route("/{webinar_id}/public", get(routes::webinar::public))
        .route("/{webinar_id}/notify", post(routes::webinar::notify))
        .route("/{webinar_id}/register", post(routes::attendee::register))
        .route("/{webinar_id}/join", post(routes::attendee::join))
        .route("/{webinar_id}/leave", post(routes::attendee::leave))
        .route("/{webinar_id}/attendee", get(routes::attendee::list))
        .route("/{webinar_id}/lead", post(routes::lead::capture));

    let lead_routes = Router::new().route("/", get(routes::lead::list));

    let customer_routes = Router::new().route("/", get(routes::customer::list));

    let sale_routes = Router::new().route("/", get(routes::sale::list));

    // Checkout requires no auth (anonymous buyers carry no user id); the
    // webhook is authenticated by its Stripe signature instead.
    let payment_routes = Router::new()
        .route("/checkout", post(routes::payment::checkout))
        .route("/webhook", post(routes::payment::webhook));

    let dashboard_routes = Router::new()
        .route("/stats", get(routes::dashboard::stats))
        .route("/analytics", get(routes::dashboard::analytics));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/webinar", webinar_routes)
        .nest("/lead", lead_routes)
        .nest("/customer", customer_routes)
        .nest("/sale", sale_routes)
        .nest("/payment", payment_routes)
        .nest("/dashboard", dashboard_routes);

    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
