use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::models::AppState;

// Embed the default stylesheet in the binary
const DEFAULT_STYLESHEET: &str = include_str!("../static/styles.css");

/// Read-only JSON endpoints consumed by the map page and third-party sites.
fn api_routes() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/units", get(handlers::api_units_list))
        .route("/units/:id", get(handlers::api_unit_get))
        .route("/map", get(handlers::api_map_get).post(handlers::api_map_post))
        .route("/states", get(handlers::api_states))
        .route("/states/:uf/cities", get(handlers::api_state_cities))
        .route("/cities/search", get(handlers::api_city_search))
        .route("/covered-cities", get(handlers::api_covered_cities))
        .route("/coverage", get(handlers::api_coverage))
        .route("/geocode", get(handlers::api_geocode))
        .layer(cors)
}

pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/admin", get(handlers::admin_index))
        .route("/admin/units", post(handlers::unit_create_post))
        .route("/admin/units/new", get(handlers::unit_new_get))
        .route("/admin/units/refresh", post(handlers::units_refresh_post))
        .route("/admin/units/:id", post(handlers::unit_update_post))
        .route("/admin/units/:id/edit", get(handlers::unit_edit_get))
        .route("/admin/units/:id/delete", post(handlers::unit_delete_post))
        .route(
            "/admin/settings",
            get(handlers::settings_get).post(handlers::settings_post),
        )
        .route(
            "/admin/settings/test-database",
            post(handlers::settings_test_database),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            handlers::middleware::auth_middleware,
        ));

    // Always serve styles.css - use custom if provided, otherwise use embedded default
    let stylesheet_content = state
        .custom_css
        .clone()
        .unwrap_or_else(|| DEFAULT_STYLESHEET.to_string());

    Router::new()
        .route("/", get(handlers::index_get))
        .route("/login", get(handlers::login_get).post(handlers::login_post))
        .route("/logout", post(handlers::logout_post))
        .route(
            "/static/styles.css",
            get(move || {
                let css = stylesheet_content.clone();
                async move { ([(CONTENT_TYPE, "text/css")], css) }
            }),
        )
        .nest("/api", api_routes())
        .merge(protected_routes)
        .nest_service(
            "/static",
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    CACHE_CONTROL,
                    HeaderValue::from_static("public, max-age=3600"),
                ))
                .service(ServeDir::new("static")),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
