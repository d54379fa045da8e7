use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use locator::config::AppConfig;
use locator::geo::Position;
use locator::models::AppState;
use locator::routes::build_router;
use locator::services::GeocodeSource;

async fn app(dir: &tempfile::TempDir) -> (AppState, Router) {
    let state = AppState::offline(&AppConfig::local(dir.path())).await.unwrap();
    (state.clone(), build_router(state))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn cookie_value(headers: &axum::http::HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{}=", name)))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let req = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={}&password={}", username, password)))
        .unwrap();
    let (status, headers, _) = send(app, req).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    cookie_value(&headers, "session_id").expect("session cookie")
}

#[tokio::test]
async fn test_public_map_page_lists_units() {
    let dir = tempfile::tempdir().unwrap();
    let (_, app) = app(&dir).await;
    let (status, headers, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("ND Drones - Lavras"));
    assert!(body.contains("window.__MAP_CONFIG__"));
    assert!(cookie_value(&headers, "map_id").is_some());
}

#[tokio::test]
async fn test_city_search_reports_coverage() {
    let dir = tempfile::tempdir().unwrap();
    let (_, app) = app(&dir).await;
    let (_, _, covered) = send(&app, get("/?state=MG&city=Lavras")).await;
    assert!(covered.contains("COBERTURA CONFIRMADA"));
    let (_, _, uncovered) = send(&app, get("/?state=MG&city=Nowhere")).await;
    assert!(uncovered.contains("SEM COBERTURA"));
}

#[tokio::test]
async fn test_units_api() {
    let dir = tempfile::tempdir().unwrap();
    let (_, app) = app(&dir).await;
    let (status, headers, body) = send(&app, get("/api/units")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("application/json"));
    let units: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(units.len(), 6);
    assert!(units[0]["coveredCities"].is_array());
    assert!(units[0]["type"].is_string());

    let (status, _, _) = send(&app, get("/api/units/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_map_intents_keep_per_visitor_state() {
    let dir = tempfile::tempdir().unwrap();
    let (_, app) = app(&dir).await;
    let req = Request::builder()
        .method("POST")
        .uri("/api/map")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"action":"focus_unit","id":4}"#))
        .unwrap();
    let (status, headers, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let view: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(view["zoom"], 14);
    assert_eq!(view["filteredResellers"].as_array().unwrap().len(), 1);

    let map_cookie = cookie_value(&headers, "map_id").unwrap();
    let req = Request::builder()
        .uri("/api/map")
        .header(header::COOKIE, &map_cookie)
        .body(Body::empty())
        .unwrap();
    let (_, _, body) = send(&app, req).await;
    let view: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(view["zoom"], 14);

    let req = Request::builder()
        .method("POST")
        .uri("/api/map")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, &map_cookie)
        .body(Body::from(r#"{"action":"focus_unit","id":404}"#))
        .unwrap();
    let (status, _, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_location_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let (_, app) = app(&dir).await;

    let (_, _, body) = send(&app, get("/api/states")).await;
    let states: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(states.len(), 27);

    let (status, _, _) = send(&app, get("/api/states/XX/cities")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, _, body) = send(&app, get("/api/coverage?lat=-21.25&lng=-45.0&radius=100")).await;
    let coverage: Value = serde_json::from_str(&body).unwrap();
    assert!(coverage["count"].as_u64().unwrap() > 0);
    assert!(coverage["cities"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c == "Lavras, MG"));

    let (status, _, _) = send(&app, get("/api/coverage?lat=120&lng=-45.0&radius=100")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, body) = send(&app, get("/api/covered-cities?state=MG")).await;
    let cities: Vec<String> = serde_json::from_str(&body).unwrap();
    assert!(cities.contains(&"Lavras".to_string()));

    let (_, _, body) = send(&app, get("/api/geocode?city=Uberl%C3%A2ndia&state=MG")).await;
    let found: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(found["source"], "catalog");
}

#[tokio::test]
async fn test_admin_requires_login() {
    let dir = tempfile::tempdir().unwrap();
    let (_, app) = app(&dir).await;
    let (status, headers, _) = send(&app, get("/admin")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/login");

    let (status, _, _) = send(&app, get("/login")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_flow_and_role_checks() {
    let dir = tempfile::tempdir().unwrap();
    let (state, app) = app(&dir).await;
    let admin = login(&app, "admin", "admin123").await;

    let req = Request::builder()
        .uri("/admin")
        .header(header::COOKIE, &admin)
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("ND Drones - Unaí"));
    assert!(body.contains("Excluir"));

    let req = Request::builder()
        .method("POST")
        .uri("/admin/units")
        .header(header::COOKIE, &admin)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(
            "name=Regional+Varginha&email=varginha%40example.com&city=Varginha&state=MG&kind=Unidade+Regional&coverage_radius=80",
        ))
        .unwrap();
    let (status, _, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    let created = state
        .units
        .list()
        .into_iter()
        .find(|u| u.name == "Regional Varginha")
        .expect("unit created");
    assert!((created.position.lat - -21.5520).abs() < 1e-6);
    assert!(created.covered_cities.contains(&"Varginha, MG".to_string()));

    locator::services::add_user(&state.users, "op", "pw", locator::models::Role::Operator, "", "").unwrap();
    let operator = login(&app, "op", "pw").await;

    let req = Request::builder()
        .method("POST")
        .uri(format!("/admin/units/{}/delete", created.id))
        .header(header::COOKIE, &operator)
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/admin");
    assert!(state.units.get(created.id).is_some());

    let req = Request::builder()
        .uri("/admin/settings")
        .header(header::COOKIE, &operator)
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/admin");

    let req = Request::builder()
        .method("POST")
        .uri(format!("/admin/units/{}/delete", created.id))
        .header(header::COOKIE, &admin)
        .body(Body::empty())
        .unwrap();
    send(&app, req).await;
    assert!(state.units.get(created.id).is_none());
}

fn unit_form(cookie: &str, fields: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/admin/units")
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(fields.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_typed_coordinates_pinned_only_for_saved_units() {
    let dir = tempfile::tempdir().unwrap();
    let (state, app) = app(&dir).await;
    let admin = login(&app, "admin", "admin123").await;

    let rejected = unit_form(
        &admin,
        "name=Unidade+Serra&email=serra%40example.com&city=Vila+Serrana&state=MG&latitude=120&longitude=-45",
    );
    let (status, _, body) = send(&app, rejected).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("between -90 and 90"));
    let found = state.geocoder.locate("Vila Serrana", "MG").await;
    assert_eq!(found.source, GeocodeSource::Fallback);

    let accepted = unit_form(
        &admin,
        "name=Unidade+Serra&email=serra%40example.com&city=Vila+Serrana&state=MG&latitude=-20.1&longitude=-44.9",
    );
    let (status, _, _) = send(&app, accepted).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    let found = state.geocoder.locate("vila serrana", "mg").await;
    assert_eq!(found.source, GeocodeSource::Cache);
    assert_eq!(found.position, Position::new(-20.1, -44.9));
}

#[tokio::test]
async fn test_settings_update_changes_public_page() {
    let dir = tempfile::tempdir().unwrap();
    let (state, app) = app(&dir).await;
    let admin = login(&app, "admin", "admin123").await;

    let req = Request::builder()
        .method("POST")
        .uri("/admin/settings")
        .header(header::COOKIE, &admin)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(
            "home_title=Revendas+ND&map_type=satellite&session_timeout_minutes=45&db_host=db&db_port=3306&db_database=nd&db_user=nd",
        ))
        .unwrap();
    let (status, _, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(state.settings.get().home_title, "Revendas ND");
    assert_eq!(state.settings.session_timeout_minutes(), 45);

    let (_, _, body) = send(&app, get("/")).await;
    assert!(body.contains("Revendas ND"));
    assert!(body.contains("satellite"));

    let req = Request::builder()
        .method("POST")
        .uri("/admin/settings")
        .header(header::COOKIE, &admin)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("session_timeout_minutes=0&map_type=satellite"))
        .unwrap();
    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("entre 1 e 1440"));
    assert_eq!(state.settings.session_timeout_minutes(), 45);
}

#[tokio::test]
async fn test_stylesheet_is_served() {
    let dir = tempfile::tempdir().unwrap();
    let (_, app) = app(&dir).await;
    let (status, headers, body) = send(&app, get("/static/styles.css")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/css");
    assert!(body.contains(".locator"));
}
