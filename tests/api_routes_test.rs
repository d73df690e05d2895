use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

use momenic_proxy::config::Config;
use momenic_proxy::web::{create_router, AppState};

const AJAX_PATH: &str = "/wp-admin/admin-ajax.php";

const MUSIC_PAGE: &str = r#"
    <div class="row">
      <div class="col-md-6 col-lg-4 mb-4">
        <h6 class="mb-0">Beautiful in White</h6>
        <span class="text-gray">Romantic</span>
        <button data-music="/uploads/music/biw.mp3">Play</button>
      </div>
      <div class="col-md-6 col-lg-4 mb-4">
        <h6 class="mb-0">Perfect</h6>
        <span class="text-gray">Pop</span>
        <button data-music="/uploads/music/perfect.mp3">Play</button>
      </div>
    </div>
"#;

/// Config pointing both the upstream and the scraped site at the mock server
fn test_config(server: &ServerGuard) -> Config {
    let mut config = Config::default();
    config.upstream.base_url = server.url();
    config.upstream.email = Some("owner@example.com".to_string());
    config.upstream.password = Some("hunter2".to_string());
    config.scraping.base_url = server.url();
    config.scraping.theme_directory_url = format!("{}/api/themes", server.url());
    config.scraping.timeout = Duration::from_secs(2);
    config
}

fn app(config: Config) -> Router {
    create_router(AppState::from_config(config).unwrap())
}

async fn send_raw(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

// Helper function to send requests to the app
async fn send_request(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let request_builder = Request::builder().method(method).uri(uri);

    let request = if let Some(body) = body {
        request_builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    } else {
        request_builder.body(Body::empty()).unwrap()
    };

    let response = send_raw(app, request).await;
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(json!({}))
    };

    (status, json)
}

/// Login page, login POST and dashboard mocks yielding a working session
async fn mock_login(server: &mut ServerGuard) -> Vec<mockito::Mock> {
    vec![
        server
            .mock("GET", "/login")
            .with_status(200)
            .with_body(r#"<script>var wds = {"__nonce":"aaaaaaaaaa"};</script>"#)
            .create_async()
            .await,
        server
            .mock("POST", AJAX_PATH)
            .match_body(Matcher::Regex(r#"name="email""#.to_string()))
            .with_status(200)
            .with_header("set-cookie", "wordpress_logged_in_x=abc; path=/")
            .with_body("{}")
            .create_async()
            .await,
        server
            .mock("GET", "/dashboard/invitation/create/")
            .with_status(200)
            .with_body(r#"<script>var wds = {"__nonce":"bbbbbbbbbb"};</script>"#)
            .create_async()
            .await,
    ]
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = Server::new_async().await;
    let app = app(test_config(&server));

    let (status, response) = send_request(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert!(response.get("timestamp").is_some());
}

#[tokio::test]
async fn test_theme_proxy_passes_payload_through() {
    let mut server = Server::new_async().await;
    let _login = mock_login(&mut server).await;
    let query = server
        .mock("POST", AJAX_PATH)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".to_string(), "invitation_get_theme".to_string()),
            Matcher::UrlEncoded("category".to_string(), "12".to_string()),
            Matcher::UrlEncoded("__nonce".to_string(), "bbbbbbbbbb".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"success":true,"data":[{"id":7,"name":"Sakura"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let app = app(test_config(&server));
    let (status, response) = send_request(
        &app,
        Method::POST,
        "/api/themes",
        Some(r#"{"category":"12"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        response,
        json!({"success": true, "data": [{"id": 7, "name": "Sakura"}]})
    );
    query.assert_async().await;
}

#[tokio::test]
async fn test_theme_proxy_php_alias() {
    let mut server = Server::new_async().await;
    let _login = mock_login(&mut server).await;
    let _query = server
        .mock("POST", AJAX_PATH)
        .match_body(Matcher::UrlEncoded("name".to_string(), "invitation_get_theme".to_string()))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let app = app(test_config(&server));
    let (status, response) = send_request(&app, Method::POST, "/api/themes.php", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!([]));
}

#[tokio::test]
async fn test_theme_proxy_rejects_other_methods() {
    let server = Server::new_async().await;
    let app = app(test_config(&server));

    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let (status, response) = send_request(&app, method, "/api/themes", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response, json!({"error": "Method not allowed"}));
    }
}

#[tokio::test]
async fn test_theme_proxy_malformed_json() {
    let server = Server::new_async().await;
    let app = app(test_config(&server));

    let (status, response) =
        send_request(&app, Method::POST, "/api/themes", Some("{category:")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
    assert_eq!(response["error"], "Invalid JSON in request body");
}

#[tokio::test]
async fn test_theme_proxy_without_credentials() {
    let mut server = Server::new_async().await;
    let login_page = server.mock("GET", "/login").expect(0).create_async().await;

    let mut config = test_config(&server);
    config.upstream.email = None;
    config.upstream.password = None;
    let app = app(config);

    let (status, response) = send_request(&app, Method::POST, "/api/themes", Some("{}")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["success"], false);
    assert!(response["error"].is_string());
    login_page.assert_async().await;
}

#[tokio::test]
async fn test_theme_proxy_upstream_rejection() {
    let mut server = Server::new_async().await;
    let _login = mock_login(&mut server).await;
    let _query = server
        .mock("POST", AJAX_PATH)
        .match_body(Matcher::UrlEncoded("name".to_string(), "invitation_get_theme".to_string()))
        .with_status(200)
        .with_body(r#"{"success":false,"data":"Kategori tidak ditemukan"}"#)
        .create_async()
        .await;

    let app = app(test_config(&server));
    let (status, response) = send_request(&app, Method::POST, "/api/themes", Some("{}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
    assert_eq!(response["error"], "Kategori tidak ditemukan");
}

#[tokio::test]
async fn test_theme_proxy_structured_rejection() {
    let mut server = Server::new_async().await;
    let _login = mock_login(&mut server).await;
    let _query = server
        .mock("POST", AJAX_PATH)
        .match_body(Matcher::UrlEncoded("name".to_string(), "invitation_get_theme".to_string()))
        .with_status(200)
        .with_body(r#"{"success":false,"data":{"code":"limit","retry":30}}"#)
        .create_async()
        .await;

    let app = app(test_config(&server));
    let (status, response) = send_request(&app, Method::POST, "/api/themes", Some("{}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
    assert_eq!(response["error"], json!({"code": "limit", "retry": 30}));
}

#[tokio::test]
async fn test_theme_proxy_non_object_body_is_unfiltered() {
    let mut server = Server::new_async().await;
    let _login = mock_login(&mut server).await;
    let query = server
        .mock("POST", AJAX_PATH)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".to_string(), "invitation_get_theme".to_string()),
            Matcher::UrlEncoded("category".to_string(), String::new()),
        ]))
        .with_status(200)
        .with_body(r#"{"success":true,"data":[]}"#)
        .expect(2)
        .create_async()
        .await;

    let app = app(test_config(&server));
    for body in [r#""x""#, "42"] {
        let (status, response) = send_request(&app, Method::POST, "/api/themes", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["success"], true);
    }
    query.assert_async().await;
}

#[tokio::test]
async fn test_catalog_themes_filter_and_categories() {
    let mut server = Server::new_async().await;
    let _login = mock_login(&mut server).await;
    let query = server
        .mock("POST", AJAX_PATH)
        .match_body(Matcher::UrlEncoded("name".to_string(), "invitation_get_theme".to_string()))
        .with_status(200)
        .with_body(
            json!({"success": true, "data": [
                {"id": 1, "name": "Sakura", "category": "Floral", "price": "150000"},
                {"id": 2, "name": "Sakura (Tanpa Foto)", "category": "Floral"},
                {"id": 3, "name": "Rustic", "category": {"title": "Adat"}}
            ]})
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let app = app(test_config(&server));

    // Photo themes only unless asked otherwise
    let (status, response) = send_request(&app, Method::GET, "/api/catalog/themes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], true);
    assert_eq!(response["data"]["origin"], "live");
    assert_eq!(response["data"]["total"], 2);
    assert_eq!(response["data"]["items"][0]["price"], 150_000);
    assert_eq!(response["data"]["items"][1]["name"], "Rustic");

    let (_, response) = send_request(
        &app,
        Method::GET,
        "/api/catalog/themes?with_photo=false",
        None,
    )
    .await;
    assert_eq!(response["data"]["origin"], "cache");
    assert_eq!(response["data"]["total"], 1);
    assert_eq!(response["data"]["items"][0]["withPhoto"], false);

    let (_, response) = send_request(
        &app,
        Method::GET,
        "/api/catalog/themes?category=floral",
        None,
    )
    .await;
    assert_eq!(response["data"]["total"], 1);
    assert_eq!(response["data"]["items"][0]["id"], "1");

    let (status, response) =
        send_request(&app, Method::GET, "/api/catalog/themes/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"], json!(["Adat", "Floral"]));
    query.assert_async().await;
}

#[tokio::test]
async fn test_bad_filter_params_are_json_errors() {
    let server = Server::new_async().await;
    let app = app(test_config(&server));

    for (uri, field) in [
        ("/api/catalog/themes?with_photo=maybe", "with_photo"),
        ("/api/theme-directory?category_id=abc", "category_id"),
    ] {
        let response = send_raw(&app, Request::get(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().starts_with(field));
    }
}

#[tokio::test]
async fn test_music_listing_with_search() {
    let mut server = Server::new_async().await;
    let page = server
        .mock("GET", "/music")
        .with_status(200)
        .with_body(MUSIC_PAGE)
        .expect(1)
        .create_async()
        .await;

    let app = app(test_config(&server));

    let (status, response) = send_request(&app, Method::GET, "/api/music", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], true);
    assert_eq!(response["data"]["total"], 2);
    assert_eq!(response["data"]["origin"], "live");
    assert_eq!(response["data"]["items"][0]["id"], 1);
    assert_eq!(
        response["data"]["items"][0]["musicUrl"],
        format!("{}/uploads/music/biw.mp3", server.url())
    );

    // Second request is answered from the cache
    let (status, response) =
        send_request(&app, Method::GET, "/api/music?search=PERFECT", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["origin"], "cache");
    assert_eq!(response["data"]["total"], 1);
    assert_eq!(response["data"]["items"][0]["title"], "Perfect");
    page.assert_async().await;
}

#[tokio::test]
async fn test_listing_rejects_bad_pagination() {
    let server = Server::new_async().await;
    let app = app(test_config(&server));

    let (status, response) = send_request(&app, Method::GET, "/api/music?per_page=500", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
}

#[tokio::test]
async fn test_unknown_video_type() {
    let server = Server::new_async().await;
    let app = app(test_config(&server));

    let (status, response) = send_request(&app, Method::GET, "/api/videos?type=bogus", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
}

#[tokio::test]
async fn test_page_without_cards_is_bad_gateway() {
    let mut server = Server::new_async().await;
    let _page = server
        .mock("GET", "/portofolio")
        .with_status(200)
        .with_body("<html><body><p>Sedang perbaikan</p></body></html>")
        .create_async()
        .await;

    let app = app(test_config(&server));
    let (status, response) = send_request(&app, Method::GET, "/api/portfolio", None).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response["success"], false);
}

#[tokio::test]
async fn test_theme_directory_category_filter() {
    let mut server = Server::new_async().await;
    let _feed = server
        .mock("GET", "/api/themes")
        .with_status(200)
        .with_body(
            json!({"data": [
                {"id": 1, "name": "Rustic Wedding", "category_id": 1},
                {"id": 2, "name": "Dino Party", "category_id": 2},
                {"id": 3, "name": "Garden Wedding", "category_id": "1"}
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let app = app(test_config(&server));

    let (status, response) = send_request(
        &app,
        Method::GET,
        "/api/theme-directory?category_id=1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["total"], 2);
    assert_eq!(response["data"]["items"][1]["name"], "Garden Wedding");

    let (_, response) = send_request(
        &app,
        Method::GET,
        "/api/theme-directory?category_id=0&search=dino",
        None,
    )
    .await;
    assert_eq!(response["data"]["total"], 1);
    assert_eq!(response["data"]["items"][0]["id"], 2);

    let (status, response) =
        send_request(&app, Method::GET, "/api/theme-directory/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"][0]["name"], "All Categories");
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let server = Server::new_async().await;
    let app = app(test_config(&server));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/themes")
        .header(header::ORIGIN, "https://momenic.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = send_raw(&app, request).await;

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let server = Server::new_async().await;
    let app = app(test_config(&server));

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = send_raw(&app, request).await;

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_spa_fallback_serves_index() {
    let server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<div id=\"app\"></div>").unwrap();

    let mut config = test_config(&server);
    config.web.static_dir = Some(dir.path().to_path_buf());
    let app = app(config);

    let request = Request::builder()
        .uri("/katalog/tema/sakura")
        .body(Body::empty())
        .unwrap();
    let response = send_raw(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"<div id=\"app\"></div>");

    // API routes still win over the fallback
    let (status, _) = send_request(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_debug_report_hides_secrets() {
    let mut server = Server::new_async().await;
    let _page = server
        .mock("GET", "/login")
        .with_status(200)
        .with_body(r#"<script>var wds = {"__nonce":"aaaaaaaaaa"};</script>"#)
        .create_async()
        .await;

    let app = app(test_config(&server));
    let (status, response) = send_request(&app, Method::GET, "/api/debug", None).await;

    assert_eq!(status, StatusCode::OK);
    let report = &response["data"];
    assert_eq!(report["credentials"]["email_configured"], true);
    assert_eq!(report["login_page"]["nonce_found"], true);
    assert_eq!(report["login_page"]["extracted_nonce"], "aaaaaaaaaa");
    assert_eq!(report["session"]["store"], "memory");
    assert_eq!(report["session"]["cached"], false);
    assert_eq!(report["ready"], true);

    let text = response.to_string();
    assert!(!text.contains("hunter2"));
    assert!(!text.contains("owner@example.com"));
}
