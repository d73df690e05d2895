//! Web layer
//!
//! Axum router, shared state and server lifecycle. Routes:
//!
//! - `POST /api/themes`, `POST /api/themes.php`: authenticated theme query proxy
//! - `GET /api/catalog/themes[/categories]`: normalized theme catalog
//! - `GET /api/music`, `/api/videos`, `/api/portfolio`: scraped listings
//! - `GET /api/theme-directory[/categories]`: public theme directory
//! - `GET /api/debug`, `GET /health`: diagnostics
//!
//! Anything else is served from `web.static_dir` when configured.

use anyhow::Result;
use axum::{
    middleware::from_fn,
    routing::{get, post, MethodRouter},
    Router,
};
use chrono::{DateTime, Utc};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};
use tracing::info;

use crate::catalog::CatalogService;
use crate::config::Config;
use crate::errors::AppResult;
use crate::scraping::{CacheStore, PageSource, RelayFetcher, ScrapingService};
use crate::upstream::{create_session_store, SessionManager, UpstreamClient};

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod responses;

pub use extractors::{ListingParams, ThemeQueryBody};
pub use responses::{handle_error, ApiResponse, PaginatedResponse, SourcedPage};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionManager>,
    pub catalog: Arc<CatalogService>,
    pub scraping: Arc<ScrapingService>,
    pub start_time: DateTime<Utc>,
}

impl AppState {
    /// Wire every service from configuration
    pub fn from_config(config: Config) -> AppResult<Self> {
        let client = Arc::new(UpstreamClient::new(config.upstream.clone())?);
        let store = create_session_store(&config.session);
        let sessions = Arc::new(SessionManager::new(client, store, config.session.ttl));

        let catalog = Arc::new(CatalogService::new(
            sessions.clone(),
            CacheStore::in_memory(config.catalog.cache_ttl),
        ));

        let fetcher: Arc<dyn PageSource> = Arc::new(RelayFetcher::from_config(
            &config.scraping,
            &config.upstream.user_agent,
        )?);
        let scraping = Arc::new(ScrapingService::new(config.scraping.clone(), fetcher)?);

        Ok(Self {
            config: Arc::new(config),
            sessions,
            catalog,
            scraping,
            start_time: Utc::now(),
        })
    }
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(state: AppState) -> Result<Self> {
        let addr: SocketAddr =
            format!("{}:{}", state.config.web.host, state.config.web.port).parse()?;
        let app = create_router(state);
        Ok(Self { app, addr })
    }

    /// Start the web server, stopping on Ctrl-C
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!("Listening on http://{}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutdown signal received");
            })
            .await?;
        Ok(())
    }
}

fn theme_routes() -> MethodRouter<AppState> {
    post(handlers::themes::proxy_themes).fallback(handlers::themes::method_not_allowed)
}

/// Static files with `index.html` for unknown paths so client-side routes resolve
fn spa_service(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}

/// Create the router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/themes", theme_routes())
        .route("/api/themes.php", theme_routes())
        .route("/api/catalog/themes", get(handlers::catalog::list_themes))
        .route(
            "/api/catalog/themes/categories",
            get(handlers::catalog::list_categories),
        )
        .route("/api/music", get(handlers::scraping::list_music))
        .route("/api/videos", get(handlers::scraping::list_videos))
        .route("/api/portfolio", get(handlers::scraping::list_portfolio))
        .route(
            "/api/theme-directory",
            get(handlers::scraping::list_theme_directory),
        )
        .route(
            "/api/theme-directory/categories",
            get(handlers::scraping::directory_categories),
        )
        .route("/api/debug", get(handlers::debug::diagnostics));

    if let Some(dir) = &state.config.web.static_dir {
        info!("Serving SPA from {}", dir.display());
        router = router.fallback_service(spa_service(dir));
    }

    router
        .layer(from_fn(middleware::request_logging_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
