use application::ArticleApp;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use config::CorsPolicy;
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub mod dto;
pub mod error;
pub mod handlers;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub article_app: Arc<ArticleApp>,
}

impl AppState {
    pub fn new(article_app: Arc<ArticleApp>) -> Self {
        Self { article_app }
    }
}

/// CORS is configuration: `AllowAll` answers any origin, method and header.
pub fn cors_layer(policy: &CorsPolicy) -> CorsLayer {
    let origins = match policy {
        CorsPolicy::AllowAll => AllowOrigin::from(Any),
        CorsPolicy::AllowOrigins(origins) => AllowOrigin::list(origins.iter().filter_map(
            |origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            },
        )),
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn router(state: AppState, cors: &CorsPolicy) -> Router {
    Router::new()
        .route("/article", post(handlers::create_article))
        .route("/article/:limit/:offset", get(handlers::list_articles))
        .route(
            "/article/:id",
            get(handlers::get_article)
                .patch(handlers::patch_article)
                .delete(handlers::delete_article),
        )
        .route("/health", get(handlers::health_check))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `shutdown` resolves, then let in-flight requests finish.
pub async fn serve<F>(
    listener: tokio::net::TcpListener,
    app: Router,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(address) = listener.local_addr() {
        info!("API Server listening on http://{}", address);
    }
    info!("API routes:");
    info!("   POST   /article                  - Create article");
    info!("   GET    /article/:limit/:offset   - List articles (?published_only=true)");
    info!("   GET    /article/:id              - Get article");
    info!("   PATCH  /article/:id              - Partially update article");
    info!("   DELETE /article/:id              - Move article to trash");
    info!("   GET    /health                   - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
