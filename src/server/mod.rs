//! HTTP server: routes, shared state, and startup

mod error;
mod form;
mod handlers;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::MarkdownRenderer;
use crate::store::PostStore;
use crate::templates::{SiteData, TemplateRenderer};
use crate::Blog;

pub use error::AppError;
pub use form::PostForm;

/// Process-wide dependencies handed to every handler
///
/// Built once before serving; handlers only read from it.
pub struct AppState {
    pub store: Arc<dyn PostStore>,
    pub templates: TemplateRenderer,
    pub markdown: MarkdownRenderer,
}

pub type SharedState = Arc<AppState>;

/// Largest accepted form submission
pub const MAX_FORM_BYTES: usize = 10 * 1024 * 1024;

/// Build the route table
pub fn router(state: SharedState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/resume", get(handlers::resume))
        .route(
            "/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route("/posts/new", get(handlers::new_post))
        .route("/posts/:slug", get(handlers::show_post))
        .route(
            "/posts/:slug/edit",
            get(handlers::edit_post).post(handlers::update_post),
        )
        .route("/posts/:slug/delete", post(handlers::delete_post))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(MAX_FORM_BYTES))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start serving the blog
pub async fn start(blog: &Blog, store: Arc<dyn PostStore>, ip: &str, port: u16) -> Result<()> {
    let templates = TemplateRenderer::load(&blog.templates_dir, &SiteData::from(&blog.config))?;

    let state = Arc::new(AppState {
        store,
        templates,
        markdown: MarkdownRenderer::new(),
    });

    let app = router(state, &blog.static_dir);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server starting on http://{}:{}", ip, port);
    axum::serve(listener, app).await?;

    Ok(())
}
