//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create Axum Router with the static handler
//! - Wire up middleware (tracing, timeout)
//! - Serve files from the site root with SPA fallback

use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::observability::metrics;

/// State injected into handlers.
#[derive(Clone)]
struct SiteState {
    root: Arc<PathBuf>,
    config: Arc<ServerConfig>,
}

/// Static file server with single-page-app fallback.
pub struct DevServer {
    router: Router,
    config: ServerConfig,
}

impl DevServer {
    /// Create a new server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        let state = SiteState {
            root: Arc::new(PathBuf::from(&config.root)),
            config: Arc::new(config.clone()),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: SiteState) -> Router {
        Router::new()
            .route("/", get(serve))
            .route("/{*path}", get(serve))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            root = %self.config.root,
            "Dev server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Dev server stopped");
        Ok(())
    }
}

async fn serve(State(state): State<SiteState>, uri: Uri) -> Response {
    let path = uri.path();

    if let Some(file) = resolve(&state.root, path, &state.config.index_document) {
        if let Ok(body) = tokio::fs::read(&file).await {
            metrics::record_dev_request("file");
            tracing::debug!(path = %path, file = %file.display(), "Serving file");
            return file_response(&file, body);
        }
    }

    let exempt = state.config.exempt_paths.iter().any(|p| p == path)
        || state
            .config
            .asset_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()));
    if exempt {
        metrics::record_dev_request("not_found");
        tracing::debug!(path = %path, "Asset not found");
        return (StatusCode::NOT_FOUND, "File not found").into_response();
    }

    // In-app route: hand back the shell and let the navigator take over.
    let index = state.root.join(&state.config.index_document);
    match tokio::fs::read(&index).await {
        Ok(body) => {
            metrics::record_dev_request("fallback");
            tracing::debug!(path = %path, "Serving SPA shell");
            file_response(&index, body)
        }
        Err(e) => {
            metrics::record_dev_request("not_found");
            tracing::warn!(index = %index.display(), error = %e, "SPA shell missing");
            (StatusCode::NOT_FOUND, "File not found").into_response()
        }
    }
}

/// Map a request path to a regular file under `root`.
///
/// Returns `None` for traversal attempts, directories and missing files.
fn resolve(root: &Path, path: &str, index_document: &str) -> Option<PathBuf> {
    let relative = path.trim_start_matches('/');
    let relative = if relative.is_empty() { index_document } else { relative };

    let relative = Path::new(relative);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }

    let full = root.join(relative);
    full.is_file().then_some(full)
}

fn file_response(file: &Path, body: Vec<u8>) -> Response {
    let extension = file
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    ([(header::CONTENT_TYPE, content_type(&extension))], body).into_response()
}

fn content_type(extension: &str) -> &'static str {
    match extension {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "pdf" => "application/pdf",
        "txt" => "text/plain; charset=utf-8",
        "xml" => "application/xml",
        _ => "application/octet-stream",
    }
}
