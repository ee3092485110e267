//! Preview server and live-reload event stream.
//!
//! The main server answers HTML requests (rendered, static or a bare shell),
//! the built bundles and the files of the example directory. Live-reload
//! events go out over Server-Sent Events on a second port.

use crate::dev::{DevEvent, SharedState, error_overlay};
use crate::error::{CliError, Result, ResultExt};
use crate::startup::HtmlSource;
use axum::{
    Router,
    body::Body,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response, Sse, sse::Event, sse::KeepAlive},
    routing::get,
};
use loupe_render::{DocumentOptions, RenderRequest, assemble};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio_stream::{StreamExt, wrappers::ReceiverStream};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};

/// Event stream endpoint on the live-reload port.
pub const SSE_PATH: &str = "/__loupe_sse__";

/// Reload client endpoint on the main port.
pub const RELOAD_SCRIPT_PATH: &str = "/__loupe_reload__.js";

const RELOAD_SCRIPT: &str = include_str!("../../assets/dev/reload-client.js");
const PORT_PLACEHOLDER: &str = "__LOUPE_LR_PORT__";

pub struct PreviewServer {
    state: SharedState,
    port: u16,
    live_reload_port: u16,
}

impl PreviewServer {
    pub fn new(state: SharedState, port: u16, live_reload_port: u16) -> Self {
        Self {
            state,
            port,
            live_reload_port,
        }
    }

    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    /// Bind both ports and serve until one of the servers stops.
    pub async fn start(self) -> Result<()> {
        let main = bind(self.port).await?;
        let live_reload = bind(self.live_reload_port).await?;

        crate::ui::success(&format!("Preview server running at {}", self.url()));
        tracing::debug!("live reload on port {}", self.live_reload_port);

        let app = build_router(self.state.clone());
        let events = build_live_reload_router(self.state);

        tokio::try_join!(
            async { axum::serve(main, app).await },
            async { axum::serve(live_reload, events).await },
        )
        .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}

async fn bind(port: u16) -> Result<tokio::net::TcpListener> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to {addr}"))
        .with_hint("Pass --port / --live-reload-port or set them in loupe.config.json")
}

/// Router of the main preview port.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route(RELOAD_SCRIPT_PATH, get(handle_reload_script))
        .route("/favicon.ico", get(handle_favicon))
        .fallback(handle_request)
        .layer(CompressionLayer::new())
        .with_state(state)
}

/// Router of the live-reload port. Pages are served from the other port, so
/// CORS is open.
pub fn build_live_reload_router(state: SharedState) -> Router {
    Router::new()
        .route(SSE_PATH, get(handle_sse))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn handle_sse(
    State(state): State<SharedState>,
) -> Sse<impl tokio_stream::Stream<Item = std::result::Result<Event, Infallible>>> {
    let (id, rx) = state.register_client();
    tracing::debug!("live reload client {} connected", id);
    state.broadcast(&DevEvent::ClientConnected { id }).await;

    let stream = ReceiverStream::new(rx).map(|data| Ok(Event::default().data(data)));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

async fn handle_reload_script(State(state): State<SharedState>) -> Response {
    let script = RELOAD_SCRIPT.replace(PORT_PLACEHOLDER, &state.live_reload_port.to_string());
    respond(StatusCode::OK, "application/javascript; charset=utf-8", script)
}

async fn handle_favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn handle_request(State(state): State<SharedState>, uri: Uri) -> Response {
    let path = uri.path();

    if let Some((content, content_type)) = state.get_cached_file(path) {
        return respond(StatusCode::OK, &content_type, content);
    }

    if path == "/" || path == "/index.html" {
        return html_response(&state, &uri).await;
    }

    if let Some(file) = resolve_static(&state.static_dir, path) {
        return match tokio::fs::read(&file).await {
            Ok(content) => {
                let content_type = determine_content_type(path);
                if content_type.starts_with("text/html") {
                    let html = inject_reload_script(&String::from_utf8_lossy(&content));
                    respond(StatusCode::OK, content_type, html)
                } else {
                    respond(StatusCode::OK, content_type, content)
                }
            }
            Err(e) => {
                tracing::warn!("failed to read {}: {}", file.display(), e);
                respond(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "text/plain; charset=utf-8",
                    e.to_string(),
                )
            }
        };
    }

    if state.spa_mode && Path::new(path).extension().is_none() {
        return html_response(&state, &uri).await;
    }

    respond(
        StatusCode::NOT_FOUND,
        "text/plain; charset=utf-8",
        format!("File not found: {}", path),
    )
}

/// Answer a document request from the configured HTML source.
async fn html_response(state: &SharedState, uri: &Uri) -> Response {
    if let Some(error) = state.get_status().error() {
        let overlay = error_overlay::generate_error_overlay(error);
        return html(inject_reload_script(&overlay));
    }

    match &state.html {
        HtmlSource::Render(pipeline) => {
            let target = uri.path_and_query().map_or("/", |pq| pq.as_str());
            let request = RenderRequest::new(target, state.aliases.clone());
            match pipeline.request(request).await {
                Ok(document) => html(inject_reload_script(&document)),
                Err(err) => {
                    tracing::error!("{}", err);
                    respond(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "text/plain; charset=utf-8",
                        err.to_string(),
                    )
                }
            }
        }
        HtmlSource::Static(markup) => match tokio::fs::read_to_string(markup).await {
            Ok(document) => html(inject_reload_script(&document)),
            Err(e) => respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                "text/plain; charset=utf-8",
                format!("Failed to read {}: {}", markup.display(), e),
            ),
        },
        HtmlSource::None => {
            let options = DocumentOptions::new(None, state.project_name.clone());
            html(inject_reload_script(&assemble(&state.aliases, "", &options)))
        }
    }
}

fn html(document: String) -> Response {
    respond(StatusCode::OK, "text/html; charset=utf-8", document)
}

fn respond(status: StatusCode, content_type: &str, body: impl Into<Body>) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        body.into(),
    )
        .into_response()
}

/// Add the reload client before the closing `</body>` tag.
pub fn inject_reload_script(html: &str) -> String {
    let script_tag = format!(r#"<script src="{}"></script>"#, RELOAD_SCRIPT_PATH);

    match html.rfind("</body>") {
        Some(pos) => {
            let mut result = String::with_capacity(html.len() + script_tag.len());
            result.push_str(&html[..pos]);
            result.push_str(&script_tag);
            result.push_str(&html[pos..]);
            result
        }
        None => format!("{}{}", html, script_tag),
    }
}

/// Map a request path onto a file of `dir`, refusing anything that is not a
/// plain relative path.
fn resolve_static(dir: &Path, path: &str) -> Option<PathBuf> {
    let rel = Path::new(path.trim_start_matches('/'));
    if rel.as_os_str().is_empty() || rel.components().any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    let file = dir.join(rel);
    file.is_file().then_some(file)
}

fn determine_content_type(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    match extension {
        "js" | "mjs" | "jsx" => "application/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "html" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
