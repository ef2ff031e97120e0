//! Viewer HTTP server: the static spec surface plus the rendered browser UI.
//!
//! The loader used by the page handler goes through the server's own static
//! routes, so the page renders from exactly the bytes a browser would fetch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path as UrlPath, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;
use tera::Tera;
use tokio::net::TcpListener;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::project::{CONFIG_FILENAME, I18N_DIR, INDEX_FILENAME, STATIC_ROOT};
use crate::viewer::loader::SpecLoader;
use crate::viewer::render;
use crate::viewer::state::{Applied, SpecBrowser, ViewerEvent, ViewerState};

/// Default port for the viewer server.
pub const DEFAULT_PORT: u16 = 4173;
pub const BIND_HOST: &str = "127.0.0.1";

#[derive(Clone)]
struct AppState {
    assets_dir: Arc<PathBuf>,
    loader: Arc<SpecLoader>,
    templates: Arc<Tera>,
}

/// Serve the staged assets and the viewer until the process is terminated.
///
/// The listener is bound by the caller, so bind failures surface as
/// [`Error::ServerStartFailed`] before anything else happens.
pub async fn run_server(assets_dir: PathBuf, listener: TcpListener) -> Result<()> {
    let local_addr = listener
        .local_addr()
        .map_err(|err| Error::ServerStartFailed {
            reason: err.to_string(),
        })?;
    let loader = SpecLoader::new(format!(
        "http://{BIND_HOST}:{}/{STATIC_ROOT}",
        local_addr.port()
    ))?;
    let state = AppState {
        assets_dir: Arc::new(assets_dir),
        loader: Arc::new(loader),
        templates: Arc::new(render::templates()?),
    };

    debug!(%local_addr, "Viewer server listening");
    axum::serve(listener, router(state))
        .await
        .map_err(|err| Error::ServerStartFailed {
            reason: err.to_string(),
        })
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(viewer_page))
        .route(&format!("/{STATIC_ROOT}/{INDEX_FILENAME}"), get(index_json))
        .route(&format!("/{STATIC_ROOT}/{CONFIG_FILENAME}"), get(config_json))
        .route(
            &format!("/{STATIC_ROOT}/{I18N_DIR}/{{language}}/{{filename}}"),
            get(spec_file),
        )
        .with_state(state)
}

async fn index_json(State(state): State<AppState>) -> Response {
    serve_asset(&state.assets_dir, Path::new(INDEX_FILENAME), "application/json").await
}

async fn config_json(State(state): State<AppState>) -> Response {
    serve_asset(&state.assets_dir, Path::new(CONFIG_FILENAME), "application/json").await
}

async fn spec_file(
    State(state): State<AppState>,
    UrlPath((language, filename)): UrlPath<(String, String)>,
) -> Response {
    if !is_safe_component(&language) || !is_safe_component(&filename) {
        return StatusCode::NOT_FOUND.into_response();
    }
    let rel = Path::new(I18N_DIR).join(&language).join(&filename);
    serve_asset(&state.assets_dir, &rel, "application/yaml").await
}

/// Path segments must stay inside the staged asset tree.
fn is_safe_component(component: &str) -> bool {
    !component.is_empty()
        && component != "."
        && component != ".."
        && !component.contains(['/', '\\'])
}

async fn serve_asset(assets_dir: &Path, rel: &Path, content_type: &'static str) -> Response {
    let path = assets_dir.join(rel);
    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        Err(err) => {
            debug!(path = %path.display(), %err, "Asset not found");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ViewerQuery {
    lang: Option<String>,
    file: Option<String>,
    path: Option<String>,
    method: Option<String>,
}

async fn viewer_page(
    State(state): State<AppState>,
    Query(query): Query<ViewerQuery>,
    headers: HeaderMap,
) -> Response {
    match render_viewer(&state, query, &headers).await {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            warn!(%err, "Viewer page failed");
            match render::render_error(&state.templates, &err.to_string()) {
                Ok(html) => (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response(),
                Err(render_err) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, render_err.to_string()).into_response()
                }
            }
        }
    }
}

async fn render_viewer(
    state: &AppState,
    query: ViewerQuery,
    headers: &HeaderMap,
) -> Result<String> {
    let browser_language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());

    let languages = state.loader.available_languages().await?;
    let language = match query.lang {
        Some(lang) => lang,
        None => state.loader.default_language(browser_language).await?,
    };

    let index = state.loader.spec_index().await?;
    let files = index.get(&language).cloned().unwrap_or_default();
    let Some(file) = query.file.or_else(|| files.first().cloned()) else {
        return render::render_error(
            &state.templates,
            &format!("No spec files found for language \"{language}\""),
        );
    };

    let mut browser = SpecBrowser::new();
    let seq = match browser.apply(ViewerEvent::LanguageChanged {
        language: language.clone(),
        file: file.clone(),
    }) {
        Applied::LoadStarted { seq } => seq,
        _ => {
            return render::render_error(&state.templates, "Viewer did not start loading");
        }
    };

    match state.loader.load_spec(&language, &file).await {
        Ok(document) => browser.apply(ViewerEvent::SpecLoaded { seq, document }),
        Err(err) => browser.apply(ViewerEvent::SpecLoadFailed {
            seq,
            message: err.to_string(),
        }),
    };

    if let (Some(path), Some(method)) = (query.path.as_deref(), query.method.as_deref()) {
        browser.select_endpoint(path, method);
    }

    match browser.state() {
        ViewerState::Ready(view) => {
            let page = render::page_view(view, &languages.all, &files);
            render::render_page(&state.templates, &page)
        }
        ViewerState::Error { message } => render::render_error(&state.templates, message),
        ViewerState::Idle | ViewerState::Loading { .. } => {
            render::render_error(&state.templates, "Spec load did not complete")
        }
    }
}
