//! # Form Server
//!
//! Serves one page per disease with a shared navigation sidebar. A `GET`
//! renders the empty form; a `POST` runs the submission through its flow and
//! renders the same page again with the entered values and one outcome line.
//!
//! The model registry is the only shared state. It is loaded before the server
//! starts and handed to every handler behind an `Arc`.

pub mod render;

use crate::flow;
use crate::registry::ModelRegistry;
use crate::schema::Disease;
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;

pub struct AppState {
    pub registry: ModelRegistry,
}

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Failed to create the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn router(registry: ModelRegistry) -> Router {
    let state = Arc::new(AppState { registry });
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/{slug}", get(show_form).post(submit_form))
        .with_state(state)
}

/// Blocks on the form server until it fails.
pub fn serve(registry: ModelRegistry, addr: SocketAddr) -> Result<(), ServeError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(ServeError::Runtime)?;
    runtime.block_on(run(registry, addr))
}

async fn run(registry: ModelRegistry, addr: SocketAddr) -> Result<(), ServeError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;
    log::info!(
        "Serving {} on http://{}",
        render::APP_TITLE,
        listener.local_addr()?
    );
    axum::serve(listener, router(registry)).await?;
    Ok(())
}

async fn index() -> Redirect {
    Redirect::to(&format!("/{}", Disease::ALL[0].slug()))
}

async fn health() -> &'static str {
    "ok"
}

fn not_found(slug: &str) -> Response {
    log::debug!("No prediction page for '{slug}'");
    (
        StatusCode::NOT_FOUND,
        Html(format!(
            "<!DOCTYPE html><html><body><p>No prediction page named '{}'.</p>\
             <p><a href=\"/\">{}</a></p></body></html>",
            render::escape_html(slug),
            render::APP_TITLE
        )),
    )
        .into_response()
}

async fn show_form(Path(slug): Path<String>) -> Response {
    match slug.parse::<Disease>() {
        Ok(disease) => {
            Html(render::page(disease, &render::default_values(disease), None)).into_response()
        }
        Err(_) => not_found(&slug),
    }
}

/// Orders submitted `f<index>` pairs by form position. Unknown names are
/// ignored and absent fields stay empty.
pub fn form_values(disease: Disease, pairs: Vec<(String, String)>) -> Vec<String> {
    let mut values = vec![String::new(); disease.fields().len()];
    for (name, value) in pairs {
        let index = name
            .strip_prefix('f')
            .and_then(|digits| digits.parse::<usize>().ok());
        match index {
            Some(i) if i < values.len() => values[i] = value,
            _ => log::debug!("Ignoring unknown form field '{name}'"),
        }
    }
    values
}

async fn submit_form(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let disease = match slug.parse::<Disease>() {
        Ok(disease) => disease,
        Err(_) => return not_found(&slug),
    };

    let values = form_values(disease, pairs);
    let outcome = flow::submit(disease, &values, &state.registry);
    Html(render::page(disease, &values, Some(&outcome))).into_response()
}
