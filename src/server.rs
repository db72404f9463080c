use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::delivery::{self, DeliveryOutcome};
use crate::error::{Result, ServiceError};
use crate::fetch;
use crate::parser;
use crate::report;

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_FILENAME: &str = "all_orders.html";

/// Shared state: configuration plus one HTTP client reused for upstream
/// fetches and deliveries. Requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default = "default_true")]
    pub send_to_telegram: bool,
    #[serde(default)]
    pub return_html: bool,
    #[serde(default = "default_filename")]
    pub filename: String,
}

fn default_true() -> bool {
    true
}

fn default_filename() -> String {
    DEFAULT_FILENAME.to_string()
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub ok: bool,
    pub orders: usize,
    pub sent_to_telegram: bool,
    pub telegram_result: Option<DeliveryOutcome>,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/process", post(process))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP service.
pub async fn run(config: Config, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(config)?;
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("invoice-relay listening on {}", addr);
    info!("  - GET  /         (liveness)");
    info!("  - POST /process  (extract, render, deliver)");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Liveness probe; no auth, no side effects.
async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "service": "invoice-relay" }))
}

async fn process(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>> {
    let api_key = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    process_request(&state, request, api_key).await.map(Json)
}

/// The pipeline behind POST /process. Linear: authorize, resolve input,
/// extract, render, deliver (best effort), summarize. No retries; every step
/// except delivery fails the whole request.
pub async fn process_request(
    state: &AppState,
    request: ProcessRequest,
    api_key: Option<&str>,
) -> Result<ProcessResponse> {
    authorize(&state.config, api_key)?;

    let html = resolve_input(state, &request).await?;

    let orders = parser::parse_orders(&html);
    if orders.is_empty() {
        return Err(ServiceError::NoOrders);
    }
    info!("Extracted {} orders", orders.len());

    let rendered = report::render(&orders);

    // The report passes through a request-scoped temp file on its way to the
    // delivery call; dropping the handle removes the file on every exit path.
    let mut tmp = tempfile::NamedTempFile::new()?;
    tmp.write_all(rendered.as_bytes())?;

    let telegram_result = if request.send_to_telegram {
        let bytes = std::fs::read(tmp.path())?;
        Some(
            delivery::send_document(
                &state.http,
                &state.config,
                bytes,
                &request.filename,
                delivery::DEFAULT_CAPTION,
            )
            .await,
        )
    } else {
        None
    };

    Ok(ProcessResponse {
        ok: true,
        orders: orders.len(),
        sent_to_telegram: request.send_to_telegram,
        telegram_result,
        filename: request.filename,
        html: request.return_html.then_some(rendered),
    })
}

/// Reject before any parsing when a shared secret is configured and the
/// provided key does not match. Without a configured secret every caller
/// passes.
fn authorize(config: &Config, api_key: Option<&str>) -> Result<()> {
    match &config.api_key {
        Some(expected) if api_key != Some(expected.as_str()) => Err(ServiceError::Unauthorized),
        _ => Ok(()),
    }
}

/// Non-empty inline html wins over a url; the url is only fetched otherwise;
/// neither present is a validation failure.
async fn resolve_input(state: &AppState, request: &ProcessRequest) -> Result<String> {
    if let Some(html) = request.html.as_deref().filter(|h| !h.is_empty()) {
        return Ok(html.to_string());
    }
    if let Some(url) = request.url.as_deref().filter(|u| !u.is_empty()) {
        return fetch::fetch_document(&state.http, url).await;
    }
    Err(ServiceError::MissingInput)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(config: Config) -> AppState {
        AppState::new(config).unwrap()
    }

    fn request_with_html(html: &str) -> ProcessRequest {
        ProcessRequest {
            url: None,
            html: Some(html.to_string()),
            send_to_telegram: false,
            return_html: false,
            filename: DEFAULT_FILENAME.to_string(),
        }
    }

    fn fixture() -> String {
        std::fs::read_to_string("tests/fixtures/orders.html").unwrap()
    }

    #[test]
    fn request_defaults_match_the_wire_contract() {
        let request: ProcessRequest = serde_json::from_str("{}").unwrap();
        assert!(request.url.is_none());
        assert!(request.html.is_none());
        assert!(request.send_to_telegram);
        assert!(!request.return_html);
        assert_eq!(request.filename, DEFAULT_FILENAME);
    }

    #[test]
    fn authorize_passes_when_no_secret_is_configured() {
        let config = Config::default();
        assert!(authorize(&config, None).is_ok());
        assert!(authorize(&config, Some("anything")).is_ok());
    }

    #[test]
    fn authorize_rejects_missing_or_mismatched_key() {
        let config = Config {
            api_key: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            authorize(&config, None),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            authorize(&config, Some("wrong")),
            Err(ServiceError::Unauthorized)
        ));
        assert!(authorize(&config, Some("secret")).is_ok());
    }

    #[tokio::test]
    async fn auth_failure_precedes_any_parsing() {
        let state = state_with(Config {
            api_key: Some("secret".to_string()),
            ..Default::default()
        });
        // Would be NoOrders if parsing ran first.
        let result = process_request(&state, request_with_html("<p>nothing</p>"), None).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[tokio::test]
    async fn missing_input_is_rejected() {
        let state = state_with(Config::default());
        let mut request = request_with_html("");
        request.html = None;
        let result = process_request(&state, request, None).await;
        assert!(matches!(result, Err(ServiceError::MissingInput)));
    }

    #[tokio::test]
    async fn empty_html_counts_as_absent() {
        let state = state_with(Config::default());
        let result = process_request(&state, request_with_html(""), None).await;
        assert!(matches!(result, Err(ServiceError::MissingInput)));
    }

    #[tokio::test]
    async fn document_without_orders_is_not_found() {
        let state = state_with(Config::default());
        let result =
            process_request(&state, request_with_html("<html><body></body></html>"), None).await;
        assert!(matches!(result, Err(ServiceError::NoOrders)));
    }

    #[tokio::test]
    async fn summary_without_delivery() {
        let state = state_with(Config::default());
        let response = process_request(&state, request_with_html(&fixture()), None)
            .await
            .unwrap();
        assert!(response.ok);
        assert_eq!(response.orders, 2);
        assert!(!response.sent_to_telegram);
        assert!(response.telegram_result.is_none());
        assert!(response.html.is_none());
        assert_eq!(response.filename, DEFAULT_FILENAME);
    }

    #[tokio::test]
    async fn unconfigured_delivery_is_a_soft_failure() {
        let state = state_with(Config::default());
        let mut request = request_with_html(&fixture());
        request.send_to_telegram = true;
        let response = process_request(&state, request, None).await.unwrap();

        // The request still succeeds; only the delivery outcome reports it.
        assert!(response.ok);
        assert!(response.sent_to_telegram);
        let outcome = response.telegram_result.unwrap();
        assert!(!outcome.ok);
    }

    #[tokio::test]
    async fn return_html_includes_the_rendered_document() {
        let state = state_with(Config::default());
        let mut request = request_with_html(&fixture());
        request.return_html = true;
        let response = process_request(&state, request, None).await.unwrap();

        let html = response.html.unwrap();
        assert!(html.contains("سفارش شماره 1"));
        assert!(html.contains("سفارش شماره 2"));
    }

    #[tokio::test]
    async fn custom_filename_is_echoed_back() {
        let state = state_with(Config::default());
        let mut request = request_with_html(&fixture());
        request.filename = "invoices-140205.html".to_string();
        let response = process_request(&state, request, None).await.unwrap();
        assert_eq!(response.filename, "invoices-140205.html");
    }
}
