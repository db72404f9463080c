use std::time::Duration;

use reqwest::multipart;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::Config;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(60);
const DOCUMENT_MIME: &str = "text/html; charset=utf-8";

/// Notification text attached to the delivered report.
pub const DEFAULT_CAPTION: &str = "📄 فاکتورهای سفارش‌ها آماده شد. لطفاً بررسی فرمایید.";

/// Result of one delivery attempt. Never an error: transport failures fold
/// into `ok = false` so a finished report is not discarded over an
/// unreachable notification channel.
#[derive(Debug, Serialize)]
pub struct DeliveryOutcome {
    pub ok: bool,
    pub response: Value,
}

impl DeliveryOutcome {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            response: json!({ "error": message.into() }),
        }
    }
}

/// Send the report as a named document to the configured chat. Without
/// credentials this returns a failure outcome and makes no network call.
pub async fn send_document(
    client: &Client,
    config: &Config,
    bytes: Vec<u8>,
    filename: &str,
    caption: &str,
) -> DeliveryOutcome {
    let (Some(token), Some(chat_id)) = (&config.telegram_bot_token, &config.telegram_chat_id)
    else {
        return DeliveryOutcome::failed("TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set");
    };

    let document = match multipart::Part::bytes(bytes)
        .file_name(filename.to_string())
        .mime_str(DOCUMENT_MIME)
    {
        Ok(part) => part,
        Err(e) => return DeliveryOutcome::failed(e.to_string()),
    };
    let form = multipart::Form::new()
        .part("document", document)
        .text("chat_id", chat_id.clone())
        .text("caption", caption.to_string())
        .text("parse_mode", "HTML");

    let url = format!("{}/bot{}/sendDocument", TELEGRAM_API_BASE, token);
    match client
        .post(&url)
        .timeout(DELIVERY_TIMEOUT)
        .multipart(form)
        .send()
        .await
    {
        Ok(response) => {
            let ok = response.status().is_success();
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            // The endpoint answers JSON; keep the raw body when it does not.
            let payload = serde_json::from_str(&text)
                .unwrap_or_else(|_| json!({ "status_code": status, "text": text }));
            if ok {
                info!("Delivered '{}' to Telegram", filename);
            } else {
                warn!("Telegram rejected '{}' (status {})", filename, status);
            }
            DeliveryOutcome { ok, response: payload }
        }
        Err(e) => {
            warn!("Telegram delivery failed: {}", e);
            DeliveryOutcome::failed(e.to_string())
        }
    }
}

// ── Tests ──
