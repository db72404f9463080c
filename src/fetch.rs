use reqwest::Client;
use tracing::info;

use crate::error::ServiceError;

/// Fetch the source export document. A non-success upstream status is a hard
/// failure carrying the status code; transport errors map to their own
/// variant since there is no upstream status to report.
pub async fn fetch_document(client: &Client, url: &str) -> Result<String, ServiceError> {
    info!("Fetching source document: {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ServiceError::Upstream(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ServiceError::FetchFailed {
            status: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| ServiceError::Upstream(e.to_string()))
}
