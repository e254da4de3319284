// Shared HTTP plumbing for the remote services
use crate::application::error::GatewayError;
use std::time::Duration;

pub fn build_client(timeout: Option<Duration>) -> anyhow::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// GET `url` and return the body, mapping transport errors and non-2xx
/// statuses to `GatewayError`.
pub async fn get_text(client: &reqwest::Client, url: &str) -> Result<String, GatewayError> {
    tracing::debug!("GET {}", url);

    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| GatewayError::Network(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(GatewayError::Status { status, body });
    }

    response
        .text()
        .await
        .map_err(|e| GatewayError::Network(e.to_string()))
}
