//! Remote purchase gateway.
//!
//! The engine only sees [`PurchaseGateway`]; the production implementation is
//! a single JSON `POST` per charge with no retries.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::GatewayError;

/// JSON body sent to the purchase endpoint.
///
/// `user_id` is omitted entirely when no identifier is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseRequest<'a> {
    pub theme: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
}

/// Attempt to charge the client for one palette.
///
/// Implementations make exactly one attempt. `Ok(())` means the charge went
/// through; any error means it did not.
#[async_trait]
pub trait PurchaseGateway: Send + Sync {
    async fn charge(&self, theme: &str, user_id: Option<&str>) -> Result<(), GatewayError>;
}

/// `reqwest`-backed gateway posting to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpPurchaseGateway {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpPurchaseGateway {
    /// Build a gateway. `timeout` bounds the whole request.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        // Fall back to reqwest defaults if builder creation fails for any reason.
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PurchaseGateway for HttpPurchaseGateway {
    async fn charge(&self, theme: &str, user_id: Option<&str>) -> Result<(), GatewayError> {
        let body = PurchaseRequest { theme, user_id };
        debug!(theme = %theme, endpoint = %self.endpoint, "sending purchase request");
        let response = self.http.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(theme = %theme, status = status.as_u16(), "purchase rejected");
            return Err(GatewayError::Status(status.as_u16(), text));
        }
        Ok(())
    }
}
