//! HTTP plumbing for the language server's loopback API.
//!
//! Every request this crate makes goes to `127.0.0.1`. Newer language
//! servers terminate TLS on loopback with a self-signed certificate while
//! older builds speak plaintext, so requests are attempted over an ordered
//! list of transport schemes and certificate validation is disabled.

use crate::error::{CoreError, CoreResult};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// CSRF token header required on every call.
pub const CSRF_HEADER: &str = "X-Csrf-Token";
/// Connect-RPC protocol version header.
pub const PROTOCOL_HEADER: &str = "Connect-Protocol-Version";
/// The only protocol version the server speaks.
pub const PROTOCOL_VERSION: &str = "1";

/// Transport schemes in attempt order.
const SCHEMES: [&str; 2] = ["https", "http"];

/// Port probes must fail fast; a wrong port should not stall discovery.
pub const PROBE_TIMEOUT_SECS: u64 = 2;
/// Status calls get more headroom.
pub const STATUS_TIMEOUT_SECS: u64 = 15;

/// Create the short-timeout client used for port verification.
pub fn probe_client() -> CoreResult<Client> {
    base_builder(PROBE_TIMEOUT_SECS).build().map_err(CoreError::Network)
}

/// Create the client used for status calls.
pub fn status_client() -> CoreResult<Client> {
    base_builder(STATUS_TIMEOUT_SECS).build().map_err(CoreError::Network)
}

/// Shared builder. Invalid certificates are accepted because the peer is
/// always the local language server on a loopback address.
fn base_builder(timeout_secs: u64) -> reqwest::ClientBuilder {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .danger_accept_invalid_certs(true)
        .tcp_nodelay(true)
}

/// POST a JSON body to `path` on `127.0.0.1:<port>`, attempting each
/// transport scheme in order until one yields an HTTP response.
///
/// A response with a non-success status is still a response; only transport
/// failures move on to the next scheme.
pub async fn post_loopback(
    client: &Client,
    port: u16,
    path: &str,
    token: &str,
    body: &Value,
) -> CoreResult<reqwest::Response> {
    let mut last_err: Option<CoreError> = None;
    for scheme in SCHEMES {
        let url = format!("{scheme}://127.0.0.1:{port}{path}");
        match client
            .post(&url)
            .header(CSRF_HEADER, token)
            .header(PROTOCOL_HEADER, PROTOCOL_VERSION)
            .json(body)
            .send()
            .await
        {
            Ok(response) => return Ok(response),
            Err(e) => {
                tracing::debug!(scheme, port, "loopback POST failed: {e}");
                last_err = Some(CoreError::Network(e));
            },
        }
    }
    Err(last_err.unwrap_or_else(|| {
        CoreError::PortUnreachable(format!("no transport scheme reached 127.0.0.1:{port}"))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clients_build() {
        assert!(probe_client().is_ok());
        assert!(status_client().is_ok());
    }

    #[tokio::test]
    async fn post_to_dead_port_reports_network_error() {
        let client = probe_client().unwrap();
        // Port 1 is reserved; nothing listens there on a sane machine.
        let result = post_loopback(&client, 1, "/x", "t", &serde_json::json!({})).await;
        assert!(matches!(result, Err(CoreError::Network(_))));
    }
}
