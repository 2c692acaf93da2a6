//! Port verification against the language server's capability endpoint.

use crate::utils::http::post_loopback;
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Cheap RPC that any live language server answers.
pub const PROBE_PATH: &str = "/exa.language_server_pb.LanguageServerService/GetProcesses";

/// True when the port answers the probe with HTTP 200 and a JSON body.
///
/// Anything else fails the port: connection errors, timeouts, non-200
/// statuses (another local service may well own the port) and unparseable
/// bodies all look the same to the caller.
pub async fn verify_port(client: &Client, port: u16, token: &str) -> bool {
    let response =
        match post_loopback(client, port, PROBE_PATH, token, &serde_json::json!({})).await {
            Ok(response) => response,
            Err(e) => {
                tracing::trace!(port, "probe failed: {e}");
                return false;
            },
        };
    if response.status() != StatusCode::OK {
        tracing::trace!(port, status = %response.status(), "probe rejected");
        return false;
    }
    response.json::<Value>().await.is_ok()
}
