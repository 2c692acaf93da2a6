//! Quota classification: raw status payload in, display-ready snapshot out.
//!
//! Fetching talks to the verified server port; classification itself is a
//! pure function of the payload and the current instant, so identical
//! payloads always produce identical snapshots.

mod pools;
mod wire;

pub use pools::build_pools;

use crate::error::{CoreError, CoreResult};
use crate::utils::http::{post_loopback, status_client};
use chrono::{DateTime, Utc};
use gravimeter_types::{
    format_countdown, ModelFamily, ModelQuota, ProcessInfo, PromptCredits, QuotaSnapshot,
};
use wire::{RawModelConfig, RawStatusResponse};

/// Status RPC carrying credits and per-model quota.
pub const STATUS_PATH: &str = "/exa.language_server_pb.LanguageServerService/GetUserStatus";

/// Fixed request metadata the status endpoint expects.
fn status_request_body() -> serde_json::Value {
    serde_json::json!({
        "metadata": {
            "ideName": "antigravity",
            "extensionName": "gravimeter",
            "locale": "en"
        }
    })
}

/// Fetches the user status and classifies it into a [`QuotaSnapshot`].
#[derive(Debug, Default)]
pub struct QuotaClassifier;

impl QuotaClassifier {
    pub fn new() -> Self {
        Self
    }

    /// One status call against the located server, classified at `now`.
    pub async fn fetch_and_classify(&self, info: &ProcessInfo) -> CoreResult<QuotaSnapshot> {
        let raw = self.fetch_raw(info).await?;
        let snapshot = classify_at(&raw, Utc::now());
        tracing::debug!(
            pools = snapshot.pools.len(),
            models = snapshot.models.len(),
            "status classified"
        );
        Ok(snapshot)
    }

    async fn fetch_raw(&self, info: &ProcessInfo) -> CoreResult<RawStatusResponse> {
        let client = status_client()?;
        let response =
            post_loopback(&client, info.port, STATUS_PATH, &info.token, &status_request_body())
                .await?;
        if !response.status().is_success() {
            return Err(CoreError::UnexpectedStatus(response.status()));
        }
        let text = response.text().await.map_err(CoreError::Network)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Classify a raw payload at a fixed instant.
///
/// `now` only feeds the formatted countdowns and the snapshot timestamp;
/// grouping and naming depend on the payload alone.
pub(crate) fn classify_at(raw: &RawStatusResponse, now: DateTime<Utc>) -> QuotaSnapshot {
    let user = raw.user_status.as_ref();

    let credits = user.and_then(|u| u.plan_status.as_ref()).and_then(|plan| {
        PromptCredits::from_allotment(
            plan.available_prompt_credits.unwrap_or(0.0),
            plan.monthly_prompt_credits.unwrap_or(0.0),
        )
    });

    let models: Vec<ModelQuota> = user
        .and_then(|u| u.model_configs.as_ref())
        .map(|configs| configs.iter().filter_map(|c| model_quota_at(c, now)).collect())
        .unwrap_or_default();

    let pools = build_pools(&models);

    QuotaSnapshot { credits, pools, models, timestamp: now }
}

/// One wire entry into the typed model. Entries without quota info carry
/// nothing classifiable and are skipped.
fn model_quota_at(config: &RawModelConfig, now: DateTime<Utc>) -> Option<ModelQuota> {
    let quota = config.quota_info.as_ref()?;
    let label = config.label.clone().unwrap_or_default();
    let model_id = config.model_id.clone().unwrap_or_default();
    let family = ModelFamily::from_label_and_id(&label, &model_id);

    let fraction = quota.remaining_fraction.unwrap_or(0.0);
    let reset_time = quota.reset_time.as_ref().and_then(|t| t.to_datetime());
    let time_until_reset =
        reset_time.map(|at| format_countdown(at - now)).unwrap_or_default();

    Some(ModelQuota {
        label,
        model_id,
        family,
        remaining_fraction: fraction,
        remaining_pct: fraction * 100.0,
        is_exhausted: fraction == 0.0,
        reset_time,
        time_until_reset,
    })
}
