//! Wire schema for the language server's GetUserStatus response.
//!
//! Every field is optional: older servers omit whole sections and that
//! must read as "no data", never as a parse error. The raw form is
//! converted into the typed model at this boundary and does not escape it.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawStatusResponse {
    #[serde(rename = "userStatus")]
    pub user_status: Option<RawUserStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawUserStatus {
    #[serde(rename = "planStatus")]
    pub plan_status: Option<RawPlanStatus>,
    #[serde(rename = "modelConfigs")]
    pub model_configs: Option<Vec<RawModelConfig>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPlanStatus {
    #[serde(rename = "monthlyPromptCredits")]
    pub monthly_prompt_credits: Option<f64>,
    #[serde(rename = "availablePromptCredits")]
    pub available_prompt_credits: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawModelConfig {
    pub label: Option<String>,
    #[serde(rename = "modelId")]
    pub model_id: Option<String>,
    #[serde(rename = "quotaInfo")]
    pub quota_info: Option<RawQuotaInfo>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawQuotaInfo {
    #[serde(rename = "remainingFraction")]
    pub remaining_fraction: Option<f64>,
    #[serde(rename = "resetTime")]
    pub reset_time: Option<ResetTime>,
}

/// Reset timestamps arrive as ISO-8601 strings, epoch numbers, or numeric
/// strings depending on server version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ResetTime {
    Text(String),
    Number(f64),
}

impl ResetTime {
    /// Best-effort conversion to a UTC instant. Unparseable values become
    /// `None`, which downstream treats as "no reset scheduled".
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Text(s) => {
                let s = s.trim();
                if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
                    return Some(parsed.with_timezone(&Utc));
                }
                s.parse::<i64>().ok().and_then(epoch_to_datetime)
            },
            Self::Number(n) => epoch_to_datetime(*n as i64),
        }
    }
}

/// Values above 1e11 cannot be epoch seconds for any plausible date, so
/// they are read as milliseconds.
fn epoch_to_datetime(value: i64) -> Option<DateTime<Utc>> {
    if value >= 100_000_000_000 {
        Utc.timestamp_millis_opt(value).single()
    } else {
        Utc.timestamp_opt(value, 0).single()
    }
}
