//! Snapshot models handed to the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::quota::{ModelQuota, QuotaPool};

/// Prompt-credit balance, present only when the plan declares a strictly
/// positive monthly allotment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptCredits {
    /// Credits still available this cycle
    pub available: f64,
    /// Monthly allotment
    pub monthly: f64,
    /// `available / monthly * 100`
    pub remaining_pct: f64,
}

impl PromptCredits {
    /// Build credits from the raw plan numbers. Returns `None` unless the
    /// monthly allotment is strictly positive.
    pub fn from_allotment(available: f64, monthly: f64) -> Option<Self> {
        (monthly > 0.0).then(|| Self { available, monthly, remaining_pct: available / monthly * 100.0 })
    }
}

/// One complete classification result.
///
/// A snapshot replaces the previous snapshot wholesale; nothing is merged
/// across poll cycles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuotaSnapshot {
    /// Prompt credits, when the plan has a monthly allotment
    pub credits: Option<PromptCredits>,
    /// Pools in display order
    pub pools: Vec<QuotaPool>,
    /// Flat model list in wire order
    pub models: Vec<ModelQuota>,
    /// When this snapshot was classified
    pub timestamp: DateTime<Utc>,
}

impl QuotaSnapshot {
    /// The most depleted pool, if any.
    pub fn lowest_pool(&self) -> Option<&QuotaPool> {
        self.pools
            .iter()
            .min_by(|a, b| a.remaining_pct.partial_cmp(&b.remaining_pct).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// True if any pool is fully exhausted.
    pub fn any_exhausted(&self) -> bool {
        self.pools.iter().any(|p| p.is_exhausted)
    }

    /// Look up a pool by id.
    pub fn pool(&self, id: &str) -> Option<&QuotaPool> {
        self.pools.iter().find(|p| p.id == id)
    }
}

/// Uniform signal surfaced to the presentation layer.
///
/// Locate/fetch failures never cross the core boundary as errors; callers
/// see `Unavailable` and re-enter their loading/error display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum WatchState {
    /// No cycle has completed yet
    Detecting,
    /// Last cycle produced a snapshot
    Ready(QuotaSnapshot),
    /// Last cycle failed (no process / no port / fetch error)
    Unavailable,
}

impl WatchState {
    /// The snapshot carried by `Ready`, if any.
    pub fn snapshot(&self) -> Option<&QuotaSnapshot> {
        match self {
            Self::Ready(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}
