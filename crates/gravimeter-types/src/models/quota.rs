//! Quota data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::family::ModelFamily;

/// Quota state of a single model at classification time.
///
/// Value object: fully reconstructed on every poll cycle, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelQuota {
    /// Human-readable label as reported by the language server
    pub label: String,
    /// Model identifier (e.g. "gemini-3-pro")
    pub model_id: String,
    /// Coarse family hint used for pool naming, never for membership
    pub family: ModelFamily,
    /// Raw remaining fraction from the wire, 0.0..=1.0
    pub remaining_fraction: f64,
    /// Remaining percentage, always `remaining_fraction * 100`
    pub remaining_pct: f64,
    /// True iff the raw fraction is exactly zero
    pub is_exhausted: bool,
    /// When this model's quota window resets, if a reset is pending
    pub reset_time: Option<DateTime<Utc>>,
    /// Pre-formatted countdown to `reset_time` ("5m", "2h 5m", "1d 2h")
    pub time_until_reset: String,
}

impl ModelQuota {
    /// Key under which models are grouped into pools.
    ///
    /// Models sharing this key deplete and reset together and are therefore
    /// in the same pool. Uses the raw fraction bits and the epoch-millis
    /// reset instant so that formatting or rounding can never split a pool.
    pub fn pool_key(&self) -> (u64, Option<i64>) {
        (self.remaining_fraction.to_bits(), self.reset_time.map(|t| t.timestamp_millis()))
    }
}

/// A group of models that deplete and reset together.
///
/// Membership is an equivalence class over [`ModelQuota::pool_key`], not a
/// fixed taxonomy: the upstream service can resplit its pools at any time
/// without breaking classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuotaPool {
    /// Short stable identifier ("gemini", "gemini_pro", "claude", ...)
    pub id: String,
    /// Human-readable name ("Gemini", "Gem Pro", "Claude", ...)
    pub display_name: String,
    /// Remaining percentage of the most depleted member
    pub remaining_pct: f64,
    /// True iff the most depleted member is exhausted
    pub is_exhausted: bool,
    /// Reset instant of the most depleted member
    pub reset_time: Option<DateTime<Utc>>,
    /// Pre-formatted countdown of the most depleted member
    pub time_until_reset: String,
    /// Members in discovery order
    pub members: Vec<ModelQuota>,
}

impl QuotaPool {
    /// Display rank: the minimum family priority across members.
    pub fn priority_rank(&self) -> u8 {
        self.members.iter().map(|m| m.family.priority()).min().unwrap_or(u8::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn quota(fraction: f64, reset: Option<DateTime<Utc>>) -> ModelQuota {
        ModelQuota {
            label: "Gemini 3 Pro".to_string(),
            model_id: "gemini-3-pro".to_string(),
            family: ModelFamily::Gemini,
            remaining_fraction: fraction,
            remaining_pct: fraction * 100.0,
            is_exhausted: fraction == 0.0,
            reset_time: reset,
            time_until_reset: String::new(),
        }
    }

    #[test]
    fn test_pool_key_equality() {
        let at = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        assert_eq!(quota(0.5, Some(at)).pool_key(), quota(0.5, Some(at)).pool_key());
    }

    #[test]
    fn test_pool_key_differs_on_fraction() {
        let at = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        assert_ne!(quota(0.5, Some(at)).pool_key(), quota(0.5001, Some(at)).pool_key());
    }

    #[test]
    fn test_pool_key_differs_on_reset() {
        let a = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        let b = a + chrono::Duration::milliseconds(1);
        assert_ne!(quota(0.5, Some(a)).pool_key(), quota(0.5, Some(b)).pool_key());
        assert_ne!(quota(0.5, Some(a)).pool_key(), quota(0.5, None).pool_key());
    }

    #[test]
    fn test_priority_rank_takes_minimum() {
        let at = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        let mut claude = quota(0.5, Some(at));
        claude.family = ModelFamily::Claude;
        let pool = QuotaPool {
            id: "x".to_string(),
            display_name: "X".to_string(),
            remaining_pct: 50.0,
            is_exhausted: false,
            reset_time: Some(at),
            time_until_reset: String::new(),
            members: vec![claude, quota(0.5, Some(at))],
        };
        assert_eq!(pool.priority_rank(), ModelFamily::Gemini.priority());
    }
}
