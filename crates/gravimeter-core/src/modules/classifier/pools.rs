//! Pool construction: equivalence-class grouping plus naming heuristics.

use gravimeter_types::{ModelFamily, ModelQuota, QuotaPool};
use std::cmp::Ordering;

/// Group models into pools.
///
/// Two models share a pool iff their raw `(remaining_fraction, reset_time)`
/// pair is identical: models that deplete together and reset together are
/// drawing on the same upstream pool. Membership never consults a hardcoded
/// model list, so upstream can resplit its pools freely.
///
/// Pools come back ordered by family rank (Gemini before Claude before
/// GPT), ties keeping discovery order.
pub fn build_pools(models: &[ModelQuota]) -> Vec<QuotaPool> {
    let mut buckets: Vec<((u64, Option<i64>), Vec<ModelQuota>)> = Vec::new();
    for model in models {
        let key = model.pool_key();
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(model.clone()),
            None => buckets.push((key, vec![model.clone()])),
        }
    }

    let mut pools: Vec<QuotaPool> =
        buckets.into_iter().filter_map(|(_, members)| make_pool(members)).collect();
    // sort_by_key is stable, so equally-ranked pools keep discovery order.
    pools.sort_by_key(QuotaPool::priority_rank);
    pools
}

/// Build one pool from its members. The representative values come from
/// the most depleted member.
fn make_pool(members: Vec<ModelQuota>) -> Option<QuotaPool> {
    let representative = members
        .iter()
        .min_by(|a, b| {
            a.remaining_pct.partial_cmp(&b.remaining_pct).unwrap_or(Ordering::Equal)
        })?
        .clone();
    let (id, display_name) = name_pool(&members);
    Some(QuotaPool {
        id,
        display_name,
        remaining_pct: representative.remaining_pct,
        is_exhausted: representative.is_exhausted,
        reset_time: representative.reset_time,
        time_until_reset: representative.time_until_reset,
        members,
    })
}

/// Best-effort `(id, display name)` from the member families.
///
/// Membership is already settled at this point; families only label the
/// result. Unrecognized groupings fall back to the first member's label.
fn name_pool(members: &[ModelQuota]) -> (String, String) {
    let has = |family: ModelFamily| members.iter().any(|m| m.family == family);

    let gemini = has(ModelFamily::Gemini);
    let flash = has(ModelFamily::GeminiFlash);
    if gemini && flash {
        ("gemini".to_string(), "Gemini".to_string())
    } else if gemini {
        ("gemini_pro".to_string(), "Gem Pro".to_string())
    } else if flash {
        ("gemini_flash".to_string(), "Gem Flash".to_string())
    } else if has(ModelFamily::Claude) || has(ModelFamily::Gpt) {
        ("claude".to_string(), "Claude".to_string())
    } else {
        let label = members.first().map(|m| m.label.clone()).unwrap_or_default();
        (slug(&label), label)
    }
}

/// Lowercase id slug: runs of non-alphanumerics collapse into single
/// underscores ("SWE-1.5 (free)" -> "swe_1_5_free").
fn slug(label: &str) -> String {
    let mut id = String::with_capacity(label.len());
    let mut pending_sep = false;
    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !id.is_empty() {
                id.push('_');
            }
            id.push(ch.to_ascii_lowercase());
            pending_sep = false;
        } else {
            pending_sep = true;
        }
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn reset_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 21, 15, 0, 0).unwrap()
    }

    fn quota(label: &str, id: &str, fraction: f64, reset: Option<DateTime<Utc>>) -> ModelQuota {
        ModelQuota {
            label: label.to_string(),
            model_id: id.to_string(),
            family: ModelFamily::from_label_and_id(label, id),
            remaining_fraction: fraction,
            remaining_pct: fraction * 100.0,
            is_exhausted: fraction == 0.0,
            reset_time: reset,
            time_until_reset: String::new(),
        }
    }

    #[test]
    fn identical_keys_share_a_pool() {
        let at = Some(reset_at());
        let models = vec![
            quota("Gemini 3 Pro", "gemini-3-pro", 0.82, at),
            quota("Gemini 3 Flash", "gemini-3-flash", 0.82, at),
        ];
        let pools = build_pools(&models);
        assert_eq!(pools.len(), 1);
        assert_eq!(pools[0].members.len(), 2);
        assert_eq!(pools[0].id, "gemini");
        assert_eq!(pools[0].display_name, "Gemini");
    }

    #[test]
    fn different_fraction_splits_pools() {
        let at = Some(reset_at());
        let models = vec![
            quota("Gemini 3 Pro", "gemini-3-pro", 0.82, at),
            quota("Gemini 3 Flash", "gemini-3-flash", 0.97, at),
        ];
        let pools = build_pools(&models);
        assert_eq!(pools.len(), 2);
        assert_eq!(pools[0].id, "gemini_pro");
        assert_eq!(pools[0].display_name, "Gem Pro");
        assert_eq!(pools[1].id, "gemini_flash");
        assert_eq!(pools[1].display_name, "Gem Flash");
    }

    #[test]
    fn different_reset_splits_pools() {
        let models = vec![
            quota("Claude Sonnet 4.5", "claude-sonnet-4-5", 0.5, Some(reset_at())),
            quota(
                "GPT-5.1",
                "gpt-5-1",
                0.5,
                Some(reset_at() + chrono::Duration::milliseconds(1)),
            ),
        ];
        assert_eq!(build_pools(&models).len(), 2);
    }

    #[test]
    fn missing_reset_groups_together() {
        let models = vec![
            quota("Claude Sonnet 4.5", "claude-sonnet-4-5", 0.5, None),
            quota("GPT-5.1", "gpt-5-1", 0.5, None),
        ];
        let pools = build_pools(&models);
        assert_eq!(pools.len(), 1);
        assert_eq!(pools[0].id, "claude");
        assert_eq!(pools[0].display_name, "Claude");
    }

    #[test]
    fn pools_ordered_by_family_rank() {
        let at = Some(reset_at());
        let models = vec![
            quota("Claude Sonnet 4.5", "claude-sonnet-4-5", 0.3, at),
            quota("Gemini 3 Flash", "gemini-3-flash", 0.9, at),
            quota("Gemini 3 Pro", "gemini-3-pro", 0.7, at),
        ];
        let pools = build_pools(&models);
        let ids: Vec<&str> = pools.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["gemini_pro", "gemini_flash", "claude"]);
    }

    #[test]
    fn representative_is_most_depleted() {
        let at = Some(reset_at());
        let models = vec![quota("Gemini 3 Pro", "gemini-3-pro", 0.0, at)];
        let pools = build_pools(&models);
        assert_eq!(pools[0].remaining_pct, 0.0);
        assert!(pools[0].is_exhausted);
        assert_eq!(pools[0].reset_time, at);
    }

    #[test]
    fn unknown_family_falls_back_to_label() {
        let models = vec![quota("SWE-1.5 (free)", "swe-1-5", 0.4, None)];
        let pools = build_pools(&models);
        assert_eq!(pools[0].id, "swe_1_5_free");
        assert_eq!(pools[0].display_name, "SWE-1.5 (free)");
    }

    #[test]
    fn no_models_no_pools() {
        assert!(build_pools(&[]).is_empty());
    }
}
