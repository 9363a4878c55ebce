//! Risk assessment for source-provided risk payloads.
//!
//! Only Solana Tracker reports risk signals today. Other sources default to
//! not risky.

use serde::{Deserialize, Serialize};

/// Score above which a token is considered risky (Solana Tracker scale 0-100)
pub const MAX_SAFE_RISK_SCORE: f64 = 50.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskCount {
    #[serde(default)]
    pub count: Option<u64>,
}

/// Risk block of a Solana Tracker token entry. Any field may be absent or
/// `null` on the wire; both read as "no signal".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerRisk {
    #[serde(default)]
    pub rugged: Option<bool>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub snipers: Option<RiskCount>,
    #[serde(default)]
    pub insiders: Option<RiskCount>,
}

/// Rugged, high score, or any snipers/insiders present
pub fn assess_tracker_risk(risk: Option<&TrackerRisk>) -> bool {
    let Some(risk) = risk else {
        return false;
    };

    let snipers = risk.snipers.as_ref().and_then(|s| s.count).unwrap_or(0);
    let insiders = risk.insiders.as_ref().and_then(|i| i.count).unwrap_or(0);
    let high_score = risk.score.is_some_and(|score| score > MAX_SAFE_RISK_SCORE);

    risk.rugged.unwrap_or(false) || high_score || snipers > 0 || insiders > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_payload_is_safe() {
        assert!(!assess_tracker_risk(None));
        assert!(!assess_tracker_risk(Some(&TrackerRisk::default())));
    }

    #[test]
    fn test_rugged() {
        let risk = TrackerRisk { rugged: Some(true), ..Default::default() };
        assert!(assess_tracker_risk(Some(&risk)));
    }

    #[test]
    fn test_score_threshold() {
        let at = TrackerRisk { score: Some(50.0), ..Default::default() };
        assert!(!assess_tracker_risk(Some(&at)));

        let above = TrackerRisk { score: Some(50.5), ..Default::default() };
        assert!(assess_tracker_risk(Some(&above)));
    }

    #[test]
    fn test_snipers_and_insiders() {
        let snipers = TrackerRisk {
            snipers: Some(RiskCount { count: Some(1) }),
            ..Default::default()
        };
        assert!(assess_tracker_risk(Some(&snipers)));

        let insiders = TrackerRisk {
            insiders: Some(RiskCount { count: Some(3) }),
            ..Default::default()
        };
        assert!(assess_tracker_risk(Some(&insiders)));

        let zero = TrackerRisk {
            snipers: Some(RiskCount { count: Some(0) }),
            insiders: Some(RiskCount { count: Some(0) }),
            score: Some(10.0),
            rugged: Some(false),
        };
        assert!(!assess_tracker_risk(Some(&zero)));
    }

    #[test]
    fn test_deserialize_partial_payload() {
        let risk: TrackerRisk = serde_json::from_str(r#"{"score": 72}"#).unwrap();
        assert_eq!(risk.score, Some(72.0));
        assert!(assess_tracker_risk(Some(&risk)));
    }

    #[test]
    fn test_null_fields_read_as_no_signal() {
        let risk: TrackerRisk = serde_json::from_str(
            r#"{"rugged": null, "score": null, "snipers": {"count": null}, "insiders": null}"#,
        )
        .unwrap();
        assert_eq!(risk.score, None);
        assert!(!assess_tracker_risk(Some(&risk)));
    }
}
