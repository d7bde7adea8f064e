//! Scalar host metrics published by `api/v1/_system_data`.

use serde::{Deserialize, Serialize};

/// One wholesale metrics reading. Every tick replaces the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetricsSnapshot {
    /// Host description, e.g. `"fn-host - Linux 6.1.0"`.
    pub system: String,
    pub cpu_percent: f64,
    pub memory_used: u64,
    pub memory_total: u64,
    pub disk_used: u64,
    pub disk_total: u64,
}

impl SystemMetricsSnapshot {
    pub fn memory_percent(&self) -> f64 {
        ratio_percent(self.memory_used, self.memory_total)
    }

    pub fn disk_percent(&self) -> f64 {
        ratio_percent(self.disk_used, self.disk_total)
    }

    /// Memory percentage at display precision; thresholds compare against this.
    pub fn memory_percent_rounded(&self) -> f64 {
        round2(self.memory_percent())
    }

    pub fn disk_percent_rounded(&self) -> f64 {
        round2(self.disk_percent())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn ratio_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (used as f64 / total as f64) * 100.0
}

/// Accepts the snapshot either bare or wrapped as `{ ok, result: {...} }`.
///
/// The server wraps it; older page scripts read the fields at the top level.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SystemDataResponse {
    Enveloped { result: SystemMetricsSnapshot },
    Bare(SystemMetricsSnapshot),
}

impl SystemDataResponse {
    pub fn into_snapshot(self) -> SystemMetricsSnapshot {
        match self {
            SystemDataResponse::Enveloped { result } => result,
            SystemDataResponse::Bare(snapshot) => snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &str = r#""system":"host - Linux","cpu_percent":12.5,"memory_used":1073741824,"memory_total":4294967296,"disk_used":0,"disk_total":0"#;

    #[test]
    fn accepts_enveloped_and_bare_payloads() {
        let wrapped: SystemDataResponse = serde_json::from_str(&format!(r#"{{"ok":true,"result":{{{FIELDS}}}}}"#)).expect("wrapped");
        let bare: SystemDataResponse = serde_json::from_str(&format!("{{{FIELDS}}}")).expect("bare");
        assert_eq!(wrapped.into_snapshot(), bare.into_snapshot());
    }

    #[test]
    fn percentages_guard_zero_totals() {
        let bare: SystemDataResponse = serde_json::from_str(&format!("{{{FIELDS}}}")).expect("bare");
        let snapshot = bare.into_snapshot();
        assert_eq!(snapshot.memory_percent(), 25.0);
        assert_eq!(snapshot.disk_percent(), 0.0);
    }

    #[test]
    fn rounded_percentages_use_two_decimals() {
        let bare: SystemDataResponse = serde_json::from_str(
            r#"{"system":"h","cpu_percent":0,"memory_used":74999,"memory_total":100000,"disk_used":79994,"disk_total":100000}"#,
        )
        .expect("bare");
        let snapshot = bare.into_snapshot();
        assert_eq!(snapshot.memory_percent_rounded(), 75.0);
        assert_eq!(snapshot.disk_percent_rounded(), 79.99);
    }
}
