use serde::Serialize;

pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeesStatus {
    Paid,
    Overdue,
    Partial,
}

impl FeesStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeesStatus::Paid => "paid",
            FeesStatus::Overdue => "overdue",
            FeesStatus::Partial => "partial",
        }
    }
}

/// Qualitative banding of a single numeric metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Concern,
    Caution,
    Ok,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Concern => "concern",
            Tier::Caution => "caution",
            Tier::Ok => "ok",
        }
    }
}

/// One student row. `risk_level` and `risk_score` are supplied independently
/// and are not reconciled against each other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(rename = "mentor")]
    pub mentor_name: String,
    pub risk_level: RiskLevel,
    pub risk_score: i32,
    pub attendance_pct: f64,
    pub last_test_score_pct: f64,
    pub fees_status: FeesStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub query: String,
    pub class_filter: String,
    pub risk_filter: String,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            query: String::new(),
            class_filter: ALL.to_string(),
            risk_filter: ALL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierMeta {
    pub label: &'static str,
    pub subtitle: &'static str,
    pub severity_rank: u8,
}
