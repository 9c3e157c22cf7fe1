use std::str::FromStr;

use crate::error::DashboardError;
use crate::models::{FeesStatus, RiskLevel, StudentRecord, TierMeta};

impl FromStr for RiskLevel {
    type Err = DashboardError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(DashboardError::InvalidRiskLevel(other.to_string())),
        }
    }
}

impl FromStr for FeesStatus {
    type Err = DashboardError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "paid" => Ok(FeesStatus::Paid),
            "overdue" => Ok(FeesStatus::Overdue),
            "partial" => Ok(FeesStatus::Partial),
            other => Err(DashboardError::InvalidFeesStatus(other.to_string())),
        }
    }
}

pub fn tier_meta(level: RiskLevel) -> TierMeta {
    match level {
        RiskLevel::High => TierMeta {
            label: "High Risk",
            subtitle: "Requires immediate attention",
            severity_rank: 3,
        },
        RiskLevel::Medium => TierMeta {
            label: "Medium Risk",
            subtitle: "Monitor closely",
            severity_rank: 2,
        },
        RiskLevel::Low => TierMeta {
            label: "Low Risk",
            subtitle: "On track for success",
            severity_rank: 1,
        },
    }
}

/// Resolves a raw risk tag. Anything outside the closed set is an error.
pub fn resolve_tier(raw: &str) -> Result<TierMeta, DashboardError> {
    raw.parse::<RiskLevel>().map(tier_meta)
}

/// Stable sort, most severe first. Records within a tier keep their order.
pub fn sort_by_severity(records: &[StudentRecord]) -> Vec<StudentRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        tier_meta(b.risk_level)
            .severity_rank
            .cmp(&tier_meta(a.risk_level).severity_rank)
    });
    sorted
}
