use std::collections::BTreeSet;

use crate::error::DashboardError;
use crate::models::{FilterSpec, RiskLevel, StudentRecord, ALL};

/// Keeps the records that satisfy every predicate of `spec`, in input order.
///
/// An empty result means "no matches" and is not an error. A risk filter
/// outside `all`/`low`/`medium`/`high` is rejected with `InvalidRiskLevel`.
pub fn filter_records(
    records: &[StudentRecord],
    spec: &FilterSpec,
) -> Result<Vec<StudentRecord>, DashboardError> {
    let risk = if spec.risk_filter == ALL {
        None
    } else {
        Some(spec.risk_filter.parse::<RiskLevel>()?)
    };
    let query = spec.query.to_lowercase();

    Ok(records
        .iter()
        .filter(|record| matches_query(record, &query))
        .filter(|record| spec.class_filter == ALL || record.class_name == spec.class_filter)
        .filter(|record| risk.map_or(true, |level| record.risk_level == level))
        .cloned()
        .collect())
}

fn matches_query(record: &StudentRecord, folded_query: &str) -> bool {
    folded_query.is_empty()
        || record.name.to_lowercase().contains(folded_query)
        || record.class_name.to_lowercase().contains(folded_query)
}

/// Distinct class values, sorted, as offered by the class selector.
pub fn available_classes(records: &[StudentRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.class_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
