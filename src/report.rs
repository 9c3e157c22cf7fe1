use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{FilterSpec, RiskLevel, StudentRecord, Tier};
use crate::risk::{sort_by_severity, tier_meta};
use crate::thresholds::{classify_attendance, classify_fees, classify_test_score};

pub const EMPTY_STATE: &str = "No students match your current filters.";

/// Per-tier counts. Every tier is present, zero when no record carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TierCounts(BTreeMap<RiskLevel, usize>);

impl TierCounts {
    pub fn get(&self, level: RiskLevel) -> usize {
        self.0.get(&level).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }
}

pub fn count_by_tier(records: &[StudentRecord]) -> TierCounts {
    let mut counts: BTreeMap<RiskLevel, usize> =
        RiskLevel::ALL.iter().map(|level| (*level, 0)).collect();

    for record in records {
        *counts.entry(record.risk_level).or_insert(0) += 1;
    }

    TierCounts(counts)
}

pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .collect::<String>()
        .to_uppercase()
}

pub fn render_summary(counts: &TierCounts) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Total Students: {} (Currently enrolled)",
        counts.total()
    );
    for level in RiskLevel::ALL {
        let meta = tier_meta(level);
        let _ = writeln!(
            output,
            "{}: {} ({})",
            meta.label,
            counts.get(level),
            meta.subtitle
        );
    }
    output
}

fn tier_marker(tier: Tier) -> &'static str {
    match tier {
        Tier::Concern => "!!",
        Tier::Caution => "!",
        Tier::Ok => "ok",
    }
}

pub fn render_student_card(record: &StudentRecord) -> String {
    let mut output = String::new();
    let meta = tier_meta(record.risk_level);

    let _ = writeln!(
        output,
        "[{}] {} (Class {}) - {}",
        initials(&record.name),
        record.name,
        record.class_name,
        meta.label
    );
    let _ = writeln!(
        output,
        "    Attendance: {}% [{}]   Risk Score: {}/100",
        record.attendance_pct,
        tier_marker(classify_attendance(record.attendance_pct)),
        record.risk_score
    );
    let _ = writeln!(
        output,
        "    Last Test: {}% [{}]    Fees: {} [{}]",
        record.last_test_score_pct,
        tier_marker(classify_test_score(record.last_test_score_pct)),
        record.fees_status.as_str(),
        tier_marker(classify_fees(record.fees_status))
    );
    let _ = writeln!(output, "    Mentor: {}", record.mentor_name);
    output
}

pub fn render_roster(filtered: &[StudentRecord]) -> String {
    if filtered.is_empty() {
        return format!("{EMPTY_STATE}\n");
    }

    filtered
        .iter()
        .map(render_student_card)
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_filters(spec: &FilterSpec) -> String {
    let query = if spec.query.is_empty() {
        "(none)".to_string()
    } else {
        format!("\"{}\"", spec.query)
    };
    format!(
        "search {}, class {}, risk {}",
        query, spec.class_filter, spec.risk_filter
    )
}

/// Markdown export. Summary counts cover `all_records`; the roster and
/// priority sections cover `filtered`.
pub fn build_report(
    all_records: &[StudentRecord],
    filtered: &[StudentRecord],
    spec: &FilterSpec,
    generated_on: NaiveDate,
) -> String {
    let counts = count_by_tier(all_records);
    let mut output = String::new();

    let _ = writeln!(output, "# Student Risk Report");
    let _ = writeln!(output, "Generated on {}", generated_on);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(output, "- Total students: {}", counts.total());
    for level in RiskLevel::ALL {
        let meta = tier_meta(level);
        let _ = writeln!(
            output,
            "- {}: {} ({})",
            meta.label,
            counts.get(level),
            meta.subtitle
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Filters");
    let _ = writeln!(output, "{}", describe_filters(spec));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Priority Students");

    let priority: Vec<StudentRecord> = sort_by_severity(filtered)
        .into_iter()
        .filter(|record| record.risk_level == RiskLevel::High)
        .collect();

    if priority.is_empty() {
        let _ = writeln!(output, "No high risk students in this view.");
    } else {
        for record in priority.iter() {
            let _ = writeln!(
                output,
                "- {} ({}, mentor {}) score {}/100, attendance {}%, last test {}%, fees {}",
                record.name,
                record.class_name,
                record.mentor_name,
                record.risk_score,
                record.attendance_pct,
                record.last_test_score_pct,
                record.fees_status.as_str()
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Students");

    if filtered.is_empty() {
        let _ = writeln!(output, "{}", EMPTY_STATE);
    } else {
        let _ = writeln!(
            output,
            "| Name | Class | Risk | Score | Attendance | Last Test | Fees | Mentor |"
        );
        let _ = writeln!(output, "|---|---|---|---|---|---|---|---|");
        for record in filtered {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {}% ({}) | {}% ({}) | {} | {} |",
                record.name,
                record.class_name,
                record.risk_level.as_str(),
                record.risk_score,
                record.attendance_pct,
                classify_attendance(record.attendance_pct).label(),
                record.last_test_score_pct,
                classify_test_score(record.last_test_score_pct).label(),
                record.fees_status.as_str(),
                record.mentor_name
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_records;
    use crate::seed::mock_students;

    #[test]
    fn counts_mock_tiers() {
        let counts = count_by_tier(&mock_students());
        assert_eq!(counts.get(RiskLevel::High), 2);
        assert_eq!(counts.get(RiskLevel::Medium), 2);
        assert_eq!(counts.get(RiskLevel::Low), 1);
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn absent_tiers_are_zero_not_missing() {
        let only_high: Vec<StudentRecord> = mock_students()
            .into_iter()
            .filter(|s| s.risk_level == RiskLevel::High)
            .collect();
        let counts = count_by_tier(&only_high);
        assert_eq!(counts.get(RiskLevel::Low), 0);
        assert_eq!(counts.total(), only_high.len());

        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(json, serde_json::json!({"low": 0, "medium": 0, "high": 2}));

        let empty = count_by_tier(&[]);
        assert_eq!(empty.total(), 0);
    }

    #[test]
    fn initials_take_first_letters() {
        assert_eq!(initials("Arjun Sharma"), "AS");
        assert_eq!(initials("  sneha   patel "), "SP");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn card_shows_tiers_and_mentor() {
        let students = mock_students();
        let card = render_student_card(&students[0]);
        assert!(card.contains("[AS] Arjun Sharma (Class 10A) - High Risk"));
        assert!(card.contains("Attendance: 45% [!!]"));
        assert!(card.contains("Risk Score: 85/100"));
        assert!(card.contains("Fees: overdue [!!]"));
        assert!(card.contains("Mentor: Ms. Priya"));
    }

    #[test]
    fn empty_roster_shows_empty_state() {
        assert_eq!(render_roster(&[]), format!("{EMPTY_STATE}\n"));
    }

    #[test]
    fn summary_lists_each_tier() {
        let summary = render_summary(&count_by_tier(&mock_students()));
        assert!(summary.contains("Total Students: 5"));
        assert!(summary.contains("High Risk: 2 (Requires immediate attention)"));
        assert!(summary.contains("Low Risk: 1 (On track for success)"));
    }

    #[test]
    fn report_counts_everything_but_lists_filtered() {
        let students = mock_students();
        let spec = FilterSpec {
            class_filter: "10B".to_string(),
            ..FilterSpec::default()
        };
        let filtered = filter_records(&students, &spec).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let report = build_report(&students, &filtered, &spec, date);

        assert!(report.contains("Generated on 2026-03-01"));
        assert!(report.contains("- Total students: 5"));
        assert!(report.contains("- High Risk: 2"));
        assert!(report.contains("No high risk students in this view."));
        assert!(report.contains("| Sneha Patel | 10B | medium |"));
        assert!(!report.contains("| Arjun Sharma"));
    }

    #[test]
    fn report_priority_section_lists_high_risk() {
        let students = mock_students();
        let spec = FilterSpec::default();
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let report = build_report(&students, &students, &spec, date);
        assert!(report.contains("- Arjun Sharma (10A, mentor Ms. Priya) score 85/100"));
        assert!(report.contains("- Kavya Singh (10C, mentor Dr. Mehta) score 78/100"));
    }
}
