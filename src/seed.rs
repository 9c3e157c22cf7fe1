use crate::models::{FeesStatus, RiskLevel, StudentRecord};

pub fn mock_students() -> Vec<StudentRecord> {
    let students = vec![
        (
            "1",
            "Arjun Sharma",
            "10A",
            "Ms. Priya",
            RiskLevel::High,
            85,
            45.0,
            32.0,
            FeesStatus::Overdue,
        ),
        (
            "2",
            "Sneha Patel",
            "10B",
            "Mr. Kumar",
            RiskLevel::Medium,
            65,
            75.0,
            68.0,
            FeesStatus::Partial,
        ),
        (
            "3",
            "Rohit Gupta",
            "10A",
            "Ms. Priya",
            RiskLevel::Low,
            25,
            92.0,
            87.0,
            FeesStatus::Paid,
        ),
        (
            "4",
            "Kavya Singh",
            "10C",
            "Dr. Mehta",
            RiskLevel::High,
            78,
            58.0,
            41.0,
            FeesStatus::Overdue,
        ),
        (
            "5",
            "Aditya Jain",
            "10B",
            "Mr. Kumar",
            RiskLevel::Medium,
            55,
            82.0,
            56.0,
            FeesStatus::Paid,
        ),
    ];

    students
        .into_iter()
        .map(
            |(id, name, class_name, mentor, risk_level, risk_score, attendance, test, fees)| {
                StudentRecord {
                    id: id.to_string(),
                    name: name.to_string(),
                    class_name: class_name.to_string(),
                    mentor_name: mentor.to_string(),
                    risk_level,
                    risk_score,
                    attendance_pct: attendance,
                    last_test_score_pct: test,
                    fees_status: fees,
                }
            },
        )
        .collect()
}
