use crate::models::{FeesStatus, Tier};

pub const ATTENDANCE_CAUTION_FROM: f64 = 60.0;
pub const ATTENDANCE_OK_FROM: f64 = 80.0;
pub const TEST_SCORE_CAUTION_FROM: f64 = 40.0;
pub const TEST_SCORE_OK_FROM: f64 = 70.0;

pub fn classify_attendance(pct: f64) -> Tier {
    band(pct, ATTENDANCE_CAUTION_FROM, ATTENDANCE_OK_FROM)
}

pub fn classify_test_score(pct: f64) -> Tier {
    band(pct, TEST_SCORE_CAUTION_FROM, TEST_SCORE_OK_FROM)
}

pub fn classify_fees(status: FeesStatus) -> Tier {
    match status {
        FeesStatus::Paid => Tier::Ok,
        FeesStatus::Partial | FeesStatus::Overdue => Tier::Concern,
    }
}

// Lower bounds are inclusive. Anything that fails both comparisons,
// NaN included, lands in the concern band.
fn band(value: f64, caution_from: f64, ok_from: f64) -> Tier {
    if value >= ok_from {
        Tier::Ok
    } else if value >= caution_from {
        Tier::Caution
    } else {
        Tier::Concern
    }
}
