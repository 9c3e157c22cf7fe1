use crate::models::{FilterSpec, ALL};

/// Owns the single active `FilterSpec`.
///
/// Setters accept any string and take effect on the next `spec()` read.
/// Nothing is recomputed here; callers re-run `filter_records` themselves.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    spec: FilterSpec,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.spec.query = query.into();
    }

    pub fn set_class_filter(&mut self, class_filter: impl Into<String>) {
        self.spec.class_filter = class_filter.into();
    }

    pub fn set_risk_filter(&mut self, risk_filter: impl Into<String>) {
        self.spec.risk_filter = risk_filter.into();
    }

    pub fn reset(&mut self) {
        self.spec = FilterSpec::default();
    }

    pub fn is_permissive(&self) -> bool {
        self.spec.query.is_empty() && self.spec.class_filter == ALL && self.spec.risk_filter == ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_records;
    use crate::seed::mock_students;

    #[test]
    fn starts_permissive() {
        let state = FilterState::new();
        assert_eq!(state.spec(), &FilterSpec::default());
        assert!(state.is_permissive());
    }

    #[test]
    fn setters_replace_only_their_field() {
        let mut state = FilterState::new();
        state.set_query("patel");
        state.set_class_filter("10B");
        assert_eq!(state.spec().query, "patel");
        assert_eq!(state.spec().class_filter, "10B");
        assert_eq!(state.spec().risk_filter, ALL);

        state.set_risk_filter("medium");
        state.set_query("");
        assert_eq!(state.spec().query, "");
        assert_eq!(state.spec().class_filter, "10B");
        assert_eq!(state.spec().risk_filter, "medium");
        assert!(!state.is_permissive());
    }

    #[test]
    fn accepts_unvalidated_values() {
        let mut state = FilterState::new();
        state.set_risk_filter("whatever");
        state.set_class_filter("not-a-class");
        assert_eq!(state.spec().risk_filter, "whatever");
        assert_eq!(state.spec().class_filter, "not-a-class");
    }

    #[test]
    fn mutations_are_visible_to_the_next_filter_pass() {
        let students = mock_students();
        let mut state = FilterState::new();
        assert_eq!(filter_records(&students, state.spec()).unwrap().len(), 5);

        state.set_risk_filter("high");
        assert_eq!(filter_records(&students, state.spec()).unwrap().len(), 2);

        state.set_class_filter("10C");
        let filtered = filter_records(&students, state.spec()).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Kavya Singh");

        state.reset();
        assert!(state.is_permissive());
        assert_eq!(filter_records(&students, state.spec()).unwrap().len(), 5);
    }
}
