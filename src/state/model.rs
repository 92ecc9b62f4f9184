//! Run-state data model
//!
//! Suites and cases are append-only. The current suite is always the last
//! one, and the current case is always the last case of that suite.

use chrono::{DateTime, Local, TimeDelta};

/// Snapshot of one test run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    /// Name of the current run
    pub title: String,
    /// When the current run started
    pub last_run: Option<DateTime<Local>>,
    /// True until the first failing assertion
    pub all_passed: bool,
    /// Set once `test_end` is observed
    pub done: bool,
    /// Number of assertions recorded in this run
    pub assert_count: u32,
    /// Number of failing assertions recorded in this run
    pub fail_count: u32,
    /// Suites in declaration order
    pub suites: Vec<Suite>,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            title: String::new(),
            last_run: None,
            all_passed: true,
            done: false,
            assert_count: 0,
            fail_count: 0,
            suites: Vec::new(),
        }
    }
}

impl RunState {
    /// The suite that suite-scoped commands apply to
    #[must_use]
    pub fn current_suite(&self) -> Option<&Suite> {
        self.suites.last()
    }

    /// The case that case-scoped commands apply to
    #[must_use]
    pub fn current_case(&self) -> Option<&Case> {
        self.current_suite().and_then(|s| s.cases.last())
    }

    /// Number of assertions that held
    #[must_use]
    pub const fn passing_count(&self) -> u32 {
        self.assert_count - self.fail_count
    }
}

/// A named group of cases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suite {
    /// Suite name
    pub name: String,
    /// Cases in declaration order
    pub cases: Vec<Case>,
}

impl Suite {
    /// Create an empty suite
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cases: Vec::new(),
        }
    }
}

/// A named unit of testing holding assertion outcomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    /// Case name
    pub name: String,
    /// Assertion outcomes in the order they were reported
    pub assertions: Vec<bool>,
    /// Set by `perf`
    pub started: Option<DateTime<Local>>,
    /// Set by `perf_end`
    pub stopped: Option<DateTime<Local>>,
}

impl Case {
    /// Create a case with no assertions and no timing
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            assertions: Vec::new(),
            started: None,
            stopped: None,
        }
    }

    /// True if any assertion failed. A case with no assertions passes.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.assertions.iter().any(|passed| !passed)
    }

    /// 1-based positions of the failing assertions
    #[must_use]
    pub fn failed_assertions(&self) -> Vec<usize> {
        self.assertions
            .iter()
            .enumerate()
            .filter(|(_, passed)| !**passed)
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// Time between `perf` and `perf_end`, if both were seen
    #[must_use]
    pub fn duration(&self) -> Option<TimeDelta> {
        match (self.started, self.stopped) {
            (Some(started), Some(stopped)) => Some(stopped - started),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = RunState::default();
        assert!(state.all_passed);
        assert!(!state.done);
        assert_eq!(state.assert_count, 0);
        assert!(state.current_suite().is_none());
        assert!(state.current_case().is_none());
    }

    #[test]
    fn test_current_case_is_last_of_last_suite() {
        let mut state = RunState::default();
        let mut first = Suite::new("first");
        first.cases.push(Case::new("a"));
        let mut second = Suite::new("second");
        second.cases.push(Case::new("b"));
        second.cases.push(Case::new("c"));
        state.suites = vec![first, second];

        assert_eq!(state.current_suite().unwrap().name, "second");
        assert_eq!(state.current_case().unwrap().name, "c");
    }

    #[test]
    fn test_current_case_none_for_empty_suite() {
        let mut state = RunState::default();
        state.suites.push(Suite::new("empty"));
        assert!(state.current_case().is_none());
    }

    #[test]
    fn test_failed_assertions_are_one_based() {
        let mut case = Case::new("x");
        case.assertions = vec![true, false, true, false];
        assert!(case.failed());
        assert_eq!(case.failed_assertions(), vec![2, 4]);
    }

    #[test]
    fn test_case_without_assertions_passes() {
        assert!(!Case::new("empty").failed());
    }

    #[test]
    fn test_duration_requires_both_marks() {
        let mut case = Case::new("timed");
        let start = Local::now();
        case.started = Some(start);
        assert!(case.duration().is_none());
        case.stopped = Some(start + TimeDelta::milliseconds(15));
        assert_eq!(case.duration(), Some(TimeDelta::milliseconds(15)));
    }
}
