//! Shared test utilities
//!
//! Common helpers used across test modules. Only compiled in test builds.

use chrono::Local;

use crate::protocol::Action;
use crate::state::{reduce, RunState};

/// `test` action with the given run title
#[must_use]
pub fn test(title: &str) -> Action {
    Action::Test {
        title: title.to_string(),
    }
}

/// `desc` action with the given suite name
#[must_use]
pub fn desc(name: &str) -> Action {
    Action::Describe {
        name: name.to_string(),
    }
}

/// `it` action with the given case name
#[must_use]
pub fn it(name: &str) -> Action {
    Action::It {
        name: name.to_string(),
    }
}

/// `assert` action with the given outcome
#[must_use]
pub const fn assert_action(passed: bool) -> Action {
    Action::Assert { passed }
}

/// Reduce a sequence of actions from the default state.
///
/// Panics if any action is rejected by the reducer.
#[must_use]
pub fn apply_all(actions: &[Action]) -> RunState {
    actions
        .iter()
        .fold(RunState::default(), |state, action| {
            reduce(&state, action, Local::now()).unwrap()
        })
}
