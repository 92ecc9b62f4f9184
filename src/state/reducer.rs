//! Test-run state machine
//!
//! `reduce` never mutates its input: each action yields a new snapshot.
//! Suites and cases are addressed purely by position, so the order of
//! `desc`, `it` and `assert` on the wire is the only addressing scheme.

use chrono::{DateTime, Local};

use super::model::{Case, RunState, Suite};
use crate::error::{ReporterError, Result};
use crate::protocol::Action;

/// Apply `action` to `state`, returning the next state.
///
/// `now` stamps run starts and `perf` marks. Case-scoped actions that
/// arrive before a suite or case exists are errors.
pub fn reduce(state: &RunState, action: &Action, now: DateTime<Local>) -> Result<RunState> {
    let next = match action {
        Action::Test { title } => RunState {
            title: title.clone(),
            last_run: Some(now),
            ..RunState::default()
        },
        Action::TestEnd => RunState {
            done: true,
            ..state.clone()
        },
        Action::Describe { name } => {
            let mut next = state.clone();
            next.suites.push(Suite::new(name));
            next
        }
        Action::It { name } => {
            let mut next = state.clone();
            current_suite(&mut next, "it")?.cases.push(Case::new(name));
            next
        }
        Action::Perf => {
            let mut next = state.clone();
            current_case(&mut next, "perf")?.started = Some(now);
            next
        }
        Action::PerfEnd => {
            let mut next = state.clone();
            current_case(&mut next, "perf_end")?.stopped = Some(now);
            next
        }
        Action::Assert { passed } => {
            let mut next = state.clone();
            current_case(&mut next, "assert")?.assertions.push(*passed);
            next.assert_count += 1;
            if !passed {
                next.all_passed = false;
                next.fail_count += 1;
            }
            next
        }
        Action::ItEnd | Action::Unknown { .. } => state.clone(),
    };
    Ok(next)
}

fn current_suite<'a>(state: &'a mut RunState, command: &'static str) -> Result<&'a mut Suite> {
    state
        .suites
        .last_mut()
        .ok_or(ReporterError::NoCurrentSuite { command })
}

fn current_case<'a>(state: &'a mut RunState, command: &'static str) -> Result<&'a mut Case> {
    let suite = current_suite(state, command)?;
    let name = suite.name.clone();
    suite
        .cases
        .last_mut()
        .ok_or(ReporterError::NoCurrentCase {
            command,
            suite: name,
        })
}
