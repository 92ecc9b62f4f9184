//! Progress rendering
//!
//! Maps an applied action and the state it produced to the next chunk of
//! terminal output. Rendering is pure: the same state and action always
//! produce the same text, so the run banner uses the run's own start time
//! rather than the wall clock.

use chrono::TimeDelta;

use super::ansi::{self, Style};
use crate::error::{ReporterError, Result};
use crate::protocol::Action;
use crate::state::RunState;

/// Timestamp format for the run banner, e.g. `10/18/2026, 3:04:05 PM`
const BANNER_TIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Render `action`, which has already been applied to `state`.
///
/// Returns `None` for actions that only change state.
pub fn render(state: &RunState, action: &Action) -> Result<Option<String>> {
    let out = match action {
        Action::Test { .. } => Some(render_banner(state)),
        Action::TestEnd => Some(render_summary(state)),
        Action::Describe { name } => Some(format!("\n\n+ {name}")),
        Action::ItEnd => Some(render_case(state)?),
        Action::It { .. }
        | Action::Perf
        | Action::PerfEnd
        | Action::Assert { .. }
        | Action::Unknown { .. } => None,
    };
    Ok(out)
}

fn render_banner(state: &RunState) -> String {
    let clear = ansi::format(&[Style::CursorReset, Style::DisplayErase])("");
    let title = ansi::paint(
        &[Style::Bold],
        &format!("🎮  [PICOTEST] {} ", state.title.to_uppercase()),
    );
    let started = state
        .last_run
        .map(|t| t.format(BANNER_TIME_FORMAT).to_string())
        .unwrap_or_default();
    format!("{clear}{title}@ {started}")
}

fn render_summary(state: &RunState) -> String {
    let summary = format!(
        "{} tests complete. {} passing.\n",
        state.assert_count,
        state.passing_count()
    );
    if state.all_passed {
        ansi::paint(&[Style::Bold, Style::Green], &format!("\n\n✔ {summary}"))
    } else {
        ansi::paint(&[Style::Bold, Style::Red], &format!("\n\n✖ {summary}"))
    }
}

fn render_case(state: &RunState) -> Result<String> {
    let suite = state
        .current_suite()
        .ok_or(ReporterError::NoCurrentSuite { command: "it_end" })?;
    let case = suite
        .cases
        .last()
        .ok_or_else(|| ReporterError::NoCurrentCase {
            command: "it_end",
            suite: suite.name.clone(),
        })?;

    let failed = case.failed();
    let glyph = if failed { "✖" } else { "✔" };
    let timing = case.duration().map(format_duration).unwrap_or_default();
    let failures: String = case
        .failed_assertions()
        .iter()
        .map(|n| format!("\n    • failed assertion #{n}"))
        .collect();

    let out = format!("\n  {glyph} {} {timing}{failures}", case.name);
    let color = if failed { Style::Red } else { Style::Green };
    Ok(ansi::paint(&[color], &out))
}

fn format_duration(duration: TimeDelta) -> String {
    match duration.num_milliseconds() {
        ms if ms < 1 => "(<1ms)".to_string(),
        ms => format!("({ms}ms)"),
    }
}
