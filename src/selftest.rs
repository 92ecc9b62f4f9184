//! Embedded self-test harness
//!
//! `picotest test` runs a small built-in suite against the reporter's own
//! pipeline and prints a running log with pass/fail/pending glyphs and a
//! final tally.

use std::io::Write;

use anyhow::ensure;
use chrono::Local;
use colored::Colorize;

use crate::cli::{ansi, render, Style};
use crate::error::Result;
use crate::protocol::{decode_line, Action, Demultiplexer, Recorder};
use crate::state::{reduce, RunState, Store};

/// Pass/fail/pending counts
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    /// Cases whose body returned `Ok`
    pub passed: u32,
    /// Cases whose body returned an error
    pub failed: u32,
    /// Cases declared without a body
    pub pending: u32,
}

/// Minimal describe/it runner writing to `out`
#[derive(Debug)]
pub struct Harness<W> {
    out: W,
    tally: Tally,
}

impl<W: Write> Harness<W> {
    /// Create a harness writing its log to `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            tally: Tally::default(),
        }
    }

    /// Open a named group of cases
    pub fn describe<F>(&mut self, name: &str, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        writeln!(self.out, "\n+ {}", name.bold())?;
        body(self)
    }

    /// Run one case
    pub fn it<F>(&mut self, name: &str, body: F) -> Result<()>
    where
        F: FnOnce() -> anyhow::Result<()>,
    {
        match body() {
            Ok(()) => {
                self.tally.passed += 1;
                writeln!(self.out, "  {} {}", "✔".green(), name)?;
            }
            Err(err) => {
                self.tally.failed += 1;
                writeln!(self.out, "  {} {}", "✖".red(), name.red())?;
                writeln!(self.out, "    {}", format!("{err:#}").red())?;
            }
        }
        Ok(())
    }

    /// Declare a case that has no body yet
    pub fn pending(&mut self, name: &str) -> Result<()> {
        self.tally.pending += 1;
        writeln!(self.out, "  {} {}", "…".yellow(), name.dimmed())?;
        Ok(())
    }

    /// Current counts
    #[must_use]
    pub const fn tally(&self) -> Tally {
        self.tally
    }

    /// Print the tally line and return the counts
    pub fn finish(mut self) -> Result<Tally> {
        let Tally {
            passed,
            failed,
            pending,
        } = self.tally;
        let line = format!("{passed} passing, {failed} failing, {pending} pending");
        if failed > 0 {
            writeln!(self.out, "\n{}", line.red().bold())?;
        } else {
            writeln!(self.out, "\n{}", line.green().bold())?;
        }
        self.out.flush()?;
        Ok(self.tally)
    }
}

fn apply(actions: &[Action]) -> anyhow::Result<RunState> {
    let mut state = RunState::default();
    for action in actions {
        state = reduce(&state, action, Local::now())?;
    }
    Ok(state)
}

fn run_titled(title: &str) -> Action {
    Action::Test {
        title: title.to_string(),
    }
}

fn suite(name: &str) -> Action {
    Action::Describe {
        name: name.to_string(),
    }
}

fn case(name: &str) -> Action {
    Action::It {
        name: name.to_string(),
    }
}

/// Run the built-in suite, logging to `out`
pub fn run_builtin<W: Write>(out: W) -> Result<Tally> {
    let mut h = Harness::new(out);

    h.describe("Formatter", |h| {
        h.it("wraps text in styles and a reset", || {
            let out = ansi::paint(&[Style::Bold, Style::Red], "x");
            ensure!(out == "\x1b[1m\x1b[31mx\x1b[0m\x1b[22m", "got {out:?}");
            Ok(())
        })?;
        h.it("emits a bare envelope for empty text", || {
            let out = ansi::format(&[Style::DisplayErase])("");
            ensure!(out == "\x1b[2J\x1b[0m\x1b[22m", "got {out:?}");
            Ok(())
        })
    })?;

    h.describe("Demultiplexer", |h| {
        h.it("passes plain text through", || {
            let mut d = Demultiplexer::new('⚡', Recorder::default());
            d.handle("hello world")?;
            ensure!(d.sink().written == "hello world");
            ensure!(d.sink().actions.is_empty());
            Ok(())
        })?;
        h.it("decodes a command however it is chunked", || {
            let line = "⚡:assert:true\r\n";
            for (split, _) in line.char_indices().skip(1) {
                let mut d = Demultiplexer::new('⚡', Recorder::default());
                d.handle(&line[..split])?;
                d.handle(&line[split..])?;
                ensure!(
                    d.sink().actions == [Action::Assert { passed: true }],
                    "split at {split}"
                );
            }
            Ok(())
        })?;
        h.it("rejects a command line without a type", || {
            ensure!(decode_line("⚡ nothing\r\n").is_err());
            Ok(())
        })
    })?;

    h.describe("Reducer", |h| {
        h.it("tracks suites, cases and counts", || {
            let state = apply(&[
                run_titled("Suite A"),
                suite("Group 1"),
                case("does x"),
                Action::Assert { passed: true },
                Action::Assert { passed: false },
            ])?;
            ensure!(state.title == "Suite A");
            ensure!(state.assert_count == 2 && state.fail_count == 1);
            ensure!(!state.all_passed);
            Ok(())
        })?;
        h.it("resets everything on a new run", || {
            let state = apply(&[
                run_titled("one"),
                suite("s"),
                case("c"),
                Action::Assert { passed: false },
                run_titled("two"),
            ])?;
            ensure!(state.suites.is_empty() && state.assert_count == 0 && state.all_passed);
            Ok(())
        })?;
        h.it("refuses an assertion outside a case", || {
            ensure!(apply(&[run_titled("x"), Action::Assert { passed: true }]).is_err());
            Ok(())
        })
    })?;

    h.describe("Renderer", |h| {
        h.it("summarizes a failing run", || {
            let state = apply(&[
                run_titled("Suite A"),
                suite("Group 1"),
                case("does x"),
                Action::Assert { passed: true },
                Action::Assert { passed: false },
                Action::TestEnd,
            ])?;
            let out = render(&state, &Action::TestEnd)?.unwrap_or_default();
            ensure!(out.contains("2 tests complete. 1 passing."));
            ensure!(out.starts_with(&Style::Bold.escape()));
            ensure!(out.contains(&Style::Red.escape()));
            Ok(())
        })?;
        h.it("annotates failed assertions by position", || {
            let state = apply(&[
                run_titled("t"),
                suite("d"),
                case("c"),
                Action::Assert { passed: false },
                Action::Assert { passed: true },
            ])?;
            let out = render(&state, &Action::ItEnd)?.unwrap_or_default();
            ensure!(out.contains("• failed assertion #1"));
            ensure!(!out.contains("#2"));
            Ok(())
        })
    })?;

    h.describe("Store", |h| {
        h.it("notifies remaining listeners after an unsubscribe", || {
            let hits = std::rc::Rc::new(std::cell::Cell::new(0));
            let mut store = Store::new(RunState::default(), |s: &RunState, a: &Action| {
                reduce(s, a, Local::now())
            });
            let first = {
                let hits = std::rc::Rc::clone(&hits);
                store.subscribe(move |_, _| {
                    hits.set(hits.get() + 1);
                    Ok(())
                })
            };
            let second = {
                let hits = std::rc::Rc::clone(&hits);
                store.subscribe(move |_, _| {
                    hits.set(hits.get() + 10);
                    Ok(())
                })
            };
            store.dispatch(&run_titled("x"))?;
            ensure!(store.unsubscribe(first));
            store.dispatch(&suite("y"))?;
            ensure!(hits.get() == 21, "hits = {}", hits.get());
            ensure!(store.unsubscribe(second));
            Ok(())
        })
    })?;

    h.finish()
}
