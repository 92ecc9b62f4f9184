//! Reporter wiring
//!
//! Connects the input stream to the demultiplexer, decoded actions to the
//! store, and the store's subscription to the renderer and the output
//! writer. Everything runs on one thread: each dispatch reduces, renders
//! and writes before the next chunk is read.

use std::cell::{Ref, RefCell};
use std::io::Write;
use std::rc::Rc;

use chrono::Local;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::cli::render;
use crate::config::ReporterConfig;
use crate::error::Result;
use crate::protocol::{Action, Demultiplexer, Sink, TERMINATOR};
use crate::state::{reduce, RunState, Store};

/// Reducer bound to the wall clock
pub type LiveReducer = fn(&RunState, &Action) -> Result<RunState>;

fn reduce_now(state: &RunState, action: &Action) -> Result<RunState> {
    reduce(state, action, Local::now())
}

/// Store plus output writer; the sink behind the demultiplexer
pub struct Reporter<W> {
    store: Store<LiveReducer>,
    out: Rc<RefCell<W>>,
}

impl<W> std::fmt::Debug for Reporter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl<W: Write + 'static> Reporter<W> {
    /// Create a reporter writing to `out`, with the renderer subscribed
    pub fn new(out: W) -> Self {
        let out = Rc::new(RefCell::new(out));
        let mut store: Store<LiveReducer> = Store::new(RunState::default(), reduce_now);

        let writer = Rc::clone(&out);
        store.subscribe(move |action, state| {
            if let Some(text) = render(state, action)? {
                let mut writer = writer.borrow_mut();
                writer.write_all(text.as_bytes())?;
                writer.flush()?;
            }
            Ok(())
        });

        Self { store, out }
    }

    /// The current run state
    #[must_use]
    pub fn state(&self) -> &RunState {
        self.store.get_state()
    }

    /// Borrow the output writer
    #[must_use]
    pub fn output(&self) -> Ref<'_, W> {
        self.out.borrow()
    }

    /// Flush the output writer
    pub fn flush(&mut self) -> Result<()> {
        self.out.borrow_mut().flush()?;
        Ok(())
    }
}

impl<W: Write + 'static> Sink for Reporter<W> {
    fn write(&mut self, text: &str) -> Result<()> {
        self.out.borrow_mut().write_all(text.as_bytes())?;
        Ok(())
    }

    fn dispatch(&mut self, action: Action) -> Result<()> {
        self.store.dispatch(&action)
    }
}

/// Split a line read from input into its body and whether it was terminated
fn split_terminator(line: &str) -> (&str, bool) {
    line.strip_suffix('\n').map_or((line, false), |body| {
        (body.strip_suffix('\r').unwrap_or(body), true)
    })
}

/// Read `input` until end of stream, writing reporter output to `output`.
///
/// Each input line is fed as its body followed by a separate `\r\n` chunk,
/// the way a line-oriented terminal session echoes input. Returns the
/// final run state.
pub async fn run<R, W>(input: R, output: W, config: &ReporterConfig) -> Result<RunState>
where
    R: AsyncBufRead + Unpin,
    W: Write + 'static,
{
    let reporter = Reporter::new(output);
    let mut demux = Demultiplexer::new(config.marker, reporter);

    let mut input = input;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let (body, terminated) = split_terminator(&line);
        demux.handle(body)?;
        if terminated {
            demux.handle(TERMINATOR)?;
        }
        demux.sink_mut().flush()?;
    }
    demux.finish();

    let reporter = demux.into_sink();
    debug!(
        title = %reporter.state().title,
        asserts = reporter.state().assert_count,
        failures = reporter.state().fail_count,
        "input closed"
    );
    Ok(reporter.state().clone())
}
