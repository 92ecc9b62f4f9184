//! Stream demultiplexer
//!
//! Splits a single character stream into pass-through console text and
//! marker-prefixed command lines. Chunks may arrive at any granularity;
//! the demultiplexer keeps just enough state (`line`, `in_command`) to
//! reassemble command lines across chunk boundaries.

use tracing::{debug, trace, warn};

use super::command::{decode_line, Action};
use crate::error::Result;

/// Line terminator that completes a command line
pub const TERMINATOR: &str = "\r\n";

/// Destination for demultiplexed output
pub trait Sink {
    /// Forward pass-through text unchanged
    fn write(&mut self, text: &str) -> Result<()>;
    /// Hand off a decoded command
    fn dispatch(&mut self, action: Action) -> Result<()>;
}

/// Sink that keeps everything it receives in memory
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Recorder {
    /// Concatenated pass-through text
    pub written: String,
    /// Dispatched actions in order
    pub actions: Vec<Action>,
}

impl Sink for Recorder {
    fn write(&mut self, text: &str) -> Result<()> {
        self.written.push_str(text);
        Ok(())
    }

    fn dispatch(&mut self, action: Action) -> Result<()> {
        self.actions.push(action);
        Ok(())
    }
}

/// Stateful filter separating console text from protocol commands
#[derive(Debug)]
pub struct Demultiplexer<S> {
    marker: char,
    sink: S,
    line: String,
    in_command: bool,
    at_line_start: bool,
}

impl<S: Sink> Demultiplexer<S> {
    /// Create a demultiplexer that recognizes commands opened by `marker`
    pub const fn new(marker: char, sink: S) -> Self {
        Self {
            marker,
            sink,
            line: String::new(),
            in_command: false,
            at_line_start: true,
        }
    }

    /// Process one chunk of input.
    ///
    /// A command starts when the marker is the first character of a line
    /// and ends once the accumulated text ends with `\r\n`. Text after the
    /// terminator in the same chunk is processed as if it were a new chunk.
    pub fn handle(&mut self, chunk: &str) -> Result<()> {
        let mut rest = chunk;
        while !rest.is_empty() {
            if !self.in_command {
                if self.at_line_start && rest.starts_with(self.marker) {
                    self.in_command = true;
                } else {
                    let end = self.passthrough_len(rest);
                    let (text, tail) = rest.split_at(end);
                    trace!(len = text.len(), "pass-through");
                    self.sink.write(text)?;
                    self.at_line_start = text.ends_with('\n');
                    rest = tail;
                    continue;
                }
            }

            let end = if self.line.ends_with('\r') && rest.starts_with('\n') {
                Some(1)
            } else {
                rest.find(TERMINATOR).map(|i| i + TERMINATOR.len())
            };

            match end {
                Some(end) => {
                    self.line.push_str(&rest[..end]);
                    rest = &rest[end..];
                    self.complete()?;
                }
                None => {
                    self.line.push_str(rest);
                    rest = "";
                }
            }
        }
        Ok(())
    }

    /// Signal end of input. An unterminated command line is discarded.
    pub fn finish(&mut self) {
        if self.in_command {
            warn!(line = %self.line, "discarding unterminated command at end of input");
            self.line.clear();
            self.in_command = false;
        }
    }

    /// Whether a command line is currently being accumulated
    #[cfg(test)]
    pub(crate) const fn in_command(&self) -> bool {
        self.in_command
    }

    /// Borrow the sink
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutably borrow the sink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the demultiplexer, returning the sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Length of the pass-through prefix of `rest`: up to the start of the
    /// next line that opens a command, or all of it.
    fn passthrough_len(&self, rest: &str) -> usize {
        rest.match_indices('\n')
            .map(|(i, _)| i + 1)
            .find(|&next| rest[next..].starts_with(self.marker))
            .unwrap_or(rest.len())
    }

    fn complete(&mut self) -> Result<()> {
        let line = std::mem::take(&mut self.line);
        self.in_command = false;
        self.at_line_start = true;

        let action = decode_line(&line)?;
        debug!(kind = action.kind(), "dispatching command");
        self.sink.dispatch(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReporterError;

    fn demux() -> Demultiplexer<Recorder> {
        Demultiplexer::new('⚡', Recorder::default())
    }

    #[test]
    fn test_plain_text_passes_through() {
        let mut d = demux();
        d.handle("hello world").unwrap();
        assert_eq!(d.sink().written, "hello world");
        assert!(d.sink().actions.is_empty());
    }

    #[test]
    fn test_command_with_separate_terminator_chunk() {
        let mut d = demux();
        d.handle("⚡:assert:true").unwrap();
        assert!(d.in_command());
        d.handle("\r\n").unwrap();
        assert!(!d.in_command());
        assert_eq!(d.sink().actions, vec![Action::Assert { passed: true }]);
        assert!(d.sink().written.is_empty());
    }

    #[test]
    fn test_every_two_way_split_yields_same_action() {
        let line = "⚡:assert:true\r\n";
        let boundaries: Vec<usize> = line.char_indices().map(|(i, _)| i).skip(1).collect();
        for split in boundaries {
            let mut d = demux();
            d.handle(&line[..split]).unwrap();
            d.handle(&line[split..]).unwrap();
            assert_eq!(
                d.sink().actions,
                vec![Action::Assert { passed: true }],
                "split at byte {split}"
            );
        }
    }

    #[test]
    fn test_char_by_char_feed() {
        let mut d = demux();
        let mut buf = [0u8; 4];
        for c in "⚡:desc:Input\r\n".chars() {
            d.handle(c.encode_utf8(&mut buf)).unwrap();
        }
        assert_eq!(
            d.sink().actions,
            vec![Action::Describe {
                name: "Input".to_string()
            }]
        );
    }

    #[test]
    fn test_whole_line_in_one_chunk() {
        let mut d = demux();
        d.handle("⚡:it:jumps\r\n").unwrap();
        assert_eq!(
            d.sink().actions,
            vec![Action::It {
                name: "jumps".to_string()
            }]
        );
    }

    #[test]
    fn test_text_after_terminator_is_processed() {
        let mut d = demux();
        d.handle("⚡:perf\r\n⚡:perf_end\r\nlog line\r\n").unwrap();
        assert_eq!(d.sink().actions, vec![Action::Perf, Action::PerfEnd]);
        assert_eq!(d.sink().written, "log line\r\n");
    }

    #[test]
    fn test_command_after_text_line_in_same_chunk() {
        let mut d = demux();
        d.handle("booting\n⚡:test:Cart\r\n").unwrap();
        assert_eq!(d.sink().written, "booting\n");
        assert_eq!(
            d.sink().actions,
            vec![Action::Test {
                title: "Cart".to_string()
            }]
        );
    }

    #[test]
    fn test_marker_mid_line_is_text() {
        let mut d = demux();
        d.handle("score ⚡:assert:false\r\n").unwrap();
        assert_eq!(d.sink().written, "score ⚡:assert:false\r\n");
        assert!(d.sink().actions.is_empty());
    }

    #[test]
    fn test_marker_at_chunk_start_mid_line_is_text() {
        let mut d = demux();
        d.handle("score ").unwrap();
        d.handle("⚡ bonus").unwrap();
        assert_eq!(d.sink().written, "score ⚡ bonus");
    }

    #[test]
    fn test_other_marker_is_text() {
        let mut d = Demultiplexer::new('#', Recorder::default());
        d.handle("⚡:test:x\r\n").unwrap();
        d.handle("#:test:y\r\n").unwrap();
        assert_eq!(d.sink().written, "⚡:test:x\r\n");
        assert_eq!(d.sink().actions.len(), 1);
    }

    #[test]
    fn test_malformed_command_is_error() {
        let mut d = demux();
        let err = d.handle("⚡ oops\r\n").unwrap_err();
        assert!(matches!(err, ReporterError::MissingCommandType { .. }));
    }

    #[test]
    fn test_finish_discards_partial_command() {
        let mut d = demux();
        d.handle("⚡:assert:tr").unwrap();
        d.finish();
        assert!(!d.in_command());
        d.handle("after").unwrap();
        assert_eq!(d.sink().written, "after");
        assert!(d.sink().actions.is_empty());
    }

    #[test]
    fn test_lone_newline_command_does_not_complete() {
        let mut d = demux();
        d.handle("⚡:perf\n").unwrap();
        assert!(d.in_command());
        assert!(d.sink().actions.is_empty());
    }
}
