//! Command-line decoding
//!
//! A completed command line looks like `⚡:<type>:<arg>,<arg>,...\r\n`.
//! It is decoded in two steps: [`Command::parse`] splits the line into a
//! type and a list of loosely-typed values, then `Action::try_from`
//! turns that into a typed [`Action`] so nothing downstream has to guess
//! at payload shapes.

use serde_json::Value;

use crate::error::{ReporterError, Result};

/// An untyped command as it appears on the wire
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Command name (second `:` field, trimmed)
    pub kind: String,
    /// Comma-separated arguments, each parsed as JSON when possible
    pub payload: Vec<Value>,
}

impl Command {
    /// Decode one accumulated command line.
    ///
    /// The first `:` field (marker plus any leading text) is discarded.
    /// Anything after the third field is ignored.
    pub fn parse(line: &str) -> Result<Self> {
        let mut fields = line.split(':');
        let _marker = fields.next();
        let kind = fields
            .next()
            .ok_or_else(|| ReporterError::MissingCommandType {
                line: line.to_string(),
            })?
            .trim()
            .to_string();

        let payload = match fields.next() {
            Some(args) if !args.is_empty() => args.split(',').map(parse_value).collect(),
            _ => Vec::new(),
        };

        Ok(Self { kind, payload })
    }
}

/// Parse one argument token, falling back to its trimmed text.
fn parse_value(token: &str) -> Value {
    serde_json::from_str(token).unwrap_or_else(|_| Value::String(token.trim().to_string()))
}

/// A typed protocol event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A new run starts
    Test {
        /// Run title
        title: String,
    },
    /// The run is complete
    TestEnd,
    /// A new suite opens
    Describe {
        /// Suite name
        name: String,
    },
    /// A new case opens in the current suite
    It {
        /// Case name
        name: String,
    },
    /// The current case is complete (rendering only)
    ItEnd,
    /// Timing starts for the current case
    Perf,
    /// Timing stops for the current case
    PerfEnd,
    /// An assertion outcome for the current case
    Assert {
        /// Whether the assertion held
        passed: bool,
    },
    /// Unrecognized command, ignored everywhere
    Unknown {
        /// The raw command name
        kind: String,
    },
}

impl Action {
    /// The wire name of this action
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Test { .. } => "test",
            Self::TestEnd => "test_end",
            Self::Describe { .. } => "desc",
            Self::It { .. } => "it",
            Self::ItEnd => "it_end",
            Self::Perf => "perf",
            Self::PerfEnd => "perf_end",
            Self::Assert { .. } => "assert",
            Self::Unknown { kind } => kind,
        }
    }
}

impl TryFrom<Command> for Action {
    type Error = ReporterError;

    fn try_from(command: Command) -> Result<Self> {
        let first = command.payload.first();
        let action = match command.kind.as_str() {
            "test" => Self::Test {
                title: name_arg(first, "test", "title")?,
            },
            "test_end" => Self::TestEnd,
            "desc" => Self::Describe {
                name: name_arg(first, "desc", "suite name")?,
            },
            "it" => Self::It {
                name: name_arg(first, "it", "case name")?,
            },
            "it_end" => Self::ItEnd,
            "perf" => Self::Perf,
            "perf_end" => Self::PerfEnd,
            // A missing outcome counts as a failure
            "assert" => Self::Assert {
                passed: first.is_some_and(truthy),
            },
            other => Self::Unknown {
                kind: other.to_string(),
            },
        };
        Ok(action)
    }
}

/// Read a name-like argument. Non-string scalars keep their literal text.
fn name_arg(
    value: Option<&Value>,
    command: &'static str,
    argument: &'static str,
) -> Result<String> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(ReporterError::MissingArgument { command, argument }),
    }
}

/// Loose truthiness for assertion payloads.
///
/// `false`, `null`, numeric zero and the empty string are falsy.
#[must_use]
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Decode a complete command line straight into an [`Action`].
pub fn decode_line(line: &str) -> Result<Action> {
    Action::try_from(Command::parse(line)?)
}
