use crate::token::Token;
use std::path::PathBuf;
use thiserror::Error;

/// A single parser complaint, positioned at the token that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line} column {column}: {message}")]
pub struct Diagnostic {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }

    pub fn from_token(token: &Token, message: impl Into<String>) -> Self {
        Self::new(message, token.line, token.column)
    }
}

/// Every diagnostic a parse produced, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("{}", one_per_line(.0))]
pub struct ParseErrors(pub Vec<Diagnostic>);

impl ParseErrors {
    /// Keeps at most `max` diagnostics so cascading errors do not flood the host.
    pub fn truncate(mut self, max: usize) -> Self {
        self.0.truncate(max);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Diagnostic>> for ParseErrors {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self(diagnostics)
    }
}

fn one_per_line(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(Diagnostic::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Evaluation was cancelled on purpose. Not a failure.
    #[error("stopped")]
    Stopped,
    #[error("{0}")]
    Runtime(String),
}

/// Everything that ends an invocation early. The `Display` text is what the
/// host is shown.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{0}")]
    Parse(ParseErrors),
    #[error("{0}")]
    FormatRoundTrip(ParseErrors),
    #[error("{0}")]
    Eval(EvalError),
    #[error("{0}")]
    Event(EvalError),
}

impl DriverError {
    pub fn step(&self) -> &'static str {
        match self {
            DriverError::Parse(_) => "parse",
            DriverError::FormatRoundTrip(_) => "format",
            DriverError::Eval(_) => "evaluate",
            DriverError::Event(_) => "event",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value for {name}: {value:?}")]
    Env { name: &'static str, value: String },
}
