use std::{fmt::Display, ops::Deref};

use itertools::Itertools;

pub use cursor::Line;

/// Where on its line an error was detected, rendered right after `Error`.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum Location {
    #[display(fmt = "")]
    Nowhere,
    #[display(fmt = " at end")]
    End,
    #[display(fmt = " at '{}'", _0)]
    Lexeme(String),
}

/// Anything an error can be attached to.
pub trait Located {
    fn line(&self) -> Line;

    fn location(&self) -> Location {
        Location::Nowhere
    }
}

impl Located for Line {
    fn line(&self) -> Line {
        *self
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Reported while scanning or parsing.
    #[error("[line {line}] Error{location}: {message}")]
    Static { line: Line, location: Location, message: String },
    /// Reported while evaluating.
    #[error("{message}\n[line {line}]")]
    Runtime { line: Line, message: String },
}

/// Append-only collector for everything that went wrong during one run.
///
/// Each stage reports into it and keeps going as far as it can; the driver
/// asks `had_error`/`had_runtime_error` afterwards to decide what to do.
#[derive(Debug, Default, PartialEq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, line: Line, message: impl ToString) {
        self.error_at(&line, message)
    }

    pub fn error_at(&mut self, at: &impl Located, message: impl ToString) {
        self.report(Diagnostic::Static {
            line: at.line(),
            location: at.location(),
            message: message.to_string(),
        })
    }

    pub fn runtime_error<E>(&mut self, error: &E)
    where
        E: std::error::Error + Located,
    {
        self.report(Diagnostic::Runtime { line: error.line(), message: error.to_string() })
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        log::debug!("Reporting {:?}", diagnostic);
        self.0.push(diagnostic);
    }

    /// Whether scanning or parsing failed.
    pub fn had_error(&self) -> bool {
        self.0.iter().any(|d| matches!(d, Diagnostic::Static { .. }))
    }

    pub fn had_runtime_error(&self) -> bool {
        self.0.iter().any(|d| matches!(d, Diagnostic::Runtime { .. }))
    }
}

impl Deref for Diagnostics {
    type Target = [Diagnostic];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}
