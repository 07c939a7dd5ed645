//! Diagnostics in the `path:line:column: message` wire format.

use crate::base::Position;
use crate::error::SyncError;
use regex::Regex;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

/// A `:<digits>` group. The first one ends the path; the first two are the
/// line and column.
static POSITION_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":(\d+)").unwrap_or_else(|err| unreachable!("invalid position pattern: {err}"))
});

const UNDEFINED_PREFIX: &str = "undefined: ";

/// A single semantic error with its location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file containing this diagnostic, as the analyzer reported it.
    pub path: PathBuf,
    /// 1-based line and byte column.
    pub position: Position,
    /// The message after the position prefix.
    pub message: String,
}

impl Diagnostic {
    pub fn new(path: impl Into<PathBuf>, position: Position, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            position,
            message: message.into(),
        }
    }

    /// Build an `undefined: name` diagnostic.
    pub fn undefined(path: impl Into<PathBuf>, position: Position, name: &str) -> Self {
        Self::new(path, position, format!("{UNDEFINED_PREFIX}{name}"))
    }

    /// The name an `undefined: Name` diagnostic reports.
    pub fn undefined_name(&self) -> Option<&str> {
        self.message.strip_prefix(UNDEFINED_PREFIX)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.path.display(), self.position, self.message)
    }
}

impl FromStr for Diagnostic {
    type Err = SyncError;

    /// Positions are located by pattern rather than by splitting on `:`, so
    /// colons later in the message are kept.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SyncError::DiagnosticFormat {
            message: s.to_string(),
        };

        let mut groups = POSITION_GROUP.captures_iter(s);
        let line = groups.next().ok_or_else(malformed)?;
        let column = groups.next().ok_or_else(malformed)?;

        let (Some(line_whole), Some(line_digits)) = (line.get(0), line.get(1)) else {
            return Err(malformed());
        };
        let (Some(column_whole), Some(column_digits)) = (column.get(0), column.get(1)) else {
            return Err(malformed());
        };

        let line: usize = line_digits.as_str().parse().map_err(|_| malformed())?;
        let column: usize = column_digits.as_str().parse().map_err(|_| malformed())?;
        let path = &s[..line_whole.start()];
        let message = s[column_whole.end()..].trim_start_matches(':').trim();

        Ok(Self::new(path, Position::new(line, column), message))
    }
}
