//! Error enum
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Serde(serde_json::Error),
    Glob(glob::GlobError),
    GlobPattern(glob::PatternError),
    /// A directory that has to be provided by the user is absent.
    MissingPrerequisite {
        path: PathBuf,
        hint: String,
    },
    /// Program is not on `PATH`.
    CommandMissing(String),
    /// A collaborator exited with a non-zero status.
    ToolFailure {
        command: String,
        code: Option<i32>,
    },
    ReservedSymbol(String),
    InvalidTable {
        line: usize,
        reason: String,
    },
    Split(String),
    Custom(String),
}

impl Error {
    /// Process exit code to use when this error ends the run.
    ///
    /// Collaborator failures keep their own status, everything else is `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ToolFailure {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Serde(e) => write!(f, "malformed json: {}", e),
            Error::Glob(e) => write!(f, "glob error: {}", e),
            Error::GlobPattern(e) => write!(f, "bad glob pattern: {}", e),
            Error::MissingPrerequisite { path, hint } => {
                write!(f, "{:?} does not exist. {}", path, hint)
            }
            Error::CommandMissing(program) => {
                write!(f, "command `{}` not found in PATH", program)
            }
            Error::ToolFailure {
                command,
                code: Some(code),
            } => write!(f, "`{}` failed with exit status {}", command, code),
            Error::ToolFailure {
                command,
                code: None,
            } => write!(f, "`{}` was terminated by a signal", command),
            Error::ReservedSymbol(symbol) => write!(f, "{} is in the vocabulary!", symbol),
            Error::InvalidTable { line, reason } => {
                write!(f, "invalid symbol table (line {}): {}", line, reason)
            }
            Error::Split(msg) => write!(f, "split error: {}", msg),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<glob::GlobError> for Error {
    fn from(e: glob::GlobError) -> Error {
        Error::Glob(e)
    }
}

impl From<glob::PatternError> for Error {
    fn from(e: glob::PatternError) -> Error {
        Error::GlobPattern(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn tool_failure_keeps_status() {
        let e = Error::ToolFailure {
            command: "lhotse split".to_string(),
            code: Some(3),
        };
        assert_eq!(e.exit_code(), 3);
    }

    #[test]
    fn other_errors_exit_with_one() {
        assert_eq!(Error::ReservedSymbol("<s>".to_string()).exit_code(), 1);
        let signaled = Error::ToolFailure {
            command: "python3".to_string(),
            code: None,
        };
        assert_eq!(signaled.exit_code(), 1);
    }

    #[test]
    fn reserved_symbol_message() {
        let e = Error::ReservedSymbol("</s>".to_string());
        assert_eq!(e.to_string(), "</s> is in the vocabulary!");
    }
}
