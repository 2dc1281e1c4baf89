//! Purpose: Error taxonomy shared by the parser, decoder, writer and driver.
//! Exports: `Error`, `ErrorKind`, `Result`, `to_exit_code`.
//! Role: One error type for every failure that aborts a run.
//! Invariants: `Display` renders the user-facing message only; kind and path stay in `Debug`.
//! Invariants: Every kind maps to exit status 1.
use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// `WRITE` is unset, empty, or holds only empty fragments.
    NotSet,
    /// A fragment has no `[path](token)` match.
    InvalidFormat,
    /// A `$name` or `base64:$name` token names an undefined variable.
    MissingEnvRef,
    /// Directory creation or file write failed.
    Io,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    path: Option<PathBuf>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            path: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub(crate) fn missing_env_ref(name: &str) -> Self {
        Self::new(ErrorKind::MissingEnvRef)
            .with_message(format!("Error: Environment variable {name} is not set"))
    }

    pub(crate) fn write_failure(path: &Path, err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io)
            .with_message(format!("Error writing to file: {err}"))
            .with_path(path)
            .with_source(err)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

fn default_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NotSet => "Error: WRITE environment variable is not set",
        ErrorKind::InvalidFormat => "Error: Invalid WRITE environment variable format",
        ErrorKind::MissingEnvRef => "Error: Environment variable is not set",
        ErrorKind::Io => "Error writing to file",
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => f.write_str(message),
            None => f.write_str(default_message(self.kind)),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::NotSet | ErrorKind::InvalidFormat | ErrorKind::MissingEnvRef | ErrorKind::Io => 1,
    }
}
