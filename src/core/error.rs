use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// An argument's type or tag invariant was violated. Raised before any
    /// native call; no engine side effect has occurred.
    Usage,
    /// The engine reported a failure for an operation whose contract raises
    /// instead of returning the sentinel.
    Native,
    /// The engine produced a code with no entry in the symbol tables.
    UnknownCode,
    /// The engine has no error state to report (negative last-error query).
    Unavailable,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    path: Option<PathBuf>,
    mode: Option<u32>,
    code: Option<i32>,
    detail: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            path: None,
            mode: None,
            code: None,
            detail: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    /// Attaches the engine's own error string for the failing handle.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        if !detail.is_empty() {
            self.detail = Some(detail);
        }
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        if let Some(mode) = self.mode {
            write!(f, " (mode: {mode:o})")?;
        }
        if let Some(code) = self.code {
            write!(f, " (code: {code})")?;
        }
        if let Some(detail) = &self.detail {
            write!(f, " (engine: {detail})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn display_includes_attached_diagnostics() {
        let err = Error::new(ErrorKind::Native)
            .with_message("could not create a directory")
            .with_path("/srv/upload")
            .with_mode(0o755)
            .with_detail("Socket error: disconnected");
        let rendered = err.to_string();
        assert!(rendered.contains("Native"));
        assert!(rendered.contains("could not create a directory"));
        assert!(rendered.contains("/srv/upload"));
        assert!(rendered.contains("755"));
        assert!(rendered.contains("Socket error"));
    }

    #[test]
    fn empty_engine_detail_is_not_attached() {
        let err = Error::new(ErrorKind::Native).with_detail("");
        assert!(!err.to_string().contains("engine:"));
    }

    #[test]
    fn unknown_code_keeps_the_offending_code() {
        let err = Error::new(ErrorKind::UnknownCode).with_code(99);
        assert_eq!(err.code(), Some(99));
        assert!(err.to_string().contains("99"));
    }
}
