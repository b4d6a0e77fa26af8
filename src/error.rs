//! Errors raised by Marksync's I/O shell
//!
//! Parsing, serialization and pretty-printing are total and never fail.
//! What can fail is writing the exported document, reading `config.json`
//! and talking to the system clipboard, so those are the only variants.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result of a Marksync I/O operation.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// The exported markdown file could not be written.
    Export { path: PathBuf, source: io::Error },

    /// `config.json` exists but could not be read.
    ConfigRead { path: PathBuf, source: io::Error },

    /// `config.json` is not valid settings JSON.
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The platform has no config directory (no home directory, usually).
    ConfigDirNotFound,

    /// The clipboard was asked to copy an empty HTML source.
    NothingToCopy,

    /// The system clipboard refused to open or accept text.
    Clipboard(String),
}

impl From<arboard::Error> for Error {
    fn from(err: arboard::Error) -> Self {
        Error::Clipboard(err.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Export { path, source } => {
                write!(f, "Could not export to '{}': {}", path.display(), source)
            }
            Error::ConfigRead { path, source } => {
                write!(f, "Could not read '{}': {}", path.display(), source)
            }
            Error::ConfigParse { path, source } => {
                write!(f, "Invalid settings in '{}': {}", path.display(), source)
            }
            Error::ConfigDirNotFound => write!(f, "No configuration directory on this platform"),
            Error::NothingToCopy => write!(f, "The preview has no HTML to copy"),
            Error::Clipboard(msg) => write!(f, "Clipboard unavailable: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Export { source, .. } | Error::ConfigRead { source, .. } => Some(source),
            Error::ConfigParse { source, .. } => Some(source),
            Error::ConfigDirNotFound | Error::NothingToCopy | Error::Clipboard(_) => None,
        }
    }
}

/// Fall back to a default when an optional resource can't be loaded.
pub trait ResultExt<T> {
    /// Log the error as a warning prefixed by `context` and return `default`.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        self.unwrap_or_else(|err| {
            warn!("{}: {}. Using default.", context, err);
            default
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_export_error_names_the_target() {
        let err = Error::Export {
            path: PathBuf::from("/export/document.md"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        };
        assert_eq!(
            err.to_string(),
            "Could not export to '/export/document.md': read-only"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_config_parse_keeps_serde_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err = Error::ConfigParse {
            path: PathBuf::from("config.json"),
            source: cause,
        };
        assert!(err.to_string().starts_with("Invalid settings in 'config.json'"));
        assert!(err
            .source()
            .map_or(false, |s| s.downcast_ref::<serde_json::Error>().is_some()));
    }

    #[test]
    fn test_clipboard_errors_have_no_cause() {
        assert_eq!(
            Error::NothingToCopy.to_string(),
            "The preview has no HTML to copy"
        );
        let err = Error::Clipboard("no display".into());
        assert_eq!(err.to_string(), "Clipboard unavailable: no display");
        assert!(err.source().is_none());
        assert!(Error::ConfigDirNotFound.source().is_none());
    }

    #[test]
    fn test_unwrap_or_warn_default() {
        let loaded: Result<u64> = Ok(150);
        assert_eq!(loaded.unwrap_or_warn_default(250, "debounce"), 150);

        let missing: Result<u64> = Err(Error::ConfigDirNotFound);
        assert_eq!(missing.unwrap_or_warn_default(250, "debounce"), 250);
    }
}
