//! Error types for hwptext.
//!
//! Strategy-internal failures are recovered inside the orchestrator and only
//! show up in logs. Two conditions cross the library boundary:
//!
//! - `HwpTextError::Exhausted` - every strategy ran and none produced text
//! - `HwpTextError::PasswordRequired` - the document body is encrypted
//!
//! The remaining variants are produced by the individual building blocks
//! (container reader, stream extractor, configuration loading) and are what
//! the orchestrator inspects when it decides how to continue.
use crate::extraction::structured::StructuredParserError;
use thiserror::Error;

/// Result type alias using `HwpTextError`.
pub type Result<T> = std::result::Result<T, HwpTextError>;

/// Message carried by the terminal failure when no strategy yielded text.
pub const NO_TEXTUAL_CONTENT: &str = "No textual content found in HWP file.";

/// Main error type for all hwptext operations.
#[derive(Debug, Error)]
pub enum HwpTextError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("structured parser failed: {0}")]
    Structured(#[from] StructuredParserError),

    #[error("Document is password protected and no password was supplied")]
    PasswordRequired,

    #[error("{message}{}", .detail.as_ref().map(|d| format!(" ({d})")).unwrap_or_default())]
    Exhausted {
        message: String,
        detail: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl From<zip::result::ZipError> for HwpTextError {
    fn from(err: zip::result::ZipError) -> Self {
        HwpTextError::Parsing {
            message: format!("Failed to read ZIP container: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl HwpTextError {
    error_constructor!(parsing, Parsing);
    error_constructor!(validation, Validation);

    /// The terminal "no textual content" failure, optionally annotated with
    /// the diagnostic recorded by an earlier strategy.
    pub fn no_textual_content(detail: Option<String>) -> Self {
        Self::Exhausted {
            message: NO_TEXTUAL_CONTENT.to_string(),
            detail,
            source: None,
        }
    }

    /// Turn a failure of the last-resort strategy into the error reported to
    /// the caller.
    ///
    /// `PasswordRequired` is a user-facing condition of its own and passes
    /// through untouched. Everything else collapses into `Exhausted`, keeping
    /// the original error as its source.
    pub fn into_terminal(self, detail: Option<String>) -> Self {
        match self {
            Self::PasswordRequired => Self::PasswordRequired,
            Self::Exhausted {
                message,
                detail: own,
                source,
            } => Self::Exhausted {
                message,
                detail: own.or(detail),
                source,
            },
            other => Self::Exhausted {
                message: other.to_string(),
                detail,
                source: Some(Box::new(other)),
            },
        }
    }

    pub fn is_password_required(&self) -> bool {
        matches!(self, Self::PasswordRequired)
    }
}
