//! Error types for the processor.
//!
//! The traversal itself never fails; every error originates in a rule
//! action, in XML loading or in the CLI and travels to the caller unchanged.

use thiserror::Error;

/// Main error type for the processor library.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// A rule action refused or failed to transform a node.
    #[error("Rule '{rule}' failed: {message}")]
    Action { rule: String, message: String },

    /// Invalid tag name in a rule argument.
    #[error("Invalid tag name: '{0}'. Expected an XML name (e.g., p, li.nr, meta-data)")]
    InvalidTagName(String),

    /// Invalid rename argument.
    #[error("Invalid rename: '{0}'. Expected FROM=TO (e.g., nadruk=em)")]
    InvalidRename(String),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Input exceeds the configured size limit.
    #[error("Input is {size} bytes, larger than the {max} byte limit")]
    InputTooLarge { size: usize, max: usize },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProcessorError {
    /// Build an action error for the named rule.
    pub fn action(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Action {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for processor operations.
pub type Result<T> = std::result::Result<T, ProcessorError>;
