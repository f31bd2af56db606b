use thiserror::Error;

/// Failures of a single transform invocation.
///
/// Sites that merely fail a structural guard are not errors; they are left
/// untouched and scanning continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Source text is not valid under the configured parse mode
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Rewritten text no longer parses
    #[error("Rewritten output is not valid: {message}")]
    InvalidOutput { message: String },

    /// A synthetic statement template failed to build
    #[error("Failed to build template `{template}`: {message}")]
    Template { template: String, message: String },
}

impl TransformError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse { message: message.into() }
    }

    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput { message: message.into() }
    }

    pub fn template(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Template { template: template.into(), message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
