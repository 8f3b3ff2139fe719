use thiserror::Error;

/// Main error type for the deadcase-director library
#[derive(Error, Debug)]
pub enum DirectorError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors about the files handed to a pipeline stage
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Input not found: {path}")]
    NotFound { path: String },

    #[error("Could not open {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Input produced no usable data: {path}")]
    Empty { path: String },
}

/// Errors raised while decoding and measuring frames
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Decoder not available: {tool}")]
    DecoderUnavailable { tool: String },

    #[error("Frame stream failed: {reason}")]
    StreamFailed { reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using DirectorError
pub type Result<T> = std::result::Result<T, DirectorError>;

impl DirectorError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Whether this is the "valid input, nothing in it" condition rather than a fault
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::Input(InputError::Empty { .. }))
    }

    /// Get a single-line, user-facing diagnostic
    pub fn user_message(&self) -> String {
        match self {
            Self::Input(InputError::NotFound { path }) => {
                format!("Input not found: {}", path)
            }
            Self::Input(InputError::Unreadable { path, reason }) => {
                format!("Could not open '{}': {}", path, reason)
            }
            Self::Analysis(AnalysisError::DecoderUnavailable { tool }) => {
                format!("'{}' was not found on PATH. Install FFmpeg or pass a directory of frame images instead.", tool)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_is_distinct_from_missing_input() {
        let empty: DirectorError = InputError::Empty { path: "clip.mp4".into() }.into();
        let missing: DirectorError = InputError::NotFound { path: "clip.mp4".into() }.into();

        assert!(empty.is_empty_result());
        assert!(!missing.is_empty_result());
    }

    #[test]
    fn test_user_message_is_single_line() {
        let err: DirectorError = InputError::Unreadable {
            path: "broken.mov".into(),
            reason: "moov atom not found".into(),
        }
        .into();

        let message = err.user_message();
        assert!(message.contains("broken.mov"));
        assert!(!message.contains('\n'));
    }
}
