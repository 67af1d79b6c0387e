//! CLI error types.

use std::fmt;

/// Errors surfaced to the CLI user.
#[derive(Debug)]
pub enum CliError {
    /// Invalid command-line input.
    Input(String),

    /// Failed to read or parse a GPX file.
    Gpx(String),

    /// The retrieval pipeline could not be constructed or failed.
    Retrieval(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Input(msg) => write!(f, "invalid input: {}", msg),
            CliError::Gpx(msg) => write!(f, "GPX file error: {}", msg),
            CliError::Retrieval(msg) => write!(f, "retrieval failed: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_display() {
        let err = CliError::Input("expected lon,lat".to_string());
        assert!(err.to_string().contains("invalid input"));
        assert!(err.to_string().contains("expected lon,lat"));
    }
}
