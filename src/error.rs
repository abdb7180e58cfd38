//! Error types for the reporting and configuration surface.
//!
//! Building the dependency forest never fails: unresolvable constructors,
//! missing implementation types and unmatched parameters all collapse to
//! "no edge". Errors only arise at the edges of the crate, when exporting a
//! graph or reading configuration.

use thiserror::Error;

/// Visualization errors
///
/// # Examples
///
/// ```rust
/// use ferrous_di_viz::VizError;
///
/// let unsupported = VizError::UnsupportedFormat("graphml".to_string());
/// assert_eq!(unsupported.to_string(), "Unsupported export format: graphml");
///
/// let bad_config = VizError::InvalidConfig {
///     key: "indent_width".to_string(),
///     value: "wide".to_string(),
/// };
/// println!("Error: {}", bad_config);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VizError {
    /// Export format not known to the exporter
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
    /// Operation needs a cargo feature that was not compiled in
    #[error("Export requires the '{0}' feature")]
    FeatureDisabled(&'static str),
    /// Serializer failure (JSON or YAML)
    #[error("Serialization failed: {0}")]
    Serialization(String),
    /// Configuration value could not be parsed
    #[error("Invalid configuration value for '{key}': {value}")]
    InvalidConfig {
        /// Configuration key as requested by the loader
        key: String,
        /// Raw value that failed to parse
        value: String,
    },
}

/// Result type for visualization operations
///
/// A convenience alias for `Result<T, VizError>`, used by the exporters and
/// configuration loader.
pub type VizResult<T> = Result<T, VizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            VizError::FeatureDisabled("graph-export").to_string(),
            "Export requires the 'graph-export' feature"
        );
        assert_eq!(
            VizError::Serialization("eof".to_string()).to_string(),
            "Serialization failed: eof"
        );
        assert_eq!(
            VizError::InvalidConfig { key: "tree_style".into(), value: "zigzag".into() }.to_string(),
            "Invalid configuration value for 'tree_style': zigzag"
        );
    }
}
