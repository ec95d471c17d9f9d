//! Error types for the Net Pay Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for the conditions the engine and its configuration loader surface.
//! Degenerate numeric input is clamped by the calculations and never
//! produces an error.

use thiserror::Error;

/// The main error type for the Net Pay Engine.
///
/// # Example
///
/// ```
/// use net_pay_engine::error::EngineError;
///
/// let error = EngineError::TaxClassNotFound {
///     tax_class: "VII".to_string(),
/// };
/// assert_eq!(error.to_string(), "Tax class not found: VII");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but violates a precondition of the engine.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the violated precondition.
        message: String,
    },

    /// The requested tax class has no entry in the configuration.
    #[error("Tax class not found: {tax_class}")]
    TaxClassNotFound {
        /// The tax class identifier that was requested.
        tax_class: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
