//! Error types with diagnostic codes using miette
//!
//! Geometry never fails; only configuration application and value parsing
//! produce errors.

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Errors raised while applying a configuration tree to a component
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("unknown component type: {type_name}")]
    #[diagnostic(
        code(chartwork::config::unknown_type),
        help("register the type on the ClassRegistry before applying configuration")
    )]
    UnknownType { type_name: String },

    #[error("invalid JSON configuration")]
    #[diagnostic(code(chartwork::config::invalid_json))]
    InvalidJson(#[from] serde_json::Error),
}

/// A configuration failure surfaced at the component boundary.
///
/// Whatever was applied before the failure stays applied; there is no
/// rollback.
#[derive(Error, Diagnostic, Debug)]
#[error("critical configuration error in {class_name}")]
#[diagnostic(
    code(chartwork::config::critical),
    help("the component keeps the state it had reached when the error occurred")
)]
pub struct CriticalConfigError {
    /// Class name of the component the configuration was applied to
    pub class_name: String,
    #[source]
    #[diagnostic_source]
    pub source: ConfigError,
}

// ============================================================================
// Value Errors
// ============================================================================

/// Errors from parsing typed values out of strings
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ParseValueError {
    #[error("not a percentage: {0:?}")]
    #[diagnostic(code(chartwork::value::percent), help("percentages look like `50%` or `-12.5%`"))]
    Percent(String),

    #[error("not a hex color: {0:?}")]
    #[diagnostic(code(chartwork::value::color), help("colors look like `#f80` or `#ff8800`"))]
    Color(String),
}
