//! Error types for the voltlink skill core.

use thiserror::Error;

/// Result type alias for skill operations.
pub type SkillResult<T> = Result<T, SkillError>;

/// Errors that can occur while resolving a location or talking to the vehicle.
///
/// Degraded data (missing geocode results, no route, absent telemetry fields) is
/// NOT an error: those resolve to `None` at the call site. These variants cover
/// transport and configuration failures only, which propagate to the dispatcher.
#[derive(Error, Debug)]
pub enum SkillError {
    #[error("Vehicle API error: {0}")]
    VehicleApi(String),

    #[error("Geocoding error: {0}")]
    Geocode(String),

    #[error("Routing error: {0}")]
    Routing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No intent skill can handle '{0}'")]
    UnknownIntent(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
