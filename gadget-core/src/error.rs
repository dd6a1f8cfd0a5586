use thiserror::Error;

/// Failures surfaced across the gadget's invocation boundary.
///
/// Every variant renders to the in-band message consumers display; callers
/// branch on the presence of data and of an error string, never on a raw
/// transport error escaping the core.
#[derive(Debug, Error)]
pub enum GadgetError {
    /// The gadget configuration has no resolved location.
    #[error("Weather gadget is not configured: select a location and units first.")]
    NotConfigured,

    /// The OpenWeather API key is missing from the environment.
    #[error("Weather service is not configured: missing OpenWeather API key.")]
    ServiceNotConfigured,

    /// Non-success status or transport failure from an upstream API, folded
    /// into a single message.
    #[error("{0}")]
    Upstream(String),

    /// Anything outside the anticipated failure paths.
    #[error("unexpected error")]
    Unexpected,
}

impl GadgetError {
    /// Fold an upstream error chain into one displayable message.
    pub fn upstream(err: &anyhow::Error) -> Self {
        GadgetError::Upstream(format!("{err:#}"))
    }
}
