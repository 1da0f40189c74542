#![forbid(unsafe_code)]

//! Error type for page setup and configuration.

/// Errors surfaced by controller setup and configuration loading.
///
/// Runtime operations (clicks, hovers, timers) are total and never produce
/// one of these; only setup can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FxError {
    /// One or more required page elements could not be resolved.
    ///
    /// `missing` lists the class names that failed, in lookup order.
    MissingElements { missing: Vec<String> },
    /// Configuration parsed but failed validation.
    InvalidConfig(String),
    /// Configuration JSON could not be parsed.
    ConfigParse(String),
}

impl FxError {
    /// Whether this is the missing-element condition (the only failure a
    /// well-formed page can hit at load).
    #[must_use]
    pub fn is_missing_elements(&self) -> bool {
        matches!(self, Self::MissingElements { .. })
    }
}

impl core::fmt::Display for FxError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingElements { missing } => {
                write!(f, "required elements not found: .{}", missing.join(", ."))
            }
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
        }
    }
}

impl std::error::Error for FxError {}

impl From<serde_json::Error> for FxError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}
