#![forbid(unsafe_code)]

//! Controller configuration.
//!
//! Every field has a default matching the stock greeting page, so an empty
//! JSON object (or no options at all) yields the standard behavior. Hosts may
//! override individual fields:
//!
//! ```
//! use hellofx_core::config::FxConfig;
//!
//! let cfg = FxConfig::from_json_str(r#"{ "resize_debounce_ms": 100 }"#).unwrap();
//! assert_eq!(cfg.resize_debounce_ms, 100);
//! assert_eq!(cfg.phrases.len(), 5);
//! ```

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FxError;
use crate::style::is_css_identifier;

/// The stock phrase list shown on click.
pub const DEFAULT_PHRASES: [&str; 5] = [
    "Hello World!",
    "Bonjour Monde!",
    "Hola Mundo!",
    "¡Hola Mundo!",
    "Ciao Mondo!",
];

/// Accessible name applied to the primary element.
pub const DEFAULT_ARIA_LABEL: &str = "Click to see Hello World in different languages";

/// Upper bound on `particles_per_burst`.
pub const MAX_PARTICLES_PER_BURST: u32 = 1000;
/// Upper bound on every `*_ms` field (one day).
pub const MAX_DURATION_MS: u64 = 86_400_000;

/// Configuration for [`PresentationController`](crate::controller::PresentationController).
///
/// Selectors are bare class names (no leading `.`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxConfig {
    /// Class of the clickable greeting element.
    pub primary_selector: String,
    /// Class of the subtitle with hover styling.
    pub secondary_selector: String,
    /// Class of the element that hosts particles.
    pub container_selector: String,
    /// Phrases chosen from on each activation.
    pub phrases: Vec<String>,
    /// `aria-label` for the primary element.
    pub aria_label: String,
    /// Ripple node lifetime. Default: 600ms
    pub ripple_lifetime_ms: u64,
    /// Delay before the phrase and scale revert. Default: 1500ms
    pub phrase_revert_ms: u64,
    /// Particles created per burst. Default: 20
    pub particles_per_burst: u32,
    /// Spacing between particle spawns within a burst. Default: 200ms
    pub particle_stagger_ms: u64,
    /// Fixed particle lifetime, independent of its animation duration.
    /// Default: 7000ms
    pub particle_lifetime_ms: u64,
    /// Period between bursts. Default: 10000ms
    pub burst_interval_ms: u64,
    /// Lower bound (inclusive) of the particle float animation. Default: 3000ms
    pub particle_min_duration_ms: u64,
    /// Upper bound (exclusive) of the particle float animation. Default: 7000ms
    pub particle_max_duration_ms: u64,
    /// Quiet period before a resize burst settles. Default: 250ms
    pub resize_debounce_ms: u64,
    /// RNG seed. `None` lets the host supply entropy.
    pub seed: Option<u64>,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            primary_selector: "hello-text".to_owned(),
            secondary_selector: "subtitle".to_owned(),
            container_selector: "container".to_owned(),
            phrases: DEFAULT_PHRASES.iter().map(|p| (*p).to_owned()).collect(),
            aria_label: DEFAULT_ARIA_LABEL.to_owned(),
            ripple_lifetime_ms: 600,
            phrase_revert_ms: 1500,
            particles_per_burst: 20,
            particle_stagger_ms: 200,
            particle_lifetime_ms: 7000,
            burst_interval_ms: 10_000,
            particle_min_duration_ms: 3000,
            particle_max_duration_ms: 7000,
            resize_debounce_ms: 250,
            seed: None,
        }
    }
}

impl FxConfig {
    /// Parse a JSON options object and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, FxError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check invariants the controller relies on.
    pub fn validate(&self) -> Result<(), FxError> {
        if self.phrases.is_empty() {
            return Err(FxError::InvalidConfig("phrase list is empty".into()));
        }
        for (field, value) in [
            ("primary_selector", &self.primary_selector),
            ("secondary_selector", &self.secondary_selector),
            ("container_selector", &self.container_selector),
        ] {
            if !is_css_identifier(value) {
                return Err(FxError::InvalidConfig(format!(
                    "{field} {value:?} is not a CSS class name"
                )));
            }
        }
        if self.particle_min_duration_ms > self.particle_max_duration_ms {
            return Err(FxError::InvalidConfig(format!(
                "particle duration range {}..{} is inverted",
                self.particle_min_duration_ms, self.particle_max_duration_ms
            )));
        }
        if self.particles_per_burst > MAX_PARTICLES_PER_BURST {
            return Err(FxError::InvalidConfig(format!(
                "particles_per_burst {} exceeds {MAX_PARTICLES_PER_BURST}",
                self.particles_per_burst
            )));
        }
        for (field, value) in [
            ("ripple_lifetime_ms", self.ripple_lifetime_ms),
            ("phrase_revert_ms", self.phrase_revert_ms),
            ("particle_stagger_ms", self.particle_stagger_ms),
            ("particle_lifetime_ms", self.particle_lifetime_ms),
            ("burst_interval_ms", self.burst_interval_ms),
            ("particle_min_duration_ms", self.particle_min_duration_ms),
            ("particle_max_duration_ms", self.particle_max_duration_ms),
            ("resize_debounce_ms", self.resize_debounce_ms),
        ] {
            if value > MAX_DURATION_MS {
                return Err(FxError::InvalidConfig(format!(
                    "{field} {value} exceeds {MAX_DURATION_MS}"
                )));
            }
        }
        if self.burst_interval_ms == 0 {
            return Err(FxError::InvalidConfig(
                "burst_interval_ms must be non-zero".into(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub const fn ripple_lifetime(&self) -> Duration {
        Duration::from_millis(self.ripple_lifetime_ms)
    }

    #[must_use]
    pub const fn phrase_revert(&self) -> Duration {
        Duration::from_millis(self.phrase_revert_ms)
    }

    #[must_use]
    pub const fn particle_stagger(&self) -> Duration {
        Duration::from_millis(self.particle_stagger_ms)
    }

    #[must_use]
    pub const fn particle_lifetime(&self) -> Duration {
        Duration::from_millis(self.particle_lifetime_ms)
    }

    #[must_use]
    pub const fn burst_interval(&self) -> Duration {
        Duration::from_millis(self.burst_interval_ms)
    }

    #[must_use]
    pub const fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_stock_page() {
        let cfg = FxConfig::default();
        assert_eq!(cfg.phrases, DEFAULT_PHRASES.to_vec());
        assert_eq!(cfg.ripple_lifetime(), Duration::from_millis(600));
        assert_eq!(cfg.phrase_revert(), Duration::from_millis(1500));
        assert_eq!(cfg.particle_lifetime(), Duration::from_secs(7));
        assert_eq!(cfg.burst_interval(), Duration::from_secs(10));
        assert_eq!(cfg.resize_debounce(), Duration::from_millis(250));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(FxConfig::from_json_str("{}").unwrap(), FxConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg =
            FxConfig::from_json_str(r#"{"particles_per_burst": 5, "seed": 42}"#).unwrap();
        assert_eq!(cfg.particles_per_burst, 5);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.particle_stagger_ms, 200);
    }

    #[test]
    fn rejects_empty_phrases() {
        let err = FxConfig::from_json_str(r#"{"phrases": []}"#).unwrap_err();
        assert!(matches!(err, FxError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_selector_injection() {
        let err = FxConfig::from_json_str(r#"{"primary_selector": "a{}b"}"#).unwrap_err();
        assert!(matches!(err, FxError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_inverted_duration_range() {
        let cfg = FxConfig {
            particle_min_duration_ms: 8000,
            ..FxConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_oversized_bursts_and_durations() {
        let cfg = FxConfig {
            particles_per_burst: u32::MAX,
            ..FxConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(FxError::InvalidConfig(_))));

        let cfg = FxConfig {
            particles_per_burst: MAX_PARTICLES_PER_BURST,
            ..FxConfig::default()
        };
        assert!(cfg.validate().is_ok());

        let cfg = FxConfig {
            resize_debounce_ms: u64::MAX,
            ..FxConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(FxError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_leading_dash_digit_selector() {
        let err = FxConfig::from_json_str(r#"{"container_selector": "-1abc"}"#).unwrap_err();
        assert!(matches!(err, FxError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = FxConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, FxError::ConfigParse(_)));
    }
}
