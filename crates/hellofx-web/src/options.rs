#![forbid(unsafe_code)]

//! JS option parsing.
//!
//! `init(options)` receives an arbitrary JS value; the wasm side serializes it
//! with `JSON.stringify` and hands the text here. Keys use the same names as
//! [`FxConfig`]'s fields and every key is optional.

use hellofx_core::{FxConfig, FxError};

/// Build the page configuration from the stringified JS options.
///
/// `None`, `"null"`, `"undefined"` and blank input select the defaults. When
/// the options carry no `seed`, one is drawn from `entropy`.
pub fn parse_options(json: Option<&str>, entropy: impl FnOnce() -> u64) -> Result<FxConfig, FxError> {
    let mut config = match json.map(str::trim) {
        None | Some("" | "null" | "undefined") => FxConfig::default(),
        Some(text) => FxConfig::from_json_str(text)?,
    };
    if config.seed.is_none() {
        config.seed = Some(entropy());
    }
    Ok(config)
}

/// Map a `[0, 1)` float (`Math.random()`) onto the full `u64` range.
#[must_use]
pub fn seed_from_unit(unit: f64) -> u64 {
    if !unit.is_finite() || unit <= 0.0 {
        return 0;
    }
    // `as` saturates at u64::MAX.
    (unit.min(1.0) * u64::MAX as f64) as u64
}
