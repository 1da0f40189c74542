#![forbid(unsafe_code)]

//! WASM frontend for hellofx.
//!
//! Binds [`hellofx_core::PresentationController`] to the browser:
//! - `DomSurface` implements the core `Surface` over `web-sys`,
//! - a single `setTimeout` pump drives the controller's timer queue,
//! - [`console::ConsoleLayer`] forwards `tracing` output to DevTools.
//!
//! JS entry points are `start(options)` and the `HelloFxWeb` class.

pub mod console;
pub mod options;
pub mod pump;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{HelloFxWeb, start};

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct HelloFxWeb;

#[cfg(not(target_arch = "wasm32"))]
impl HelloFxWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
