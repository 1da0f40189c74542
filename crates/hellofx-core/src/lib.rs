#![forbid(unsafe_code)]

//! `hellofx-core` drives the decorative interactivity of the greeting page.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment routes DOM events in and
//!   owns the actual document behind the [`surface::Surface`] trait.
//! - **Deterministic time**: the host passes a monotonic `now`; the controller
//!   keeps one-shot timers in a [`timer::TimerQueue`] and never sleeps.
//! - **No threads**: everything runs on the host's event loop, suitable for
//!   `wasm32-unknown-unknown`.
//!
//! The `hellofx-web` crate binds this to the browser. [`memory`] and
//! [`simulator`] provide a browser-free host for tests.

pub mod config;
pub mod controller;
pub mod effects;
pub mod error;
pub mod event;
pub mod memory;
pub mod phrases;
pub mod simulator;
pub mod style;
pub mod surface;
pub mod timer;

pub use config::FxConfig;
pub use controller::{ControllerStats, PresentationController};
pub use error::FxError;
pub use event::{EventKind, EventOutcome, PageEvent, PointerPos};
pub use surface::{Binding, Rect, Role, Surface, Tag};
