#![forbid(unsafe_code)]

//! Deterministic page simulator.
//!
//! [`PageSimulator`] plays the host's role against a [`MemoryDocument`]:
//! it runs setup, delivers events only where a listener was registered, and
//! advances virtual time deadline by deadline so every timer observes its
//! exact firing time.
//!
//! ```
//! use core::time::Duration;
//! use hellofx_core::config::FxConfig;
//! use hellofx_core::memory::MemoryDocument;
//! use hellofx_core::simulator::PageSimulator;
//!
//! let mut sim = PageSimulator::new(MemoryDocument::greeting_page());
//! sim.load(FxConfig { seed: Some(1), ..FxConfig::default() }).unwrap();
//! sim.click(300.0, 220.0);
//! sim.advance(Duration::from_millis(1500));
//! assert_eq!(sim.primary_text().as_deref(), Some("Hello World!"));
//! ```

use core::time::Duration;

use crate::config::FxConfig;
use crate::controller::PresentationController;
use crate::error::FxError;
use crate::event::{EventOutcome, PageEvent};
use crate::memory::{MemoryDocument, NodeId};
use crate::surface::{Binding, Role, Surface};
use crate::timer::DeterministicClock;

/// Host stand-in driving a controller over an in-memory document.
#[derive(Debug)]
pub struct PageSimulator {
    doc: MemoryDocument,
    clock: DeterministicClock,
    controller: Option<PresentationController<NodeId>>,
}

impl PageSimulator {
    #[must_use]
    pub fn new(doc: MemoryDocument) -> Self {
        Self {
            doc,
            clock: DeterministicClock::new(),
            controller: None,
        }
    }

    /// Run setup at the current virtual time. A second call is a no-op.
    pub fn load(&mut self, config: FxConfig) -> Result<(), FxError> {
        if self.controller.is_some() {
            return Ok(());
        }
        let ctl = PresentationController::initialize(&mut self.doc, config, self.clock.now())?;
        self.controller = Some(ctl);
        Ok(())
    }

    /// Deliver `event` to `role`'s target. Returns `None` when no listener
    /// for it was registered (including before a successful load).
    pub fn dispatch(&mut self, role: Role, event: PageEvent) -> Option<EventOutcome> {
        let ctl = self.controller.as_mut()?;
        let target = match role {
            Role::Primary => Some(ctl.elements().primary),
            Role::Secondary => Some(ctl.elements().secondary),
            Role::Window => None,
        };
        if !self.doc.has_listener(target, Binding::new(role, event.kind())) {
            return None;
        }
        Some(ctl.handle_event(&mut self.doc, self.clock.now(), role, event))
    }

    /// Pointer click on the primary element.
    pub fn click(&mut self, client_x: f64, client_y: f64) -> Option<EventOutcome> {
        self.dispatch(Role::Primary, PageEvent::click_at(client_x, client_y))
    }

    /// Key press on the primary element.
    pub fn press(&mut self, key: &str) -> Option<EventOutcome> {
        self.dispatch(Role::Primary, PageEvent::key(key))
    }

    /// Window resize.
    pub fn resize(&mut self) -> Option<EventOutcome> {
        self.dispatch(Role::Window, PageEvent::Resize)
    }

    /// Advance virtual time by `dt`, firing timers in order.
    /// Returns the number of timers fired.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let target = self.clock.now().saturating_add(dt);
        self.advance_to(target)
    }

    /// Advance virtual time to `target`, firing timers in order.
    pub fn advance_to(&mut self, target: Duration) -> usize {
        let mut fired = 0;
        if let Some(ctl) = self.controller.as_mut() {
            while let Some(next) = ctl.next_deadline().filter(|d| *d <= target) {
                self.clock.set(next);
                fired += ctl.advance(&mut self.doc, next);
            }
        }
        self.clock.set(target);
        fired
    }

    /// Tear the controller down (see [`PresentationController::shutdown`]).
    pub fn shutdown(&mut self) {
        if let Some(ctl) = self.controller.as_mut() {
            ctl.shutdown(&mut self.doc);
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.clock.now()
    }

    #[must_use]
    pub const fn document(&self) -> &MemoryDocument {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut MemoryDocument {
        &mut self.doc
    }

    #[must_use]
    pub const fn controller(&self) -> Option<&PresentationController<NodeId>> {
        self.controller.as_ref()
    }

    /// Current text of the primary element, once loaded.
    #[must_use]
    pub fn primary_text(&self) -> Option<String> {
        let ctl = self.controller.as_ref()?;
        Some(self.doc.text(&ctl.elements().primary))
    }
}
