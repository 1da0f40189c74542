#![forbid(unsafe_code)]

use core::time::Duration;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use hellofx_core::{
    Binding, ControllerStats, EventOutcome, FxConfig, PageEvent, PresentationController,
};
use tracing::{debug, error};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window};
use web_time::Instant;

use crate::console::{self, ConsoleConfig};
use crate::dom::{Dispatch, DomSurface};
use crate::options::{parse_options, seed_from_unit};
use crate::pump::TimerPump;

struct PageState {
    surface: DomSurface,
    pump: TimerPump,
    controller: Option<PresentationController<HtmlElement>>,
    document: Document,
    /// `DOMContentLoaded` listener while setup is deferred.
    ready: Option<Closure<dyn FnMut()>>,
}

/// Shared page runtime. Browser callbacks hold a `Weak` to it, so dropping the
/// owning [`HelloFxWeb`] is enough to stop all activity.
struct PageRuntime {
    state: RefCell<PageState>,
    epoch: Instant,
}

impl PageRuntime {
    fn new(window: Window, document: Document) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let events = weak.clone();
            let dispatch: Dispatch = Rc::new(move |binding, event| {
                events
                    .upgrade()
                    .map_or(EventOutcome::IGNORED, |rt| rt.dispatch(binding, event))
            });
            let timers = weak.clone();
            let on_timeout = Closure::<dyn FnMut()>::new(move || {
                if let Some(rt) = timers.upgrade() {
                    rt.on_timer();
                }
            });
            Self {
                state: RefCell::new(PageState {
                    surface: DomSurface::new(window.clone(), document.clone(), dispatch),
                    pump: TimerPump::new(window, on_timeout),
                    controller: None,
                    document,
                    ready: None,
                }),
                epoch: Instant::now(),
            }
        })
    }

    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn dispatch(&self, binding: Binding, event: PageEvent) -> EventOutcome {
        let Ok(mut state) = self.state.try_borrow_mut() else {
            debug!(?binding, "re-entrant event dropped");
            return EventOutcome::IGNORED;
        };
        let now = self.now();
        let state = &mut *state;
        let Some(ctl) = state.controller.as_mut() else {
            return EventOutcome::IGNORED;
        };
        let outcome = ctl.handle_event(&mut state.surface, now, binding.role, event);
        state.pump.arm(ctl.next_deadline(), now);
        outcome
    }

    fn on_timer(&self) {
        let Ok(mut state) = self.state.try_borrow_mut() else {
            debug!("timer fired during dispatch; skipped");
            return;
        };
        let now = self.now();
        let state = &mut *state;
        state.pump.fired();
        let Some(ctl) = state.controller.as_mut() else {
            return;
        };
        let fired = ctl.advance(&mut state.surface, now);
        tracing::trace!(fired, "timers advanced");
        state.pump.arm(ctl.next_deadline(), now);
    }

    fn load(&self, config: FxConfig) {
        let Ok(mut state) = self.state.try_borrow_mut() else {
            return;
        };
        let state = &mut *state;
        if let Some(ready) = state.ready.take() {
            let _ = state.document.remove_event_listener_with_callback(
                "DOMContentLoaded",
                ready.as_ref().unchecked_ref(),
            );
            // The listener may be the caller; keep it alive until we return.
            state.ready = Some(ready);
        }
        if state.controller.is_some() {
            return;
        }
        let now = self.now();
        match PresentationController::initialize(&mut state.surface, config, now) {
            Ok(ctl) => {
                state.pump.arm(ctl.next_deadline(), now);
                state.controller = Some(ctl);
            }
            // Already reported at warn level by the controller.
            Err(err) if err.is_missing_elements() => {}
            Err(err) => error!(%err, "setup failed"),
        }
    }

    fn defer_until_ready(self: &Rc<Self>, config: FxConfig) {
        let weak = Rc::downgrade(self);
        let mut pending = Some(config);
        let ready = Closure::<dyn FnMut()>::new(move || {
            if let (Some(rt), Some(config)) = (weak.upgrade(), pending.take()) {
                rt.load(config);
            }
        });
        let mut state = self.state.borrow_mut();
        if let Err(err) = state
            .document
            .add_event_listener_with_callback("DOMContentLoaded", ready.as_ref().unchecked_ref())
        {
            error!(?err, "could not wait for DOMContentLoaded");
            return;
        }
        state.ready = Some(ready);
    }

    fn stats(&self) -> ControllerStats {
        self.state
            .try_borrow()
            .ok()
            .and_then(|state| state.controller.as_ref().map(PresentationController::stats))
            .unwrap_or_default()
    }

    fn is_active(&self) -> bool {
        self.state
            .try_borrow()
            .is_ok_and(|state| state.controller.as_ref().is_some_and(|c| !c.is_shut_down()))
    }

    fn teardown(&self) {
        let Ok(mut state) = self.state.try_borrow_mut() else {
            return;
        };
        let state = &mut *state;
        state.pump.cancel();
        if let Some(ready) = state.ready.take() {
            let _ = state.document.remove_event_listener_with_callback(
                "DOMContentLoaded",
                ready.as_ref().unchecked_ref(),
            );
        }
        if let Some(ctl) = state.controller.as_mut() {
            ctl.shutdown(&mut state.surface);
        }
        state.surface.detach_all();
    }
}

/// Interactive greeting page bound to the current document.
#[wasm_bindgen]
pub struct HelloFxWeb {
    runtime: Option<Rc<PageRuntime>>,
}

#[wasm_bindgen]
impl HelloFxWeb {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { runtime: None }
    }

    /// Attach to the document.
    ///
    /// `options` is a plain object whose keys mirror the configuration fields
    /// (`phrases`, `ripple_lifetime_ms`, `seed`, ...). Setup runs immediately,
    /// or on `DOMContentLoaded` while the document is still loading. Missing
    /// page elements are logged, not thrown. Calling `init` twice is a no-op.
    pub fn init(&mut self, options: Option<JsValue>) -> Result<(), JsValue> {
        if self.runtime.is_some() {
            return Ok(());
        }
        let json = match options {
            Some(value) if !value.is_undefined() && !value.is_null() => {
                Some(String::from(js_sys::JSON::stringify(&value)?))
            }
            _ => None,
        };
        let config = parse_options(json.as_deref(), || seed_from_unit(js_sys::Math::random()))
            .map_err(|err| JsValue::from_str(&err.to_string()))?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        let loading = document.ready_state() == "loading";

        let runtime = PageRuntime::new(window, document);
        if loading {
            runtime.defer_until_ready(config);
        } else {
            runtime.load(config);
        }
        self.runtime = Some(runtime);
        Ok(())
    }

    /// Counters as a JSON object string.
    pub fn stats(&self) -> String {
        let stats = self
            .runtime
            .as_ref()
            .map(|rt| rt.stats())
            .unwrap_or_default();
        serde_json::to_string(&stats).unwrap_or_default()
    }

    /// `true` once setup succeeded and until `destroy`.
    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.runtime.as_ref().is_some_and(|rt| rt.is_active())
    }

    /// Remove effects, listeners and timers. The page shows its resting text
    /// afterwards.
    pub fn destroy(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.teardown();
        }
    }
}

impl Default for HelloFxWeb {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for HelloFxWeb {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Install the console logger and attach to the page with `options`.
#[wasm_bindgen]
pub fn start(options: Option<JsValue>) -> Result<HelloFxWeb, JsValue> {
    #[cfg(feature = "panic-hook")]
    console_error_panic_hook::set_once();
    // A host may have installed its own subscriber.
    let _ = console::install(ConsoleConfig::default());

    let mut page = HelloFxWeb::new();
    page.init(options)?;
    Ok(page)
}
