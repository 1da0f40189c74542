#![forbid(unsafe_code)]

//! The presentation controller.
//!
//! [`PresentationController`] owns every piece of mutable page state: the
//! three resolved elements, the timer queue, the single resize debounce
//! handle, and the RNG. It never touches a clock or the DOM directly. The host
//! passes `now` and a [`Surface`] into each call:
//!
//! 1. [`PresentationController::initialize`] once at page ready.
//! 2. [`PresentationController::handle_event`] for every routed DOM event.
//! 3. [`PresentationController::advance`] whenever time moves past
//!    [`PresentationController::next_deadline`].
//!
//! # Invariants
//!
//! - Setup either registers everything or nothing.
//! - At most one resize-settle timer is pending.
//! - Every ripple and particle node gets exactly one removal timer, fixed at
//!   creation; removal is idempotent.
//! - Timers fire in (deadline, scheduling order); each runs at its own
//!   deadline, so rescheduling from inside a timer keeps exact cadence.
//! - A burst firing a full interval late restarts its cadence from `now`,
//!   and particles whose lifetime already elapsed are never created, so a
//!   stalled host does not replay missed bursts.

use core::time::Duration;

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::config::FxConfig;
use crate::effects::{
    PARTICLE_CLASS, ParticleSpec, RIPPLE_CLASS, RippleGeometry, fx_stylesheet,
};
use crate::error::FxError;
use crate::event::{EventKind, EventOutcome, PageEvent, PointerPos, is_activation_key};
use crate::phrases::PhraseDeck;
use crate::style::{Color, InlineStyle, Length, Outline, Position, Transform};
use crate::surface::{Binding, Role, Surface, Tag};
use crate::timer::{TimerId, TimerQueue};

/// Warning emitted when setup cannot find its elements.
pub const MISSING_ELEMENTS_MESSAGE: &str =
    "Some DOM elements not found. Interactive features may not work properly.";
/// Informational message emitted after successful setup.
pub const LOADED_MESSAGE: &str = "Hello World interactive features loaded successfully! 🌟";
/// Message emitted when a resize burst settles.
pub const RESIZE_SETTLED_MESSAGE: &str = "Window resized, recalculating positions...";

const ACTIVE_SCALE: f64 = 1.05;
const HOVER_LIFT_PX: f64 = -2.0;
const FOCUS_OUTLINE_PX: f64 = 2.0;
const FOCUS_OFFSET_PX: f64 = 4.0;

/// The three elements the controller drives.
#[derive(Debug, Clone, PartialEq)]
pub struct PageElements<N> {
    pub primary: N,
    pub secondary: N,
    pub container: N,
}

/// Running counters, exposed to hosts for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ControllerStats {
    pub activations: u64,
    pub ripples_created: u64,
    pub ripples_removed: u64,
    pub particles_created: u64,
    pub particles_removed: u64,
    pub bursts: u64,
    pub resize_events: u64,
    pub resize_settled: u64,
}

#[derive(Debug, Clone)]
enum Task<N> {
    RemoveRipple(N),
    RevertPhrase,
    SpawnParticle,
    Burst,
    RemoveParticle(N),
    ResizeSettled,
}

/// Event-driven controller for the greeting page.
#[derive(Debug)]
pub struct PresentationController<N> {
    config: FxConfig,
    deck: PhraseDeck,
    elements: PageElements<N>,
    timers: TimerQueue<Task<N>>,
    resize_timer: Option<TimerId>,
    /// Text shown before the first of a run of overlapping activations.
    resting_text: Option<String>,
    pending_reverts: u32,
    rng: fastrand::Rng,
    now: Duration,
    stats: ControllerStats,
    shut_down: bool,
}

impl<N: Clone + core::fmt::Debug> PresentationController<N> {
    /// Resolve the page elements and wire every listener and timer.
    ///
    /// If any element is missing, emits a single warning and returns
    /// [`FxError::MissingElements`] without touching `surface`.
    pub fn initialize<S>(surface: &mut S, config: FxConfig, now: Duration) -> Result<Self, FxError>
    where
        S: Surface<Node = N>,
    {
        config.validate()?;

        let lookup = (
            surface.query_class(&config.primary_selector),
            surface.query_class(&config.secondary_selector),
            surface.query_class(&config.container_selector),
        );
        let (primary, secondary, container) = match lookup {
            (Some(p), Some(s), Some(c)) => (p, s, c),
            (p, s, c) => {
                let missing: Vec<String> = [
                    (p.is_none(), &config.primary_selector),
                    (s.is_none(), &config.secondary_selector),
                    (c.is_none(), &config.container_selector),
                ]
                .into_iter()
                .filter_map(|(absent, name)| absent.then(|| name.clone()))
                .collect();
                warn!(missing = ?missing, "{MISSING_ELEMENTS_MESSAGE}");
                return Err(FxError::MissingElements { missing });
            }
        };

        let deck = PhraseDeck::new(config.phrases.clone())
            .ok_or_else(|| FxError::InvalidConfig("phrase list is empty".into()))?;
        let css = fx_stylesheet(&config)
            .ok_or_else(|| FxError::InvalidConfig("selector is not a CSS class name".into()))?
            .to_css();
        let rng = config
            .seed
            .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);

        let mut ctl = Self {
            config,
            deck,
            elements: PageElements {
                primary,
                secondary,
                container,
            },
            timers: TimerQueue::new(),
            resize_timer: None,
            resting_text: None,
            pending_reverts: 0,
            rng,
            now,
            stats: ControllerStats::default(),
            shut_down: false,
        };

        let primary = ctl.elements.primary.clone();
        let secondary = ctl.elements.secondary.clone();

        surface.listen(Some(&primary), Binding::new(Role::Primary, EventKind::Click));
        surface.listen(Some(&secondary), Binding::new(Role::Secondary, EventKind::MouseEnter));
        surface.listen(Some(&secondary), Binding::new(Role::Secondary, EventKind::MouseLeave));

        ctl.schedule_burst(now);
        surface.append_stylesheet(&css);
        ctl.timers.schedule(now + ctl.config.burst_interval(), Task::Burst);

        surface.set_attribute(&primary, "tabindex", "0");
        surface.set_attribute(&primary, "role", "button");
        surface.set_attribute(&primary, "aria-label", &ctl.config.aria_label);
        surface.listen(Some(&primary), Binding::new(Role::Primary, EventKind::KeyDown));
        surface.listen(Some(&primary), Binding::new(Role::Primary, EventKind::Focus));
        surface.listen(Some(&primary), Binding::new(Role::Primary, EventKind::Blur));

        surface.listen(None, Binding::new(Role::Window, EventKind::Resize));

        surface.set_root_style(&InlineStyle::new().scroll_behavior_smooth());

        info!("{LOADED_MESSAGE}");
        Ok(ctl)
    }

    /// Route one page event. `now` must not precede earlier calls.
    pub fn handle_event<S>(
        &mut self,
        surface: &mut S,
        now: Duration,
        role: Role,
        event: PageEvent,
    ) -> EventOutcome
    where
        S: Surface<Node = N>,
    {
        if self.shut_down {
            return EventOutcome::IGNORED;
        }
        self.now = self.now.max(now);

        match (role, event) {
            (Role::Primary, PageEvent::Click { pointer }) => {
                self.activate(surface, pointer);
                EventOutcome::IGNORED
            }
            (Role::Primary, PageEvent::KeyDown { key }) if is_activation_key(&key) => {
                self.activate(surface, None);
                EventOutcome::PREVENT_DEFAULT
            }
            (Role::Primary, PageEvent::Focus) => {
                let style = InlineStyle::new()
                    .outline(Outline::Solid {
                        width: Length::Px(FOCUS_OUTLINE_PX),
                        color: Color::ACCENT,
                    })
                    .outline_offset(Length::Px(FOCUS_OFFSET_PX));
                surface.apply_style(&self.elements.primary, &style);
                EventOutcome::IGNORED
            }
            (Role::Primary, PageEvent::Blur) => {
                let style = InlineStyle::new().outline(Outline::None);
                surface.apply_style(&self.elements.primary, &style);
                EventOutcome::IGNORED
            }
            (Role::Secondary, PageEvent::MouseEnter) => {
                let style = InlineStyle::new()
                    .transform(Transform::TranslateY(Length::Px(HOVER_LIFT_PX)))
                    .color(Color::ACCENT);
                surface.apply_style(&self.elements.secondary, &style);
                EventOutcome::IGNORED
            }
            (Role::Secondary, PageEvent::MouseLeave) => {
                let style = InlineStyle::new()
                    .transform(Transform::TranslateY(Length::Px(0.0)))
                    .color(Color::MUTED);
                surface.apply_style(&self.elements.secondary, &style);
                EventOutcome::IGNORED
            }
            (Role::Window, PageEvent::Resize) => {
                self.on_resize();
                EventOutcome::IGNORED
            }
            (role, event) => {
                trace!(?role, kind = ?event.kind(), "event ignored");
                EventOutcome::IGNORED
            }
        }
    }

    /// Fire every timer due at or before `now`. Returns how many fired.
    pub fn advance<S>(&mut self, surface: &mut S, now: Duration) -> usize
    where
        S: Surface<Node = N>,
    {
        self.now = self.now.max(now);
        let mut fired = 0;
        while let Some((deadline, _id, task)) = self.timers.pop_due(self.now) {
            self.run_task(surface, deadline, task);
            fired += 1;
        }
        fired
    }

    /// Cancel all timers and detach every live ripple and particle. A pending
    /// phrase revert is applied immediately. Later events are ignored.
    pub fn shutdown<S>(&mut self, surface: &mut S)
    where
        S: Surface<Node = N>,
    {
        let mut revert = false;
        for task in self.timers.drain() {
            match task {
                Task::RemoveRipple(node) => {
                    if surface.remove_node(&node) {
                        self.stats.ripples_removed += 1;
                    }
                }
                Task::RemoveParticle(node) => {
                    if surface.remove_node(&node) {
                        self.stats.particles_removed += 1;
                    }
                }
                Task::RevertPhrase => revert = true,
                Task::SpawnParticle | Task::Burst | Task::ResizeSettled => {}
            }
        }
        if revert {
            self.pending_reverts = 1;
            self.revert_phrase(surface);
        }
        self.resize_timer = None;
        self.shut_down = true;
        debug!(stats = ?self.stats, "controller shut down");
    }

    /// Earliest pending timer deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether a resize-settle callback is scheduled.
    #[must_use]
    pub fn resize_pending(&self) -> bool {
        self.resize_timer
            .is_some_and(|id| self.timers.is_pending(id))
    }

    #[must_use]
    pub const fn stats(&self) -> ControllerStats {
        self.stats
    }

    #[must_use]
    pub const fn elements(&self) -> &PageElements<N> {
        &self.elements
    }

    #[must_use]
    pub const fn config(&self) -> &FxConfig {
        &self.config
    }

    #[must_use]
    pub const fn phrases(&self) -> &PhraseDeck {
        &self.deck
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub const fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    fn activate<S>(&mut self, surface: &mut S, pointer: Option<PointerPos>)
    where
        S: Surface<Node = N>,
    {
        let primary = self.elements.primary.clone();
        self.stats.activations += 1;

        self.spawn_ripple(surface, &primary, pointer);

        if self.resting_text.is_none() {
            self.resting_text = Some(surface.text(&primary));
        }
        let phrase = self.deck.pick(&mut self.rng).to_owned();
        surface.set_text(&primary, &phrase);
        surface.apply_style(
            &primary,
            &InlineStyle::new().transform(Transform::Scale(ACTIVE_SCALE)),
        );
        self.pending_reverts += 1;
        self.timers
            .schedule(self.now + self.config.phrase_revert(), Task::RevertPhrase);
        debug!(%phrase, "phrase swapped");
    }

    fn spawn_ripple<S>(&mut self, surface: &mut S, host: &N, pointer: Option<PointerPos>)
    where
        S: Surface<Node = N>,
    {
        let geometry = RippleGeometry::compute(surface.bounding_rect(host), pointer);
        let Some(ripple) = surface.create_element(Tag::Span) else {
            debug!("ripple element not created");
            return;
        };
        surface.set_class(&ripple, RIPPLE_CLASS);
        surface.apply_style(&ripple, &geometry.style(self.config.ripple_lifetime()));
        surface.apply_style(
            host,
            &InlineStyle::new()
                .position(Position::Relative)
                .overflow_hidden(),
        );
        surface.append_child(host, &ripple);
        self.stats.ripples_created += 1;
        self.timers.schedule(
            self.now + self.config.ripple_lifetime(),
            Task::RemoveRipple(ripple),
        );
    }

    fn revert_phrase<S>(&mut self, surface: &mut S)
    where
        S: Surface<Node = N>,
    {
        let primary = self.elements.primary.clone();
        if let Some(text) = &self.resting_text {
            surface.set_text(&primary, text);
        }
        surface.apply_style(&primary, &InlineStyle::new().transform(Transform::Scale(1.0)));
        self.pending_reverts = self.pending_reverts.saturating_sub(1);
        if self.pending_reverts == 0 {
            self.resting_text = None;
        }
    }

    fn schedule_burst(&mut self, start: Duration) {
        let stagger = self.config.particle_stagger();
        for i in 0..self.config.particles_per_burst {
            self.timers
                .schedule(start + stagger * i, Task::SpawnParticle);
        }
        self.stats.bursts += 1;
        trace!(at = ?start, count = self.config.particles_per_burst, "particle burst scheduled");
    }

    fn spawn_particle<S>(&mut self, surface: &mut S, at: Duration)
    where
        S: Surface<Node = N>,
    {
        let spec = ParticleSpec::random(&mut self.rng, &self.config);
        let Some(particle) = surface.create_element(Tag::Div) else {
            debug!("particle element not created");
            return;
        };
        surface.set_class(&particle, PARTICLE_CLASS);
        surface.apply_style(&particle, &spec.style());
        surface.append_child(&self.elements.container, &particle);
        self.stats.particles_created += 1;
        self.timers.schedule(
            at + self.config.particle_lifetime(),
            Task::RemoveParticle(particle),
        );
    }

    fn on_resize(&mut self) {
        self.stats.resize_events += 1;
        if let Some(id) = self.resize_timer.take() {
            self.timers.cancel(id);
        }
        let id = self
            .timers
            .schedule(self.now + self.config.resize_debounce(), Task::ResizeSettled);
        self.resize_timer = Some(id);
    }

    fn run_task<S>(&mut self, surface: &mut S, deadline: Duration, task: Task<N>)
    where
        S: Surface<Node = N>,
    {
        match task {
            Task::RemoveRipple(node) => {
                if surface.remove_node(&node) {
                    self.stats.ripples_removed += 1;
                }
            }
            Task::RevertPhrase => self.revert_phrase(surface),
            Task::SpawnParticle => {
                if deadline + self.config.particle_lifetime() <= self.now {
                    trace!(at = ?deadline, "stale particle spawn skipped");
                } else {
                    self.spawn_particle(surface, deadline);
                }
            }
            Task::Burst => {
                let interval = self.config.burst_interval();
                // Missed ticks after a stall are dropped, not replayed.
                let start = if self.now >= deadline + interval {
                    debug!(late = ?(self.now - deadline), "burst timer stalled; resyncing");
                    self.now
                } else {
                    deadline
                };
                self.schedule_burst(start);
                self.timers.schedule(start + interval, Task::Burst);
            }
            Task::RemoveParticle(node) => {
                if surface.remove_node(&node) {
                    self.stats.particles_removed += 1;
                }
            }
            Task::ResizeSettled => {
                self.resize_timer = None;
                self.stats.resize_settled += 1;
                info!("{RESIZE_SETTLED_MESSAGE}");
            }
        }
    }
}
