//! Diagnostic output of the controller, captured through a tracing layer.
//!
//! Verifies:
//! 1. A failed setup emits exactly one warning and nothing at info.
//! 2. A successful setup emits the load message once.
//! 3. A resize burst produces one trailing settle line.

use core::time::Duration;
use std::sync::{Arc, Mutex};

use hellofx_core::config::FxConfig;
use hellofx_core::controller::{LOADED_MESSAGE, MISSING_ELEMENTS_MESSAGE, RESIZE_SETTLED_MESSAGE};
use hellofx_core::memory::MemoryDocument;
use hellofx_core::simulator::PageSimulator;
use tracing::Level;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct CapturedEvent {
    level: Level,
    message: String,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.0 = value.to_owned();
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.0,
        });
    }
}

/// Run `f` with a capturing subscriber and return everything logged.
fn capture(f: impl FnOnce()) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCapture {
        events: events.clone(),
    });
    tracing::subscriber::with_default(subscriber, f);
    let out = events.lock().unwrap().clone();
    out
}

fn count(events: &[CapturedEvent], level: Level, message: &str) -> usize {
    events
        .iter()
        .filter(|e| e.level == level && e.message == message)
        .count()
}

fn seeded() -> FxConfig {
    FxConfig {
        seed: Some(17),
        ..FxConfig::default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn missing_elements_warn_exactly_once() {
    let events = capture(|| {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        doc.add_element(body, "p", "subtitle");
        let mut sim = PageSimulator::new(doc);
        assert!(sim.load(seeded()).is_err());
        sim.advance(Duration::from_secs(20));
        sim.resize();
        sim.advance(Duration::from_secs(1));
    });

    let warnings: Vec<_> = events.iter().filter(|e| e.level == Level::WARN).collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message, MISSING_ELEMENTS_MESSAGE);
    assert_eq!(count(&events, Level::INFO, LOADED_MESSAGE), 0);
    assert_eq!(count(&events, Level::INFO, RESIZE_SETTLED_MESSAGE), 0);
}

#[test]
fn successful_load_logs_once_without_warnings() {
    let events = capture(|| {
        let mut sim = PageSimulator::new(MemoryDocument::greeting_page());
        sim.load(seeded()).unwrap();
        sim.advance(Duration::from_secs(12));
    });

    assert_eq!(count(&events, Level::INFO, LOADED_MESSAGE), 1);
    assert!(events.iter().all(|e| e.level != Level::WARN));
    assert_eq!(
        count(
            &events,
            Level::INFO,
            "Hello World interactive features loaded successfully! 🌟"
        ),
        1
    );
}

#[test]
fn resize_burst_logs_single_trailing_line() {
    let events = capture(|| {
        let mut sim = PageSimulator::new(MemoryDocument::greeting_page());
        sim.load(seeded()).unwrap();
        for at in [0, 50, 100] {
            sim.advance_to(Duration::from_millis(at));
            sim.resize();
        }
        sim.advance_to(Duration::from_millis(349));
        assert_eq!(sim.controller().unwrap().stats().resize_settled, 0);
        sim.advance_to(Duration::from_millis(350));
        assert_eq!(sim.controller().unwrap().stats().resize_settled, 1);
        sim.advance_to(Duration::from_secs(2));
    });

    assert_eq!(count(&events, Level::INFO, RESIZE_SETTLED_MESSAGE), 1);
}
