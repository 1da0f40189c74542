#![forbid(unsafe_code)]

//! Tracing layer that writes formatted events to a console sink.
//!
//! On `wasm32` the sink is the browser console ([`BrowserConsole`]); each
//! level maps to the matching `console.*` method so DevTools filtering works.
//! Off `wasm32` any [`ConsoleSink`] may be plugged in, which is how the
//! formatting is tested.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Destination for formatted log lines.
pub trait ConsoleSink: Send + Sync + 'static {
    fn write_line(&self, level: Level, line: &str);
}

/// Configuration for [`ConsoleLayer`].
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Most verbose level forwarded. Default: INFO
    pub max_level: Level,
    /// Prefix lines with the event target (module path). Default: false
    pub show_target: bool,
    /// Append structured fields beyond `message`. Default: true
    pub show_fields: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            max_level: Level::INFO,
            show_target: false,
            show_fields: true,
        }
    }
}

/// Extracts message and structured fields from a tracing event.
#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push((field.name(), format!("{value:?}")));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        } else {
            self.fields.push((field.name(), value.to_owned()));
        }
    }
}

/// Routes tracing events to a [`ConsoleSink`].
pub struct ConsoleLayer<W> {
    sink: W,
    config: ConsoleConfig,
}

impl<W: ConsoleSink> ConsoleLayer<W> {
    pub fn new(sink: W) -> Self {
        Self::with_config(sink, ConsoleConfig::default())
    }

    pub fn with_config(sink: W, config: ConsoleConfig) -> Self {
        Self { sink, config }
    }

    fn format(&self, target: &str, visitor: &EventVisitor) -> String {
        let mut line = String::new();
        if self.config.show_target {
            let _ = write!(line, "[{target}] ");
        }
        line.push_str(&visitor.message);
        if self.config.show_fields {
            for (name, value) in &visitor.fields {
                let _ = write!(line, " {name}={value}");
            }
        }
        line
    }
}

impl<S, W> Layer<S> for ConsoleLayer<W>
where
    S: Subscriber,
    W: ConsoleSink,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        // Higher levels are more verbose.
        if *meta.level() > self.config.max_level {
            return;
        }
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        let line = self.format(meta.target(), &visitor);
        self.sink.write_line(*meta.level(), &line);
    }
}

/// The browser's `console` object.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserConsole;

#[cfg(target_arch = "wasm32")]
impl ConsoleSink for BrowserConsole {
    fn write_line(&self, level: Level, line: &str) {
        let line = wasm_bindgen::JsValue::from_str(line);
        match level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::log_1(&line),
            Level::DEBUG | Level::TRACE => web_sys::console::debug_1(&line),
        }
    }
}

/// Install a global subscriber writing to the browser console.
///
/// Returns `false` if a global subscriber was already set.
#[cfg(target_arch = "wasm32")]
pub fn install(config: ConsoleConfig) -> bool {
    use tracing_subscriber::layer::SubscriberExt;

    let subscriber =
        tracing_subscriber::registry().with(ConsoleLayer::with_config(BrowserConsole, config));
    tracing::subscriber::set_global_default(subscriber).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::SubscriberExt;

    use pretty_assertions::assert_eq;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<(Level, String)>>>);

    impl ConsoleSink for Capture {
        fn write_line(&self, level: Level, line: &str) {
            self.0.lock().unwrap().push((level, line.to_owned()));
        }
    }

    fn run(config: ConsoleConfig, f: impl FnOnce()) -> Vec<(Level, String)> {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::registry()
            .with(ConsoleLayer::with_config(capture.clone(), config));
        tracing::subscriber::with_default(subscriber, f);
        let lines = capture.0.lock().unwrap().clone();
        lines
    }

    #[test]
    fn formats_message_and_fields() {
        let lines = run(ConsoleConfig::default(), || {
            tracing::warn!(missing = ?["subtitle"], "elements not found");
        });
        assert_eq!(
            lines,
            vec![(Level::WARN, r#"elements not found missing=["subtitle"]"#.to_owned())]
        );
    }

    #[test]
    fn filters_by_level() {
        let lines = run(ConsoleConfig::default(), || {
            tracing::debug!("hidden");
            tracing::trace!("hidden");
            tracing::info!("shown");
            tracing::error!("shown too");
        });
        let levels: Vec<Level> = lines.iter().map(|(l, _)| *l).collect();
        assert_eq!(levels, vec![Level::INFO, Level::ERROR]);
    }

    #[test]
    fn optional_target_prefix_and_no_fields() {
        let config = ConsoleConfig {
            max_level: Level::TRACE,
            show_target: true,
            show_fields: false,
        };
        let lines = run(config, || {
            tracing::debug!(target: "hellofx", count = 3, "tick");
        });
        assert_eq!(lines, vec![(Level::DEBUG, "[hellofx] tick".to_owned())]);
    }
}
