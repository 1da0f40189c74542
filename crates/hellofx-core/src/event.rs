#![forbid(unsafe_code)]

//! Canonical page events.
//!
//! Hosts translate native DOM events into [`PageEvent`] values before handing
//! them to the controller. Only the fields the controller reads are carried.

/// Kinds of events the controller subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    MouseEnter,
    MouseLeave,
    KeyDown,
    Focus,
    Blur,
    Resize,
}

impl EventKind {
    /// DOM event type name, as passed to `addEventListener`.
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::KeyDown => "keydown",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Resize => "resize",
        }
    }
}

/// Pointer position in viewport (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPos {
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerPos {
    #[must_use]
    pub const fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }
}

/// A page event delivered to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Activation of an element. `pointer` is `None` for synthesized
    /// activations (keyboard) that carry no coordinates.
    Click { pointer: Option<PointerPos> },
    MouseEnter,
    MouseLeave,
    /// Key press; `key` follows `KeyboardEvent.key`.
    KeyDown { key: String },
    Focus,
    Blur,
    Resize,
}

impl PageEvent {
    /// Convenience for a pointer click.
    #[must_use]
    pub const fn click_at(client_x: f64, client_y: f64) -> Self {
        Self::Click {
            pointer: Some(PointerPos::new(client_x, client_y)),
        }
    }

    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self::KeyDown { key: key.into() }
    }

    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Click { .. } => EventKind::Click,
            Self::MouseEnter => EventKind::MouseEnter,
            Self::MouseLeave => EventKind::MouseLeave,
            Self::KeyDown { .. } => EventKind::KeyDown,
            Self::Focus => EventKind::Focus,
            Self::Blur => EventKind::Blur,
            Self::Resize => EventKind::Resize,
        }
    }
}

/// What the host must do with the native event after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// Call `preventDefault()` on the native event.
    pub default_prevented: bool,
}

impl EventOutcome {
    pub const IGNORED: Self = Self {
        default_prevented: false,
    };
    pub const PREVENT_DEFAULT: Self = Self {
        default_prevented: true,
    };
}

/// Keys that activate a focused button-role element.
#[must_use]
pub fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " ")
}
