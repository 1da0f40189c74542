#![forbid(unsafe_code)]

//! The document seam.
//!
//! [`Surface`] is the narrow slice of the DOM the controller needs. The web
//! crate implements it over `web-sys`; [`MemoryDocument`](crate::memory::MemoryDocument)
//! implements it in memory for tests and simulation.
//!
//! All operations are fire-and-forget. Implementations swallow host errors
//! rather than surfacing them, matching the controller's "rendering surface
//! is best effort" model.

use crate::event::EventKind;
use crate::style::InlineStyle;

/// Axis-aligned bounding box in viewport coordinates
/// (`getBoundingClientRect`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Which page participant a listener belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The clickable greeting text.
    Primary,
    /// The subtitle with hover styling.
    Secondary,
    /// The window (resize).
    Window,
}

/// A listener registration: events of `kind` on `role`'s target are routed
/// back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    pub role: Role,
    pub kind: EventKind,
}

impl Binding {
    #[must_use]
    pub const fn new(role: Role, kind: EventKind) -> Self {
        Self { role, kind }
    }
}

/// Element kinds the controller creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Div,
    Span,
}

impl Tag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Div => "div",
            Self::Span => "span",
        }
    }
}

/// Minimal document interface used by the controller.
pub trait Surface {
    /// Handle to an element. Cheap to clone.
    type Node: Clone + core::fmt::Debug;

    /// First element carrying class `class`.
    fn query_class(&self, class: &str) -> Option<Self::Node>;

    /// Create a detached element. `None` if the host refused.
    fn create_element(&mut self, tag: Tag) -> Option<Self::Node>;

    /// Set the element's `class` attribute.
    fn set_class(&mut self, node: &Self::Node, class: &str);

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);

    /// Detach `node` from its parent. Returns `false` when it was already
    /// detached; calling it twice is harmless.
    fn remove_node(&mut self, node: &Self::Node) -> bool;

    /// The element's own text (text-node children only).
    fn text(&self, node: &Self::Node) -> String;

    /// Replace the element's own text. Element children are kept.
    fn set_text(&mut self, node: &Self::Node, text: &str);

    fn set_style_property(&mut self, node: &Self::Node, property: &str, value: &str);

    /// Apply every declaration in `style`, in order.
    fn apply_style(&mut self, node: &Self::Node, style: &InlineStyle) {
        for (property, value) in style.iter() {
            self.set_style_property(node, property, value);
        }
    }

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn bounding_rect(&self, node: &Self::Node) -> Rect;

    /// Append a `<style>` element with `css` to the document head.
    fn append_stylesheet(&mut self, css: &str);

    /// Set an inline style property on the root (`<html>`) element.
    fn set_root_style(&mut self, style: &InlineStyle);

    /// Route `binding.kind` events on `target` (or the window when `None`)
    /// to the controller.
    fn listen(&mut self, target: Option<&Self::Node>, binding: Binding);
}
