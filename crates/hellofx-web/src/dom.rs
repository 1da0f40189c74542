#![forbid(unsafe_code)]

//! [`Surface`] over the live browser DOM.

use std::rc::Rc;

use hellofx_core::style::InlineStyle;
use hellofx_core::{Binding, EventKind, EventOutcome, PageEvent, PointerPos, Rect, Surface, Tag};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, EventTarget, HtmlElement, KeyboardEvent, MouseEvent, Node, Window};

/// Callback the listeners route translated events into.
pub(crate) type Dispatch = Rc<dyn Fn(Binding, PageEvent) -> EventOutcome>;

struct Listener {
    target: EventTarget,
    kind: EventKind,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

pub(crate) struct DomSurface {
    document: Document,
    window: Window,
    dispatch: Dispatch,
    listeners: Vec<Listener>,
    stylesheets: Vec<web_sys::Element>,
}

impl DomSurface {
    pub(crate) fn new(window: Window, document: Document, dispatch: Dispatch) -> Self {
        Self {
            document,
            window,
            dispatch,
            listeners: Vec::new(),
            stylesheets: Vec::new(),
        }
    }

    /// Unregister every listener added through [`Surface::listen`] and drop
    /// the injected `<style>` elements.
    pub(crate) fn detach_all(&mut self) {
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind.dom_name(),
                listener.closure.as_ref().unchecked_ref(),
            );
        }
        for sheet in self.stylesheets.drain(..) {
            sheet.remove();
        }
    }

    fn text_children(node: &HtmlElement) -> Vec<Node> {
        let children = node.child_nodes();
        (0..children.length())
            .filter_map(|i| children.get(i))
            .filter(|child| child.node_type() == Node::TEXT_NODE)
            .collect()
    }
}

/// Convert a raw DOM event into a controller event.
fn translate(kind: EventKind, event: &web_sys::Event) -> Option<PageEvent> {
    let event = match kind {
        EventKind::Click => {
            // `detail == 0` marks a click with no pointer (synthetic or
            // keyboard-initiated); its coordinates are meaningless.
            let pointer = event
                .dyn_ref::<MouseEvent>()
                .filter(|m| m.detail() != 0)
                .map(|m| PointerPos::new(f64::from(m.client_x()), f64::from(m.client_y())));
            PageEvent::Click { pointer }
        }
        EventKind::KeyDown => PageEvent::key(event.dyn_ref::<KeyboardEvent>()?.key()),
        EventKind::MouseEnter => PageEvent::MouseEnter,
        EventKind::MouseLeave => PageEvent::MouseLeave,
        EventKind::Focus => PageEvent::Focus,
        EventKind::Blur => PageEvent::Blur,
        EventKind::Resize => PageEvent::Resize,
    };
    Some(event)
}

impl Surface for DomSurface {
    type Node = HtmlElement;

    fn query_class(&self, class: &str) -> Option<HtmlElement> {
        self.document
            .query_selector(&format!(".{class}"))
            .ok()
            .flatten()?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn create_element(&mut self, tag: Tag) -> Option<HtmlElement> {
        self.document
            .create_element(tag.as_str())
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn set_class(&mut self, node: &HtmlElement, class: &str) {
        node.set_class_name(class);
    }

    fn append_child(&mut self, parent: &HtmlElement, child: &HtmlElement) {
        let _ = parent.append_child(child);
    }

    fn remove_node(&mut self, node: &HtmlElement) -> bool {
        if node.parent_node().is_none() {
            return false;
        }
        node.remove();
        true
    }

    fn text(&self, node: &HtmlElement) -> String {
        Self::text_children(node)
            .iter()
            .filter_map(Node::text_content)
            .collect()
    }

    fn set_text(&mut self, node: &HtmlElement, text: &str) {
        for child in Self::text_children(node) {
            let _ = node.remove_child(&child);
        }
        let text = self.document.create_text_node(text);
        let _ = node.insert_before(&text, node.first_child().as_ref());
    }

    fn set_style_property(&mut self, node: &HtmlElement, property: &str, value: &str) {
        let _ = node.style().set_property(property, value);
    }

    fn set_attribute(&mut self, node: &HtmlElement, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn bounding_rect(&self, node: &HtmlElement) -> Rect {
        let r = node.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.width(), r.height())
    }

    fn append_stylesheet(&mut self, css: &str) {
        let Some(head) = self.document.head() else {
            tracing::debug!("document has no <head>; stylesheet skipped");
            return;
        };
        let Ok(style) = self.document.create_element("style") else {
            return;
        };
        style.set_text_content(Some(css));
        if head.append_child(&style).is_ok() {
            self.stylesheets.push(style);
        }
    }

    fn set_root_style(&mut self, style: &InlineStyle) {
        let Some(root) = self
            .document
            .document_element()
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        self.apply_style(&root, style);
    }

    fn listen(&mut self, target: Option<&HtmlElement>, binding: Binding) {
        let target: EventTarget = match target {
            Some(node) => node.clone().into(),
            None => self.window.clone().into(),
        };
        let dispatch = Rc::clone(&self.dispatch);
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            let Some(page_event) = translate(binding.kind, &event) else {
                return;
            };
            if dispatch(binding, page_event).default_prevented {
                event.prevent_default();
            }
        });
        if let Err(err) = target
            .add_event_listener_with_callback(binding.kind.dom_name(), closure.as_ref().unchecked_ref())
        {
            tracing::error!(?err, ?binding, "addEventListener failed");
            return;
        }
        self.listeners.push(Listener {
            target,
            kind: binding.kind,
            closure,
        });
    }
}
