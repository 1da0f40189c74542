#![forbid(unsafe_code)]

//! Typed CSS builders.
//!
//! Inline styles and the injected stylesheet are assembled from typed values
//! rather than string templates. Property names are `&'static str` and every
//! value is produced by a `Display` impl in this module, so configuration text
//! can only reach CSS output through [`Selector`], which validates it.

use core::fmt;
use core::time::Duration;

/// Whether `s` is a plain CSS identifier usable as a class name.
///
/// Accepts `[A-Za-z_-][A-Za-z0-9_-]*`, rejecting a lone `-` and a `-`
/// followed by a digit. Escapes and non-ASCII identifiers are not supported.
#[must_use]
pub fn is_css_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_' || first == '-') {
        return false;
    }
    if first == '-' && chars.clone().next().is_none_or(|c| c.is_ascii_digit()) {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Format a number for CSS. Non-finite values and negative zero become `0`.
fn write_number(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if !v.is_finite() || v == 0.0 {
        return f.write_str("0");
    }
    write!(f, "{v}")
}

struct Num(f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_number(f, self.0)
    }
}

/// A CSS length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Px(v) => write!(f, "{}px", Num(v)),
            Self::Percent(v) => write!(f, "{}%", Num(v)),
        }
    }
}

/// A CSS color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// `0xRRGGBB`.
    Hex(u32),
    Rgba(u8, u8, u8, f64),
    Transparent,
}

impl Color {
    pub const ACCENT: Self = Self::Hex(0x4CAF50);
    pub const AZURE: Self = Self::Hex(0x2196F3);
    pub const MUTED: Self = Self::Hex(0x666666);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Hex(rgb) => write!(f, "#{:06X}", rgb & 0x00FF_FFFF),
            Self::Rgba(r, g, b, a) => write!(f, "rgba({r}, {g}, {b}, {})", Num(a.clamp(0.0, 1.0))),
            Self::Transparent => f.write_str("transparent"),
        }
    }
}

/// Background gradients used by the page effects.
#[derive(Debug, Clone, PartialEq)]
pub enum Gradient {
    Linear { angle_deg: f64, stops: Vec<Color> },
    /// A circular radial gradient with explicit stop positions in percent.
    Radial { stops: Vec<(Color, f64)> },
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear { angle_deg, stops } => {
                write!(f, "linear-gradient({}deg", Num(*angle_deg))?;
                for stop in stops {
                    write!(f, ", {stop}")?;
                }
                f.write_str(")")
            }
            Self::Radial { stops } => {
                f.write_str("radial-gradient(circle")?;
                for (color, at) in stops {
                    write!(f, ", {color} {}", Length::Percent(*at))?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Transforms applied to page elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Scale(f64),
    TranslateY(Length),
    TranslateYRotate(Length, f64),
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Scale(s) => write!(f, "scale({})", Num(s)),
            Self::TranslateY(y) => write!(f, "translateY({y})"),
            Self::TranslateYRotate(y, deg) => {
                write!(f, "translateY({y}) rotate({}deg)", Num(deg))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    EaseOut,
    EaseInOut,
    /// `cubic-bezier(0.4, 0, 0.2, 1)`.
    Standard,
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
            Self::Standard => "cubic-bezier(0.4, 0, 0.2, 1)",
        })
    }
}

/// Write a duration in seconds, e.g. `0.6s`.
struct Seconds(Duration);

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", Num(self.0.as_secs_f64()))
    }
}

/// A keyframe animation reference (`animation:` shorthand).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    /// Keyframes name; always a literal defined in this crate.
    pub name: &'static str,
    pub duration: Duration,
    pub easing: Easing,
    pub infinite: bool,
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, Seconds(self.duration), self.easing)?;
        if self.infinite {
            f.write_str(" infinite")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Absolute,
    Relative,
}

impl Position {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Relative => "relative",
        }
    }
}

/// An outline, or its absence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outline {
    Solid { width: Length, color: Color },
    None,
}

impl fmt::Display for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid { width, color } => write!(f, "{width} solid {color}"),
            Self::None => f.write_str("none"),
        }
    }
}

/// An ordered list of CSS declarations.
///
/// Setting a property twice replaces the earlier value in place, so
/// declaration order is the order of first assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    decls: Vec<(&'static str, String)>,
}

impl InlineStyle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn set(mut self, property: &'static str, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        match self.decls.iter_mut().find(|(p, _)| *p == property) {
            Some(slot) => slot.1 = value,
            None => self.decls.push((property, value)),
        }
        self
    }

    #[must_use]
    pub fn position(self, position: Position) -> Self {
        self.set("position", position.as_str())
    }

    #[must_use]
    pub fn width(self, v: Length) -> Self {
        self.set("width", v)
    }

    #[must_use]
    pub fn height(self, v: Length) -> Self {
        self.set("height", v)
    }

    #[must_use]
    pub fn left(self, v: Length) -> Self {
        self.set("left", v)
    }

    #[must_use]
    pub fn top(self, v: Length) -> Self {
        self.set("top", v)
    }

    #[must_use]
    pub fn background(self, g: Gradient) -> Self {
        self.set("background", g)
    }

    #[must_use]
    pub fn border_radius(self, v: Length) -> Self {
        self.set("border-radius", v)
    }

    #[must_use]
    pub fn pointer_events_none(self) -> Self {
        self.set("pointer-events", "none")
    }

    #[must_use]
    pub fn opacity(self, v: f64) -> Self {
        self.set("opacity", Num(v.clamp(0.0, 1.0)))
    }

    #[must_use]
    pub fn animation(self, a: Animation) -> Self {
        self.set("animation", a)
    }

    #[must_use]
    pub fn z_index(self, z: i32) -> Self {
        self.set("z-index", z)
    }

    #[must_use]
    pub fn transform(self, t: Transform) -> Self {
        self.set("transform", t)
    }

    #[must_use]
    pub fn color(self, c: Color) -> Self {
        self.set("color", c)
    }

    #[must_use]
    pub fn overflow_hidden(self) -> Self {
        self.set("overflow", "hidden")
    }

    #[must_use]
    pub fn outline(self, o: Outline) -> Self {
        self.set("outline", o)
    }

    #[must_use]
    pub fn outline_offset(self, v: Length) -> Self {
        self.set("outline-offset", v)
    }

    /// `transition: all <duration> <easing>`.
    #[must_use]
    pub fn transition_all(self, duration: Duration, easing: Easing) -> Self {
        self.set("transition", format_args!("all {} {easing}", Seconds(duration)))
    }

    #[must_use]
    pub fn cursor_pointer(self) -> Self {
        self.set("cursor", "pointer")
    }

    #[must_use]
    pub fn cursor_default(self) -> Self {
        self.set("cursor", "default")
    }

    #[must_use]
    pub fn user_select_none(self) -> Self {
        self.set("user-select", "none")
    }

    #[must_use]
    pub fn scroll_behavior_smooth(self) -> Self {
        self.set("scroll-behavior", "smooth")
    }

    /// Iterate `(property, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.decls.iter().map(|(p, v)| (*p, v.as_str()))
    }

    /// Value of `property`, if declared.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.iter().find(|(p, _)| *p == property).map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Serialize as a `style` attribute body: `a: b; c: d;`.
    #[must_use]
    pub fn to_css_text(&self) -> String {
        let mut out = String::new();
        for (i, (p, v)) in self.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(p);
            out.push_str(": ");
            out.push_str(v);
            out.push(';');
        }
        out
    }
}

/// A validated class selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector(String);

impl Selector {
    /// `.name`, or `None` when `name` is not a CSS identifier.
    #[must_use]
    pub fn class(name: &str) -> Option<Self> {
        is_css_identifier(name).then(|| Self(name.to_owned()))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.0)
    }
}

/// One `@keyframes` block. Each frame lists its stop percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes {
    pub name: &'static str,
    pub frames: Vec<(Vec<u8>, InlineStyle)>,
}

#[derive(Debug, Clone, PartialEq)]
enum SheetItem {
    Keyframes(Keyframes),
    Rule(Selector, InlineStyle),
}

/// A stylesheet fragment built from keyframes and class rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    items: Vec<SheetItem>,
}

impl Stylesheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn keyframes(mut self, kf: Keyframes) -> Self {
        self.items.push(SheetItem::Keyframes(kf));
        self
    }

    #[must_use]
    pub fn rule(mut self, selector: Selector, style: InlineStyle) -> Self {
        self.items.push(SheetItem::Rule(selector, style));
        self
    }

    /// Render the fragment as CSS text.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            match item {
                SheetItem::Keyframes(kf) => {
                    out.push_str("@keyframes ");
                    out.push_str(kf.name);
                    out.push_str(" {\n");
                    for (stops, style) in &kf.frames {
                        let stops: Vec<String> = stops.iter().map(|s| format!("{s}%")).collect();
                        out.push_str("  ");
                        out.push_str(&stops.join(", "));
                        out.push_str(" { ");
                        out.push_str(&style.to_css_text());
                        out.push_str(" }\n");
                    }
                    out.push_str("}\n");
                }
                SheetItem::Rule(selector, style) => {
                    out.push_str(&selector.to_string());
                    out.push_str(" { ");
                    out.push_str(&style.to_css_text());
                    out.push_str(" }\n");
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn identifiers() {
        assert!(is_css_identifier("hello-text"));
        assert!(is_css_identifier("_x1"));
        assert!(is_css_identifier("-webkit"));
        assert!(!is_css_identifier(""));
        assert!(!is_css_identifier("-"));
        assert!(!is_css_identifier("1abc"));
        assert!(!is_css_identifier("-1abc"));
        assert!(is_css_identifier("--x"));
        assert!(!is_css_identifier("a b"));
        assert!(!is_css_identifier("a;color:red"));
        assert!(!is_css_identifier(".dot"));
    }

    #[test]
    fn numbers_render_compactly() {
        assert_eq!(Length::Px(100.0).to_string(), "100px");
        assert_eq!(Length::Px(-12.5).to_string(), "-12.5px");
        assert_eq!(Length::Px(-0.0).to_string(), "0px");
        assert_eq!(Length::Percent(f64::NAN).to_string(), "0%");
        assert_eq!(Length::Px(f64::INFINITY).to_string(), "0px");
    }

    #[test]
    fn colors() {
        assert_eq!(Color::ACCENT.to_string(), "#4CAF50");
        assert_eq!(Color::MUTED.to_string(), "#666666");
        assert_eq!(
            Color::Rgba(76, 175, 80, 0.3).to_string(),
            "rgba(76, 175, 80, 0.3)"
        );
    }

    #[test]
    fn gradients() {
        let linear = Gradient::Linear {
            angle_deg: 45.0,
            stops: vec![Color::ACCENT, Color::AZURE],
        };
        assert_eq!(linear.to_string(), "linear-gradient(45deg, #4CAF50, #2196F3)");
        let radial = Gradient::Radial {
            stops: vec![(Color::Rgba(76, 175, 80, 0.3), 0.0), (Color::Transparent, 70.0)],
        };
        assert_eq!(
            radial.to_string(),
            "radial-gradient(circle, rgba(76, 175, 80, 0.3) 0%, transparent 70%)"
        );
    }

    #[test]
    fn animation_shorthand() {
        let a = Animation {
            name: "float",
            duration: Duration::from_millis(4250),
            easing: Easing::EaseInOut,
            infinite: true,
        };
        assert_eq!(a.to_string(), "float 4.25s ease-in-out infinite");
        let r = Animation {
            name: "ripple",
            duration: Duration::from_millis(600),
            easing: Easing::EaseOut,
            infinite: false,
        };
        assert_eq!(r.to_string(), "ripple 0.6s ease-out");
    }

    #[test]
    fn inline_style_replaces_in_place() {
        let s = InlineStyle::new()
            .transform(Transform::Scale(1.05))
            .color(Color::ACCENT)
            .transform(Transform::Scale(1.0));
        assert_eq!(s.len(), 2);
        assert_eq!(s.to_css_text(), "transform: scale(1); color: #4CAF50;");
        assert_eq!(s.get("transform"), Some("scale(1)"));
        assert_eq!(s.get("opacity"), None);
    }

    #[test]
    fn stylesheet_renders_keyframes_and_rules() {
        let sheet = Stylesheet::new()
            .keyframes(Keyframes {
                name: "ripple",
                frames: vec![
                    (vec![0], InlineStyle::new().transform(Transform::Scale(0.0)).opacity(0.6)),
                    (vec![100], InlineStyle::new().transform(Transform::Scale(2.0)).opacity(0.0)),
                ],
            })
            .rule(
                Selector::class("container").unwrap(),
                InlineStyle::new().position(Position::Relative).overflow_hidden(),
            );
        assert_eq!(
            sheet.to_css(),
            "@keyframes ripple {\n  0% { transform: scale(0); opacity: 0.6; }\n  100% { transform: scale(2); opacity: 0; }\n}\n.container { position: relative; overflow: hidden; }\n"
        );
    }

    #[test]
    fn selector_rejects_injection() {
        assert!(Selector::class("x } body { display: none").is_none());
        assert_eq!(Selector::class("subtitle").unwrap().to_string(), ".subtitle");
    }
}
