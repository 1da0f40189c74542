#![forbid(unsafe_code)]

//! Cosmetic primitives: ripple geometry, particle specs, and the injected
//! stylesheet.

use core::time::Duration;

use crate::config::FxConfig;
use crate::event::PointerPos;
use crate::style::{
    Animation, Color, Easing, Gradient, InlineStyle, Keyframes, Length, Position, Selector,
    Stylesheet, Transform,
};
use crate::surface::Rect;

/// Keyframes name for the particle drift.
pub const FLOAT_KEYFRAMES: &str = "float";
/// Keyframes name for the click ripple.
pub const RIPPLE_KEYFRAMES: &str = "ripple";
/// Class given to particle nodes.
pub const PARTICLE_CLASS: &str = "floating-particle";
/// Class given to ripple nodes.
pub const RIPPLE_CLASS: &str = "ripple";

const PARTICLE_SIZE_PX: f64 = 4.0;
const PARTICLE_OPACITY: f64 = 0.7;
const TRANSITION: Duration = Duration::from_millis(300);

/// Placement of a ripple inside the clicked element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleGeometry {
    /// Offset from the element's left edge.
    pub left: f64,
    /// Offset from the element's top edge.
    pub top: f64,
    /// Edge length of the (square) ripple: the element's larger dimension.
    pub size: f64,
}

impl RippleGeometry {
    /// Center a ripple on the pointer.
    ///
    /// Without a pointer the pointer offset within the element is taken as
    /// `(0, 0)`, so the ripple is centered on the element's top-left corner.
    #[must_use]
    pub fn compute(rect: Rect, pointer: Option<PointerPos>) -> Self {
        let size = rect.width.max(rect.height).max(0.0);
        let (dx, dy) = pointer.map_or((0.0, 0.0), |p| {
            (p.client_x - rect.left, p.client_y - rect.top)
        });
        Self {
            left: finite_or_zero(dx - size / 2.0),
            top: finite_or_zero(dy - size / 2.0),
            size: finite_or_zero(size),
        }
    }

    #[must_use]
    pub fn style(&self, lifetime: Duration) -> InlineStyle {
        InlineStyle::new()
            .position(Position::Absolute)
            .width(Length::Px(self.size))
            .height(Length::Px(self.size))
            .left(Length::Px(self.left))
            .top(Length::Px(self.top))
            .background(Gradient::Radial {
                stops: vec![(Color::Rgba(76, 175, 80, 0.3), 0.0), (Color::Transparent, 70.0)],
            })
            .border_radius(Length::Percent(50.0))
            .transform(Transform::Scale(0.0))
            .animation(Animation {
                name: RIPPLE_KEYFRAMES,
                duration: lifetime,
                easing: Easing::EaseOut,
                infinite: false,
            })
            .pointer_events_none()
            .z_index(1)
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Randomized attributes of one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpec {
    /// Horizontal position in percent of the container, in `[0, 100)`.
    pub left_pct: f64,
    /// Vertical position in percent of the container, in `[0, 100)`.
    pub top_pct: f64,
    /// Float animation period.
    pub duration: Duration,
}

impl ParticleSpec {
    /// Draw positions and duration independently and uniformly.
    pub fn random(rng: &mut fastrand::Rng, config: &FxConfig) -> Self {
        let left_pct = rng.f64() * 100.0;
        let top_pct = rng.f64() * 100.0;
        let span_ns = config
            .particle_max_duration_ms
            .saturating_sub(config.particle_min_duration_ms)
            .saturating_mul(1_000_000);
        let jitter_ns = ((rng.f64() * span_ns as f64) as u64).min(span_ns.saturating_sub(1));
        let duration = Duration::from_millis(config.particle_min_duration_ms)
            + Duration::from_nanos(jitter_ns);
        Self {
            left_pct,
            top_pct,
            duration,
        }
    }

    #[must_use]
    pub fn style(&self) -> InlineStyle {
        InlineStyle::new()
            .position(Position::Absolute)
            .width(Length::Px(PARTICLE_SIZE_PX))
            .height(Length::Px(PARTICLE_SIZE_PX))
            .background(Gradient::Linear {
                angle_deg: 45.0,
                stops: vec![Color::ACCENT, Color::AZURE],
            })
            .border_radius(Length::Percent(50.0))
            .pointer_events_none()
            .opacity(PARTICLE_OPACITY)
            .left(Length::Percent(self.left_pct))
            .top(Length::Percent(self.top_pct))
            .animation(Animation {
                name: FLOAT_KEYFRAMES,
                duration: self.duration,
                easing: Easing::EaseInOut,
                infinite: true,
            })
            .z_index(-1)
    }
}

fn float_frame(y: f64, deg: f64) -> InlineStyle {
    InlineStyle::new().transform(Transform::TranslateYRotate(Length::Px(y), deg))
}

/// The stylesheet fragment injected at setup: both keyframes plus
/// transition rules for the three page elements.
///
/// Returns `None` if a configured class name is not a CSS identifier;
/// [`FxConfig::validate`] rules that out.
#[must_use]
pub fn fx_stylesheet(config: &FxConfig) -> Option<Stylesheet> {
    let primary = Selector::class(&config.primary_selector)?;
    let secondary = Selector::class(&config.secondary_selector)?;
    let container = Selector::class(&config.container_selector)?;

    let sheet = Stylesheet::new()
        .keyframes(Keyframes {
            name: FLOAT_KEYFRAMES,
            frames: vec![
                (vec![0, 100], float_frame(0.0, 0.0)),
                (vec![25], float_frame(-10.0, 90.0)),
                (vec![50], float_frame(-20.0, 180.0)),
                (vec![75], float_frame(-10.0, 270.0)),
            ],
        })
        .keyframes(Keyframes {
            name: RIPPLE_KEYFRAMES,
            frames: vec![
                (vec![0], InlineStyle::new().transform(Transform::Scale(0.0)).opacity(0.6)),
                (vec![100], InlineStyle::new().transform(Transform::Scale(2.0)).opacity(0.0)),
            ],
        })
        .rule(
            primary,
            InlineStyle::new()
                .transition_all(TRANSITION, Easing::Standard)
                .cursor_pointer()
                .user_select_none(),
        )
        .rule(
            secondary,
            InlineStyle::new()
                .transition_all(TRANSITION, Easing::Standard)
                .cursor_default(),
        )
        .rule(
            container,
            InlineStyle::new().position(Position::Relative).overflow_hidden(),
        );
    Some(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ripple_centers_on_pointer() {
        let rect = Rect::new(100.0, 50.0, 200.0, 80.0);
        let g = RippleGeometry::compute(rect, Some(PointerPos::new(150.0, 90.0)));
        assert_eq!(g.size, 200.0);
        assert_eq!(g.left, 50.0 - 100.0);
        assert_eq!(g.top, 40.0 - 100.0);
    }

    #[test]
    fn ripple_without_pointer_uses_zero_offset() {
        let rect = Rect::new(300.0, 20.0, 40.0, 60.0);
        let g = RippleGeometry::compute(rect, None);
        assert_eq!(g, RippleGeometry { left: -30.0, top: -30.0, size: 60.0 });
    }

    #[test]
    fn ripple_tolerates_degenerate_rects() {
        let g = RippleGeometry::compute(
            Rect::new(f64::NAN, 0.0, f64::NAN, -5.0),
            Some(PointerPos::new(1.0, 1.0)),
        );
        assert!(g.left.is_finite() && g.top.is_finite() && g.size.is_finite());
    }

    #[test]
    fn ripple_style_declarations() {
        let g = RippleGeometry { left: -10.0, top: 5.5, size: 120.0 };
        let style = g.style(Duration::from_millis(600));
        assert_eq!(style.get("width"), Some("120px"));
        assert_eq!(style.get("left"), Some("-10px"));
        assert_eq!(style.get("top"), Some("5.5px"));
        assert_eq!(style.get("animation"), Some("ripple 0.6s ease-out"));
        assert_eq!(style.get("pointer-events"), Some("none"));
        assert_eq!(style.get("z-index"), Some("1"));
    }

    #[test]
    fn particle_spec_ranges() {
        let cfg = FxConfig::default();
        let mut rng = fastrand::Rng::with_seed(99);
        for _ in 0..500 {
            let p = ParticleSpec::random(&mut rng, &cfg);
            assert!((0.0..100.0).contains(&p.left_pct));
            assert!((0.0..100.0).contains(&p.top_pct));
            assert!(p.duration >= Duration::from_millis(3000));
            assert!(p.duration < Duration::from_millis(7000));
        }
    }

    #[test]
    fn particle_style_declarations() {
        let p = ParticleSpec {
            left_pct: 12.5,
            top_pct: 80.0,
            duration: Duration::from_millis(3500),
        };
        let style = p.style();
        assert_eq!(style.get("left"), Some("12.5%"));
        assert_eq!(style.get("top"), Some("80%"));
        assert_eq!(style.get("opacity"), Some("0.7"));
        assert_eq!(style.get("animation"), Some("float 3.5s ease-in-out infinite"));
        assert_eq!(style.get("z-index"), Some("-1"));
        assert_eq!(
            style.get("background"),
            Some("linear-gradient(45deg, #4CAF50, #2196F3)")
        );
    }

    #[test]
    fn stylesheet_covers_all_rules() {
        let css = fx_stylesheet(&FxConfig::default()).unwrap().to_css();
        assert!(css.contains("@keyframes float {"));
        assert!(css.contains("  0%, 100% { transform: translateY(0px) rotate(0deg); }"));
        assert!(css.contains("  50% { transform: translateY(-20px) rotate(180deg); }"));
        assert!(css.contains("@keyframes ripple {"));
        assert!(css.contains(
            ".hello-text { transition: all 0.3s cubic-bezier(0.4, 0, 0.2, 1); cursor: pointer; user-select: none; }"
        ));
        assert!(css.contains(".subtitle { transition: all 0.3s cubic-bezier(0.4, 0, 0.2, 1); cursor: default; }"));
        assert!(css.contains(".container { position: relative; overflow: hidden; }"));
    }

    #[test]
    fn stylesheet_requires_valid_classes() {
        let cfg = FxConfig {
            container_selector: "not valid".into(),
            ..FxConfig::default()
        };
        assert!(fx_stylesheet(&cfg).is_none());
    }
}
