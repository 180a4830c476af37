//! Animatable value types
//!
//! `Interpolate` for scalars and full visual states, and `VisualProps`, the
//! partial property set rules use to name only what they animate.

use folio_core::VisualState;
use serde::{Deserialize, Serialize};

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t.
    ///
    /// `t` is not clamped (overshooting easings pass values outside
    /// `[0, 1]`), but `t == 1.0` must return `other` exactly.
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal (for settling detection)
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

// ============================================================================
// f32 Implementation
// ============================================================================

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        if t == 1.0 {
            return *other;
        }
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

// ============================================================================
// VisualState Implementation
// ============================================================================

impl Interpolate for VisualState {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        VisualState {
            opacity: self.opacity.lerp(&other.opacity, t),
            translate_x: self.translate_x.lerp(&other.translate_x, t),
            translate_y: self.translate_y.lerp(&other.translate_y, t),
            scale: self.scale.lerp(&other.scale, t),
            rotation: self.rotation.lerp(&other.rotation, t),
            shadow: self.shadow.lerp(&other.shadow, t),
            count: self.count.lerp(&other.count, t),
        }
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        VisualState::approx_eq(self, other, epsilon)
    }
}

// ============================================================================
// Partial property sets
// ============================================================================

/// A partial visual state: only the properties a rule animates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<f32>,
}

impl VisualProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_translate(mut self, x: f32, y: f32) -> Self {
        self.translate_x = Some(x);
        self.translate_y = Some(y);
        self
    }

    pub fn with_translate_x(mut self, x: f32) -> Self {
        self.translate_x = Some(x);
        self
    }

    pub fn with_translate_y(mut self, y: f32) -> Self {
        self.translate_y = Some(y);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn with_shadow(mut self, shadow: f32) -> Self {
        self.shadow = Some(shadow);
        self
    }

    /// Counter progress (0.0 = shows zero, 1.0 = shows the terminal text)
    pub fn with_count(mut self, count: f32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Take every property from `state`, restricted to the fields set in `self`
    pub fn sample_from(&self, state: &VisualState) -> VisualProps {
        VisualProps {
            opacity: self.opacity.map(|_| state.opacity),
            translate_x: self.translate_x.map(|_| state.translate_x),
            translate_y: self.translate_y.map(|_| state.translate_y),
            scale: self.scale.map(|_| state.scale),
            rotation: self.rotation.map(|_| state.rotation),
            shadow: self.shadow.map(|_| state.shadow),
            count: self.count.map(|_| state.count),
        }
    }

    /// Resolve a `from`/`to` pair against a rest state.
    ///
    /// Both results cover the union of the properties named by either side.
    /// A property named only on one side takes its other endpoint from `rest`.
    pub fn resolve(
        from: &VisualProps,
        to: &VisualProps,
        rest: &VisualState,
    ) -> (VisualProps, VisualProps) {
        fn pair(a: Option<f32>, b: Option<f32>, rest: f32) -> (Option<f32>, Option<f32>) {
            match (a, b) {
                (None, None) => (None, None),
                (a, b) => (Some(a.unwrap_or(rest)), Some(b.unwrap_or(rest))),
            }
        }

        let (o0, o1) = pair(from.opacity, to.opacity, rest.opacity);
        let (x0, x1) = pair(from.translate_x, to.translate_x, rest.translate_x);
        let (y0, y1) = pair(from.translate_y, to.translate_y, rest.translate_y);
        let (s0, s1) = pair(from.scale, to.scale, rest.scale);
        let (r0, r1) = pair(from.rotation, to.rotation, rest.rotation);
        let (h0, h1) = pair(from.shadow, to.shadow, rest.shadow);
        let (c0, c1) = pair(from.count, to.count, rest.count);

        (
            VisualProps {
                opacity: o0,
                translate_x: x0,
                translate_y: y0,
                scale: s0,
                rotation: r0,
                shadow: h0,
                count: c0,
            },
            VisualProps {
                opacity: o1,
                translate_x: x1,
                translate_y: y1,
                scale: s1,
                rotation: r1,
                shadow: h1,
                count: c1,
            },
        )
    }

    /// Write every set property into `state`
    ///
    /// Opacity is clamped to `[0, 1]` so overshooting curves can't push an
    /// element past fully opaque.
    pub fn apply_to(&self, state: &mut VisualState) {
        if let Some(v) = self.opacity {
            state.opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = self.translate_x {
            state.translate_x = v;
        }
        if let Some(v) = self.translate_y {
            state.translate_y = v;
        }
        if let Some(v) = self.scale {
            state.scale = v;
        }
        if let Some(v) = self.rotation {
            state.rotation = v;
        }
        if let Some(v) = self.shadow {
            state.shadow = v;
        }
        if let Some(v) = self.count {
            state.count = v;
        }
    }

    /// Start from `base` and apply every set property
    pub fn over(&self, base: &VisualState) -> VisualState {
        let mut state = *base;
        self.apply_to(&mut state);
        state
    }
}

fn lerp_opt(a: Option<f32>, b: Option<f32>, t: f32) -> Option<f32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.lerp(&b, t)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

impl Interpolate for VisualProps {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        VisualProps {
            opacity: lerp_opt(self.opacity, other.opacity, t),
            translate_x: lerp_opt(self.translate_x, other.translate_x, t),
            translate_y: lerp_opt(self.translate_y, other.translate_y, t),
            scale: lerp_opt(self.scale, other.scale, t),
            rotation: lerp_opt(self.rotation, other.rotation, t),
            shadow: lerp_opt(self.shadow, other.shadow, t),
            count: lerp_opt(self.count, other.count, t),
        }
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        let close = |a: Option<f32>, b: Option<f32>| match (a, b) {
            (Some(a), Some(b)) => (a - b).abs() < epsilon,
            (None, None) => true,
            _ => false,
        };
        close(self.opacity, other.opacity)
            && close(self.translate_x, other.translate_x)
            && close(self.translate_y, other.translate_y)
            && close(self.scale, other.scale)
            && close(self.rotation, other.rotation)
            && close(self.shadow, other.shadow)
            && close(self.count, other.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_interpolation() {
        assert!((0.0_f32.lerp(&1.0, 0.5) - 0.5).abs() < 1e-6);
        assert!((10.0_f32.lerp(&20.0, 0.25) - 12.5).abs() < 1e-6);
    }

    #[test]
    fn test_float_lerp_lands_exactly() {
        assert_eq!(0.1_f32.lerp(&0.7, 1.0), 0.7);
        assert_eq!(0.3_f32.lerp(&1.0, 1.0), 1.0);
    }

    #[test]
    fn test_resolve_fills_from_rest() {
        let from = VisualProps::new().with_opacity(0.0).with_translate_y(60.0);
        let to = VisualProps::new().with_scale(1.1);
        let (a, b) = VisualProps::resolve(&from, &to, &VisualState::IDENTITY);

        assert_eq!(a.opacity, Some(0.0));
        assert_eq!(b.opacity, Some(1.0));
        assert_eq!(a.translate_y, Some(60.0));
        assert_eq!(b.translate_y, Some(0.0));
        assert_eq!(a.scale, Some(1.0));
        assert_eq!(b.scale, Some(1.1));
        assert_eq!(a.rotation, None);
        assert_eq!(b.rotation, None);
    }

    #[test]
    fn test_props_lerp_and_apply() {
        let a = VisualProps::new().with_opacity(0.0).with_scale(0.8);
        let b = VisualProps::new().with_opacity(1.0).with_scale(1.0);
        let mid = a.lerp(&b, 0.5);
        assert!((mid.opacity.unwrap() - 0.5).abs() < 1e-6);
        assert!((mid.scale.unwrap() - 0.9).abs() < 1e-6);

        let state = mid.over(&VisualState::IDENTITY.with_rotation(12.0));
        assert!((state.opacity - 0.5).abs() < 1e-6);
        assert_eq!(state.rotation, 12.0);
    }

    #[test]
    fn test_apply_clamps_opacity() {
        let over = VisualProps::new().with_opacity(1.1).with_scale(1.1);
        let state = over.over(&VisualState::IDENTITY);
        assert_eq!(state.opacity, 1.0);
        assert_eq!(state.scale, 1.1);

        let under = VisualProps::new().with_opacity(-0.2);
        assert_eq!(under.over(&VisualState::IDENTITY).opacity, 0.0);
    }

    #[test]
    fn test_sample_from_restricts_fields() {
        let shape = VisualProps::new().with_scale(1.0).with_rotation(0.0);
        let state = VisualState::IDENTITY.with_scale(1.07).with_rotation(4.0);
        let sampled = shape.sample_from(&state);
        assert_eq!(sampled.scale, Some(1.07));
        assert_eq!(sampled.rotation, Some(4.0));
        assert_eq!(sampled.opacity, None);
    }
}
