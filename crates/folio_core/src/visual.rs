//! Per-element visual state
//!
//! `VisualState` is the concrete set of animatable properties of one element.
//! Layout never reads it: it only describes how the laid-out box is drawn
//! (offset, scaled, rotated, faded) and, for stat counters, how far the
//! counter has run toward its terminal value.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    /// Opacity (0.0 = invisible, 1.0 = opaque)
    pub opacity: f32,
    /// Horizontal offset from the layout position (px)
    pub translate_x: f32,
    /// Vertical offset from the layout position (px)
    pub translate_y: f32,
    /// Uniform scale around the element center
    pub scale: f32,
    /// Rotation in degrees around the element center
    pub rotation: f32,
    /// Shadow elevation (px of blur)
    pub shadow: f32,
    /// Counter progress toward the terminal value (1.0 = terminal)
    pub count: f32,
}

impl VisualState {
    /// The resting state of every element
    pub const IDENTITY: VisualState = VisualState {
        opacity: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        rotation: 0.0,
        shadow: 0.0,
        count: 1.0,
    };

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_translate(mut self, x: f32, y: f32) -> Self {
        self.translate_x = x;
        self.translate_y = y;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_shadow(mut self, shadow: f32) -> Self {
        self.shadow = shadow;
        self
    }

    /// Compose a layer on top of this state.
    ///
    /// Scale and opacity multiply, offsets/rotation/shadow add. `count` is
    /// never layered. Composing with `IDENTITY` is a no-op.
    pub fn compose(&self, layer: &VisualState) -> VisualState {
        VisualState {
            opacity: self.opacity * layer.opacity,
            translate_x: self.translate_x + layer.translate_x,
            translate_y: self.translate_y + layer.translate_y,
            scale: self.scale * layer.scale,
            rotation: self.rotation + layer.rotation,
            shadow: self.shadow + layer.shadow,
            count: self.count,
        }
    }

    /// Check if two states are approximately equal
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.opacity - other.opacity).abs() < epsilon
            && (self.translate_x - other.translate_x).abs() < epsilon
            && (self.translate_y - other.translate_y).abs() < epsilon
            && (self.scale - other.scale).abs() < epsilon
            && (self.rotation - other.rotation).abs() < epsilon
            && (self.shadow - other.shadow).abs() < epsilon
            && (self.count - other.count).abs() < epsilon
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::IDENTITY
    }
}
