//! Easing curves
//!
//! Every curve maps linear progress `t` in `[0, 1]` to eased progress.
//! Input is clamped and the endpoints are exact, so a finished tween always
//! lands precisely on its target regardless of the curve's overshoot.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    #[default]
    Linear,
    /// Quadratic ease in (`power1.in`)
    EaseIn,
    /// Quadratic ease out (`power1.out`)
    EaseOut,
    /// Quadratic ease in-out (`power1.inOut`)
    EaseInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    Power3Out,
    Power4Out,
    SineInOut,
    /// Overshoots past 1.0 then settles (`back.out(1.7)`)
    BackOut,
    /// Spring-like overshoot (`elastic.out(1, 0.3)`)
    ElasticOut,
    /// CSS-style cubic bezier with control points (x1, y1, x2, y2)
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the easing to linear progress `t`
    pub fn apply(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::Power3Out => 1.0 - (1.0 - t).powi(4),
            Easing::Power4Out => 1.0 - (1.0 - t).powi(5),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::BackOut => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
            Easing::ElasticOut => {
                const C4: f32 = (2.0 * PI) / 3.0;
                2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * C4).sin() + 1.0
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, *x1, *y1, *x2, *y2),
        }
    }

    /// Whether the curve can leave the `[0, 1]` range mid-flight
    pub fn overshoots(&self) -> bool {
        match self {
            Easing::BackOut | Easing::ElasticOut => true,
            Easing::CubicBezier(_, y1, _, y2) => {
                !(0.0..=1.0).contains(y1) || !(0.0..=1.0).contains(y2)
            }
            _ => false,
        }
    }

    fn name(&self) -> String {
        match self {
            Easing::Linear => "none".to_string(),
            Easing::EaseIn => "power1.in".to_string(),
            Easing::EaseOut => "power1.out".to_string(),
            Easing::EaseInOut => "power1.inOut".to_string(),
            Easing::CubicIn => "power2.in".to_string(),
            Easing::CubicOut => "power2.out".to_string(),
            Easing::CubicInOut => "power2.inOut".to_string(),
            Easing::Power3Out => "power3.out".to_string(),
            Easing::Power4Out => "power4.out".to_string(),
            Easing::SineInOut => "sine.inOut".to_string(),
            Easing::BackOut => "back.out".to_string(),
            Easing::ElasticOut => "elastic.out".to_string(),
            Easing::CubicBezier(x1, y1, x2, y2) => {
                format!("cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

/// Solve the bezier x(s) = t with Newton iterations, falling back to
/// bisection, then evaluate y(s).
fn cubic_bezier(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let bezier = |s: f32, p1: f32, p2: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    };
    let derivative = |s: f32, p1: f32, p2: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
    };

    let mut s = t;
    for _ in 0..8 {
        let x = bezier(s, x1, x2) - t;
        if x.abs() < 1e-6 {
            return bezier(s, y1, y2);
        }
        let d = derivative(s, x1, x2);
        if d.abs() < 1e-6 {
            break;
        }
        s -= x / d;
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = t;
    for _ in 0..32 {
        let x = bezier(s, x1, x2);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    bezier(s, y1, y2)
}

/// Error returned when an easing name is not recognized
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownEasing(pub String);

impl fmt::Display for UnknownEasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown easing '{}'", self.0)
    }
}

impl std::error::Error for UnknownEasing {}

impl FromStr for Easing {
    type Err = UnknownEasing;

    /// Parse GSAP-style names (`power3.out`, `back.out(1.7)`, `sine.inOut`)
    /// plus CSS keywords (`linear`, `ease-in`, `ease-out`, `ease-in-out`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Curve parameters in parentheses are accepted but not configurable
        let base = trimmed.split('(').next().unwrap_or(trimmed).trim();

        if base == "cubic-bezier" {
            let args: Vec<f32> = trimmed
                .trim_start_matches("cubic-bezier")
                .trim_matches(|c| c == '(' || c == ')' || c == ' ')
                .split(',')
                .map(|p| p.trim().parse::<f32>())
                .collect::<Result<_, _>>()
                .map_err(|_| UnknownEasing(s.to_string()))?;
            return match args.as_slice() {
                [x1, y1, x2, y2] => Ok(Easing::CubicBezier(*x1, *y1, *x2, *y2)),
                _ => Err(UnknownEasing(s.to_string())),
            };
        }

        let easing = match base {
            "none" | "linear" => Easing::Linear,
            "power1.in" | "ease-in" => Easing::EaseIn,
            "power1.out" | "power1" | "ease-out" => Easing::EaseOut,
            "power1.inOut" | "ease-in-out" => Easing::EaseInOut,
            "power2.in" => Easing::CubicIn,
            "power2.out" | "power2" => Easing::CubicOut,
            "power2.inOut" => Easing::CubicInOut,
            "power3.out" | "power3" => Easing::Power3Out,
            "power4.out" | "power4" => Easing::Power4Out,
            "sine.inOut" => Easing::SineInOut,
            "back.out" | "back" => Easing::BackOut,
            "elastic.out" | "elastic" => Easing::ElasticOut,
            _ => return Err(UnknownEasing(s.to_string())),
        };
        Ok(easing)
    }
}

impl TryFrom<String> for Easing {
    type Error = UnknownEasing;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.name()
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
