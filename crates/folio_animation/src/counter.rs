//! Numeric counter text
//!
//! Stat counters show a terminal text such as `"150+"` or `"98%"`. While
//! animating they count up from zero through whole numbers only. Texts
//! holding more than one number (`"24/7"`, `"2.5K"`, `"1,000"`) would show
//! misleading intermediates, so they are shown as-is and never counted.
//! The displayed value is clamped to the terminal value so an overshooting
//! curve never shows `101%`. At full progress the literal terminal text is
//! returned untouched.

use std::fmt;

/// A terminal text split around its first run of digits
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterText {
    literal: String,
    prefix: String,
    value: u64,
    suffix: String,
}

impl CounterText {
    /// Split `text` into prefix, integer and suffix.
    ///
    /// Returns `None` if the text has no digits, has more than one run of
    /// digits, or the number doesn't fit in a `u64`.
    pub fn parse(text: &str) -> Option<Self> {
        let start = text.find(|c: char| c.is_ascii_digit())?;
        let digits_len = text[start..]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len() - start);
        let end = start + digits_len;
        if text[end..].contains(|c: char| c.is_ascii_digit()) {
            return None;
        }
        let value = text[start..end].parse::<u64>().ok()?;

        Some(Self {
            literal: text.to_string(),
            prefix: text[..start].to_string(),
            value,
            suffix: text[end..].to_string(),
        })
    }

    /// The terminal integer
    pub fn value(&self) -> u64 {
        self.value
    }

    /// The terminal text exactly as given
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Whole-number value shown at `fraction` of the way to the terminal value
    pub fn value_at(&self, fraction: f32) -> u64 {
        if fraction >= 1.0 {
            return self.value;
        }
        if fraction <= 0.0 || !fraction.is_finite() {
            return 0;
        }
        let raw = (self.value as f64 * fraction as f64).round();
        (raw.max(0.0) as u64).min(self.value)
    }

    /// Text shown at `fraction` of the way to the terminal value
    pub fn display(&self, fraction: f32) -> String {
        if fraction >= 1.0 {
            return self.literal.clone();
        }
        format!("{}{}{}", self.prefix, self.value_at(fraction), self.suffix)
    }
}

impl fmt::Display for CounterText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}
