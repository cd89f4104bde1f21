//! Two-color gradient used to shade regions by value.

use std::fmt;

/// Fill for regions that have no value.
pub const NO_DATA_COLOR: Rgb = Rgb { r: 0x32, g: 0x3c, b: 0x48 };
/// Region border on the heat map.
pub const BORDER_COLOR: Rgb = Rgb { r: 0x40, g: 0x4a, b: 0x59 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Linear color scale over `[min, max]`; values outside are clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatScale {
    pub min: f64,
    pub max: f64,
    pub low: Rgb,
    pub high: Rgb,
}

impl Default for HeatScale {
    /// Outage percentage: 0–100, pale blue to deep blue.
    fn default() -> Self {
        HeatScale {
            min: 0.0,
            max: 100.0,
            low: Rgb { r: 0xe0, g: 0xf3, b: 0xf8 },
            high: Rgb { r: 0x00, g: 0x66, b: 0x99 },
        }
    }
}

impl HeatScale {
    pub fn color_for(&self, value: f64) -> Rgb {
        let span = self.max - self.min;
        if !value.is_finite() || span <= 0.0 {
            return self.low;
        }
        let t = ((value - self.min) / span).clamp(0.0, 1.0);
        self.low.lerp(self.high, t)
    }
}

/// Hover text for a shaded region, e.g. `"Puri: 90%"`.
pub fn tooltip(name: &str, value: f64) -> String {
    format!("{name}: {value}%")
}
