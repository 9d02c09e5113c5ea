use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{QuadviewError, QuadviewResult};

pub use kurbo::{BezPath, Point, Rect, RoundedRect};

/// Viewport size in logical (CSS) pixels plus the device pixel ratio.
///
/// Recomputed on every resize; never persisted.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportMetrics {
    /// Width in logical pixels.
    pub logical_width: f64,
    /// Height in logical pixels.
    pub logical_height: f64,
    /// Device pixels per logical pixel, must be > 0.
    pub device_pixel_ratio: f64,
}

impl ViewportMetrics {
    /// Create validated viewport metrics.
    ///
    /// Zero width/height is accepted (it yields degenerate geometry); negative or non-finite
    /// values and a non-positive pixel ratio are rejected.
    pub fn new(
        logical_width: f64,
        logical_height: f64,
        device_pixel_ratio: f64,
    ) -> QuadviewResult<Self> {
        let m = Self {
            logical_width,
            logical_height,
            device_pixel_ratio,
        };
        m.validate()?;
        Ok(m)
    }

    /// Check the invariants documented on [`ViewportMetrics::new`].
    pub fn validate(&self) -> QuadviewResult<()> {
        if !self.logical_width.is_finite() || self.logical_width < 0.0 {
            return Err(QuadviewError::invalid_argument(
                "viewport width must be finite and >= 0",
            ));
        }
        if !self.logical_height.is_finite() || self.logical_height < 0.0 {
            return Err(QuadviewError::invalid_argument(
                "viewport height must be finite and >= 0",
            ));
        }
        if !self.device_pixel_ratio.is_finite() || self.device_pixel_ratio <= 0.0 {
            return Err(QuadviewError::invalid_argument(
                "device pixel ratio must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Viewport width in device pixels.
    pub fn device_width(&self) -> f64 {
        self.logical_width * self.device_pixel_ratio
    }

    /// Viewport height in device pixels.
    pub fn device_height(&self) -> f64 {
        self.logical_height * self.device_pixel_ratio
    }

    /// Return `true` when either device dimension is zero.
    pub fn is_degenerate(&self) -> bool {
        self.device_width() <= 0.0 || self.device_height() <= 0.0
    }
}

/// One of the four screen quadrants.
///
/// `0` top-left, `1` top-right, `2` bottom-left, `3` bottom-right.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct QuadrantIndex(u8);

impl QuadrantIndex {
    /// Number of quadrants tiling the viewport.
    pub const COUNT: usize = 4;

    /// All quadrants in draw order.
    pub const ALL: [QuadrantIndex; 4] = [Self(0), Self(1), Self(2), Self(3)];

    /// Validate and wrap a raw index, failing outside `[0, 3]`.
    pub fn try_new(idx: usize) -> QuadviewResult<Self> {
        if idx >= Self::COUNT {
            return Err(QuadviewError::invalid_argument(format!(
                "quadrant index {idx} is outside of range (0-3)"
            )));
        }
        Ok(Self(idx as u8))
    }

    /// Raw index as `usize`.
    pub fn get(self) -> usize {
        usize::from(self.0)
    }

    /// Quadrants 1 and 3 sit in the right column.
    pub fn is_right(self) -> bool {
        self.0 % 2 == 1
    }

    /// Quadrants 2 and 3 sit in the bottom row.
    pub fn is_bottom(self) -> bool {
        self.0 >= 2
    }
}

impl TryFrom<u8> for QuadrantIndex {
    type Error = QuadviewError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Self::try_new(usize::from(v))
    }
}

impl From<QuadrantIndex> for u8 {
    fn from(q: QuadrantIndex) -> Self {
        q.0
    }
}

impl fmt::Display for QuadrantIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Straight-alpha RGBA8 color exchanged as a CSS hex string (`#rrggbb` / `#rrggbbaa`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert to premultiplied RGBA8 bytes.
    pub fn to_premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }

    pub(crate) fn to_peniko(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0x0e, 0x72, 0xed)
    }
}

impl FromStr for Color {
    type Err = QuadviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        let byte = |pair: &str| -> QuadviewResult<u8> {
            u8::from_str_radix(pair, 16).map_err(|_| {
                QuadviewError::invalid_argument(format!("invalid hex byte \"{pair}\""))
            })
        };
        let nibble = |c: &str| -> QuadviewResult<u8> { Ok(byte(c)? * 17) };

        if !hex.is_ascii() {
            return Err(QuadviewError::invalid_argument(format!(
                "invalid color \"{s}\""
            )));
        }
        match hex.len() {
            3 => Ok(Self::rgb(
                nibble(&hex[0..1])?,
                nibble(&hex[1..2])?,
                nibble(&hex[2..3])?,
            )),
            6 => Ok(Self::rgb(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
            )),
            8 => Ok(Self {
                r: byte(&hex[0..2])?,
                g: byte(&hex[2..4])?,
                b: byte(&hex[4..6])?,
                a: byte(&hex[6..8])?,
            }),
            _ => Err(QuadviewError::invalid_argument(
                "hex color must be #RGB, #RRGGBB or #RRGGBBAA",
            )),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = QuadviewError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// A coordinate in the host's logical pixel space, rendered as `"<n>px"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct LogicalPx(pub i64);

impl LogicalPx {
    /// Convert a device-pixel value to logical pixels (floor of `raw / ratio`).
    pub fn from_device(raw: f64, device_pixel_ratio: f64) -> Self {
        if device_pixel_ratio <= 0.0 || !raw.is_finite() {
            return Self(0);
        }
        Self((raw / device_pixel_ratio).floor() as i64)
    }
}

impl fmt::Display for LogicalPx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

impl From<LogicalPx> for String {
    fn from(v: LogicalPx) -> Self {
        v.to_string()
    }
}

impl TryFrom<String> for LogicalPx {
    type Error = QuadviewError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let n = s
            .trim()
            .strip_suffix("px")
            .ok_or_else(|| QuadviewError::invalid_argument(format!("\"{s}\" is not a px value")))?;
        n.parse::<i64>()
            .map(Self)
            .map_err(|e| QuadviewError::invalid_argument(format!("invalid px value \"{s}\": {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
