use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::core::{Color, QuadrantIndex};
use crate::foundation::error::{QuadviewError, QuadviewResult};

/// Tunables for geometry, branding card rendering and resize coalescing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOpts {
    /// Initial card width as a fraction of the quadrant width, within `CARD_WIDTH_RATIO_RANGE`.
    pub card_width_ratio: f64,
    /// Card aspect ratio as `[width, height]`.
    pub aspect: [u32; 2],
    /// Padding is `max(quadrantWidth, quadrantHeight) / padding_divisor`.
    pub padding_divisor: f64,
    /// Corner radius as a fraction of the card's shorter side, within
    /// `CORNER_RADIUS_RATIO_RANGE`.
    pub corner_radius_ratio: f64,
    /// Quadrant reserved for the logo/topic card.
    pub branding_quadrant: QuadrantIndex,
    /// Topic line height in thousandths of the available text width.
    pub text_size_per_mille: f64,
    /// Topic text color.
    pub text_color: Color,
    /// Logo image, decoded with the `image` crate.
    pub logo_path: Option<PathBuf>,
    /// Font used for topic text. Without one, topics are not rendered.
    pub font_path: Option<PathBuf>,
    /// Quiet period before a burst of resize signals triggers a redraw.
    pub resize_debounce_ms: u64,
}

impl Default for LayoutOpts {
    fn default() -> Self {
        Self {
            card_width_ratio: 0.85,
            aspect: [16, 9],
            padding_divisor: 100.0,
            corner_radius_ratio: 0.3,
            branding_quadrant: QuadrantIndex::ALL[3],
            text_size_per_mille: 64.0,
            text_color: Color::BLACK,
            logo_path: None,
            font_path: None,
            resize_debounce_ms: 250,
        }
    }
}

impl LayoutOpts {
    /// Upper bound accepted for `resize_debounce_ms`.
    pub const MAX_DEBOUNCE_MS: u64 = 10_000;
    /// Accepted card width as a share of the quadrant width, inclusive.
    pub const CARD_WIDTH_RATIO_RANGE: (f64, f64) = (0.85, 0.90);
    /// Accepted corner radius as a share of the card's shorter side, inclusive.
    pub const CORNER_RADIUS_RATIO_RANGE: (f64, f64) = (0.15, 0.30);

    /// Load options from a JSON file. Missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> QuadviewResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read layout options '{}'", path.display()))?;
        let opts: Self = serde_json::from_slice(&bytes)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Apply `QUADVIEW_*` environment overrides on top of these options.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(ms) = std::env::var("QUADVIEW_RESIZE_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.resize_debounce_ms = ms;
        }
        if let Some(p) = std::env::var_os("QUADVIEW_LOGO_PATH").filter(|v| !v.is_empty()) {
            self.logo_path = Some(PathBuf::from(p));
        }
        if let Some(p) = std::env::var_os("QUADVIEW_FONT_PATH").filter(|v| !v.is_empty()) {
            self.font_path = Some(PathBuf::from(p));
        }
        self
    }

    /// Check ranges of every numeric option.
    pub fn validate(&self) -> QuadviewResult<()> {
        fn ratio_in(name: &str, v: f64, (lo, hi): (f64, f64)) -> QuadviewResult<()> {
            if !v.is_finite() || v < lo || v > hi {
                return Err(QuadviewError::invalid_argument(format!(
                    "{name} must be in [{lo}, {hi}]"
                )));
            }
            Ok(())
        }

        ratio_in("cardWidthRatio", self.card_width_ratio, Self::CARD_WIDTH_RATIO_RANGE)?;
        ratio_in(
            "cornerRadiusRatio",
            self.corner_radius_ratio,
            Self::CORNER_RADIUS_RATIO_RANGE,
        )?;
        if self.aspect[0] == 0 || self.aspect[1] == 0 {
            return Err(QuadviewError::invalid_argument(
                "aspect components must be > 0",
            ));
        }
        if !self.padding_divisor.is_finite() || self.padding_divisor < 1.0 {
            return Err(QuadviewError::invalid_argument(
                "paddingDivisor must be finite and >= 1",
            ));
        }
        if !self.text_size_per_mille.is_finite() || self.text_size_per_mille <= 0.0 {
            return Err(QuadviewError::invalid_argument(
                "textSizePerMille must be finite and > 0",
            ));
        }
        if self.resize_debounce_ms > Self::MAX_DEBOUNCE_MS {
            return Err(QuadviewError::invalid_argument(format!(
                "resizeDebounceMs must be <= {}",
                Self::MAX_DEBOUNCE_MS
            )));
        }
        Ok(())
    }

    /// Quadrants available to cast slots, in slot order (every quadrant but the branding one).
    pub fn cast_quadrants(&self) -> [QuadrantIndex; 3] {
        let mut out = [QuadrantIndex::ALL[0]; 3];
        let mut n = 0;
        for q in QuadrantIndex::ALL {
            if q != self.branding_quadrant && n < out.len() {
                out[n] = q;
                n += 1;
            }
        }
        out
    }

    /// Card height divided by card width.
    pub fn aspect_inverse(&self) -> f64 {
        f64::from(self.aspect[1]) / f64::from(self.aspect[0])
    }

    /// Resize debounce window.
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/opts.rs"]
mod tests;
