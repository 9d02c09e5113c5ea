use std::path::Path;
use std::sync::Arc;

use crate::assets::decode::{PreparedImage, decode_image};
use crate::config::LayoutOpts;
use crate::foundation::error::{QuadviewError, QuadviewResult};

/// Fixed assets used by the branding card: the logo image and the topic font.
///
/// Either may be missing. A missing logo or font is reported once at load time and composition
/// carries on without it.
#[derive(Clone, Debug, Default)]
pub struct BrandAssets {
    logo: Option<PreparedImage>,
    font: Option<Arc<Vec<u8>>>,
    failures: Vec<String>,
}

impl BrandAssets {
    /// No logo, no font.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load whatever `opts` points at. Never fails; see [`BrandAssets::failures`].
    pub fn load(opts: &LayoutOpts) -> Self {
        let mut out = Self::empty();
        if let Some(p) = &opts.logo_path {
            match read_asset(p).and_then(|b| decode_image(&b)) {
                Ok(img) => out.logo = Some(img),
                Err(e) => out.report(format!("logo '{}': {e}", p.display())),
            }
        }
        if let Some(p) = &opts.font_path {
            match read_asset(p) {
                Ok(b) => out.font = Some(Arc::new(b)),
                Err(e) => out.report(format!("font '{}': {e}", p.display())),
            }
        }
        out
    }

    /// Replace the logo with an encoded image (PNG, JPEG, ...).
    pub fn with_logo_bytes(mut self, bytes: &[u8]) -> QuadviewResult<Self> {
        let img = decode_image(bytes)
            .map_err(|e| QuadviewError::asset_load(format!("logo: {e}")))?;
        self.logo = Some(img);
        Ok(self)
    }

    /// Replace the topic font with raw TTF/OTF bytes.
    pub fn with_font_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.font = Some(Arc::new(bytes));
        self
    }

    /// Decoded logo, if one loaded.
    pub fn logo(&self) -> Option<&PreparedImage> {
        self.logo.as_ref()
    }

    /// Font bytes, if a font loaded.
    pub fn font(&self) -> Option<&Arc<Vec<u8>>> {
        self.font.as_ref()
    }

    /// Human readable reasons for every asset that failed to load.
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    fn report(&mut self, msg: String) {
        tracing::warn!(%msg, "brand asset unavailable, continuing without it");
        self.failures.push(msg);
    }
}

fn read_asset(p: &Path) -> QuadviewResult<Vec<u8>> {
    std::fs::read(p)
        .map_err(|e| QuadviewError::asset_load(format!("failed to read '{}': {e}", p.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
