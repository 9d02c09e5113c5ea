/// Logo card and topic text layout.
pub mod branding;
/// Rounded-rect paths.
pub mod path;
/// Quadrant and card geometry.
pub mod quadrant;
