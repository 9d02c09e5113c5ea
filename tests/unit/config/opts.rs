use std::io::Write as _;

use super::*;

#[test]
fn defaults_are_valid() {
    let opts = LayoutOpts::default();
    opts.validate().unwrap();
    assert_eq!(opts.branding_quadrant.get(), 3);
    assert!((opts.aspect_inverse() - 9.0 / 16.0).abs() < 1e-12);
    assert_eq!(opts.resize_debounce(), Duration::from_millis(250));
}

#[test]
fn validate_rejects_out_of_range_values() {
    let bad_ratio = LayoutOpts {
        card_width_ratio: 1.5,
        ..Default::default()
    };
    assert!(bad_ratio.validate().is_err());

    let bad_aspect = LayoutOpts {
        aspect: [16, 0],
        ..Default::default()
    };
    assert!(bad_aspect.validate().is_err());

    let bad_debounce = LayoutOpts {
        resize_debounce_ms: LayoutOpts::MAX_DEBOUNCE_MS + 1,
        ..Default::default()
    };
    assert!(bad_debounce.validate().is_err());
}

#[test]
fn ratios_are_held_to_their_layout_ranges() {
    let with = |card: f64, corner: f64| LayoutOpts {
        card_width_ratio: card,
        corner_radius_ratio: corner,
        ..Default::default()
    };
    with(0.85, 0.15).validate().unwrap();
    with(0.90, 0.30).validate().unwrap();
    assert!(with(0.5, 0.3).validate().is_err());
    assert!(with(0.95, 0.3).validate().is_err());
    assert!(with(0.85, 0.1).validate().is_err());
    assert!(with(0.85, 0.5).validate().is_err());
    assert!(with(f64::NAN, 0.3).validate().is_err());
}

#[test]
fn partial_json_fills_defaults() {
    let opts: LayoutOpts =
        serde_json::from_str(r##"{"resizeDebounceMs": 500, "textColor": "#ffffff"}"##).unwrap();
    assert_eq!(opts.resize_debounce_ms, 500);
    assert_eq!(opts.text_color, Color::rgb(255, 255, 255));
    assert_eq!(opts.card_width_ratio, 0.85);
}

#[test]
fn from_path_validates() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(br#"{"brandingQuadrant": 9}"#).unwrap();
    assert!(LayoutOpts::from_path(f.path()).is_err());

    let mut ok = tempfile::NamedTempFile::new().unwrap();
    ok.write_all(br#"{"brandingQuadrant": 0}"#).unwrap();
    let opts = LayoutOpts::from_path(ok.path()).unwrap();
    assert_eq!(opts.branding_quadrant.get(), 0);
}

#[test]
fn cast_quadrants_skip_the_branding_quadrant() {
    let opts = LayoutOpts::default();
    let idx: Vec<usize> = opts.cast_quadrants().iter().map(|q| q.get()).collect();
    assert_eq!(idx, vec![0, 1, 2]);

    let moved = LayoutOpts {
        branding_quadrant: QuadrantIndex::try_new(0).unwrap(),
        ..Default::default()
    };
    let idx: Vec<usize> = moved.cast_quadrants().iter().map(|q| q.get()).collect();
    assert_eq!(idx, vec![1, 2, 3]);
}
