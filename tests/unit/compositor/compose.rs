use super::*;
use crate::foundation::core::ViewportMetrics;
use crate::geometry::quadrant::{all_quadrants, quadrant_geometry};

fn geometry(idx: usize) -> QuadrantGeometry {
    let m = ViewportMetrics::new(640.0, 360.0, 2.0).unwrap();
    quadrant_geometry(&m, idx, &LayoutOpts::default()).unwrap()
}

#[test]
fn participant_placement_matches_card_in_logical_px() {
    let mut c = Compositor::new(LayoutOpts::default(), &BrandAssets::empty());
    let g = geometry(1);
    let out = c
        .compose(&g, Some(&ParticipantId::new("p1")), None, Color::default())
        .unwrap();

    let p = out.participant.unwrap();
    assert_eq!(p.participant_id.as_str(), "p1");
    assert_eq!(p.x, LogicalPx((g.card_origin_x / 2.0).floor() as i64));
    assert_eq!(p.y, LogicalPx((g.card_origin_y / 2.0).floor() as i64));
    assert_eq!(p.width, LogicalPx((g.card_width / 2.0).floor() as i64));
    assert_eq!(p.z_index, 1);

    assert_eq!(out.draw.x, LogicalPx(320));
    assert_eq!(out.draw.y, LogicalPx(0));
    assert_eq!(out.draw.z_index, 2);
    assert_eq!(out.draw.pixels.width, 640);
    assert_eq!(out.draw.pixels.height, 360);
}

#[test]
fn empty_slot_has_no_placement() {
    let mut c = Compositor::new(LayoutOpts::default(), &BrandAssets::empty());
    let out = c.compose(&geometry(0), None, None, Color::default()).unwrap();
    assert!(out.participant.is_none());
}

#[test]
fn branding_quadrant_never_places_a_participant() {
    let mut c = Compositor::new(LayoutOpts::default(), &BrandAssets::empty());
    let out = c
        .compose(&geometry(3), Some(&ParticipantId::new("p9")), Some("Hi"), Color::default())
        .unwrap();
    assert!(out.participant.is_none());
    assert_eq!(out.draw.quadrant.get(), 3);
}

#[test]
fn compose_twice_is_byte_identical() {
    let mut c = Compositor::new(LayoutOpts::default(), &BrandAssets::empty());
    let m = ViewportMetrics::new(640.0, 360.0, 2.0).unwrap();
    for g in all_quadrants(&m, &LayoutOpts::default()).unwrap() {
        let a = c.compose(&g, None, Some("Topic"), Color::rgb(200, 30, 30)).unwrap();
        let b = c.compose(&g, None, Some("Topic"), Color::rgb(200, 30, 30)).unwrap();
        assert_eq!(a.draw.pixels.data, b.draw.pixels.data);
    }
}

#[test]
fn color_changes_the_background() {
    let mut c = Compositor::new(LayoutOpts::default(), &BrandAssets::empty());
    let g = geometry(2);
    let red = c.compose(&g, None, None, Color::rgb(255, 0, 0)).unwrap();
    let green = c.compose(&g, None, None, Color::rgb(0, 255, 0)).unwrap();
    assert_eq!(red.draw.pixels.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(green.draw.pixels.pixel(0, 0), Some([0, 255, 0, 255]));
}

#[test]
fn placement_without_raster_matches_compose() {
    let mut c = Compositor::new(LayoutOpts::default(), &BrandAssets::empty());
    let id = ParticipantId::new("p2");
    let g = geometry(2);
    let composed = c.compose(&g, Some(&id), None, Color::default()).unwrap();
    assert_eq!(c.placement(&g, &id), composed.participant);
    assert!(c.placement(&geometry(3), &id).is_none());
}

#[test]
fn no_font_means_no_topics() {
    let c = Compositor::new(LayoutOpts::default(), &BrandAssets::empty());
    assert!(!c.renders_topics());
}

fn fixture_assets() -> BrandAssets {
    let bytes = std::fs::read(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/data/fonts/DejaVuSans.ttf"
    ))
    .unwrap();
    BrandAssets::empty().with_font_bytes(bytes)
}

/// Pixel coordinates where `a` and `b` differ.
fn differing(a: &PixelBuffer, b: &PixelBuffer) -> Vec<(u32, u32)> {
    assert_eq!((a.width, a.height), (b.width, b.height));
    let mut out = Vec::new();
    for y in 0..a.height {
        for x in 0..a.width {
            if a.pixel(x, y) != b.pixel(x, y) {
                out.push((x, y));
            }
        }
    }
    out
}

#[test]
fn topic_text_is_drawn_inside_the_card() {
    let mut c = Compositor::new(LayoutOpts::default(), &fixture_assets());
    assert!(c.renders_topics());
    let g = geometry(3);
    let color = Color::rgb(18, 52, 86);
    let bare = c.compose(&g, None, None, color).unwrap();
    let titled = c.compose(&g, None, Some("Standup"), color).unwrap();

    let diff = differing(&bare.draw.pixels, &titled.draw.pixels);
    assert!(!diff.is_empty());

    let card = g.card_rect_local();
    for &(x, y) in &diff {
        assert!(
            f64::from(x) >= card.x0.floor()
                && f64::from(x) < card.x1.ceil()
                && f64::from(y) >= card.y0.floor()
                && f64::from(y) < card.y1.ceil(),
            "text pixel ({x}, {y}) outside card {card:?}"
        );
    }

    let min_x = diff.iter().map(|p| p.0).min().unwrap();
    let max_x = diff.iter().map(|p| p.0).max().unwrap();
    let text_center = f64::from(min_x + max_x) / 2.0;
    assert!(
        (text_center - card.center().x).abs() <= 8.0,
        "text centered at {text_center}, card at {}",
        card.center().x
    );
}

#[test]
fn long_topic_wraps_onto_several_lines() {
    let mut c = Compositor::new(LayoutOpts::default(), &fixture_assets());
    let g = geometry(3);
    let b = BrandingGeometry::from_quadrant(&g, c.opts());
    let color = Color::default();
    let bare = c.compose(&g, None, None, color).unwrap();
    let one = c.compose(&g, None, Some("Standup"), color).unwrap();
    let long = c
        .compose(
            &g,
            None,
            Some("Quarterly planning review for the platform and infrastructure teams"),
            color,
        )
        .unwrap();

    let rows = |buf: &PixelBuffer| {
        let d = differing(&bare.draw.pixels, buf);
        let top = d.iter().map(|p| p.1).min().unwrap();
        let bottom = d.iter().map(|p| p.1).max().unwrap();
        f64::from(bottom - top)
    };
    assert!(rows(&one.draw.pixels) < b.line_height * 1.5);
    assert!(rows(&long.draw.pixels) > b.line_height * 1.5);

    let card = g.card_rect_local();
    for (x, _) in differing(&bare.draw.pixels, &long.draw.pixels) {
        let x = f64::from(x);
        assert!(x >= card.x0.floor() && x < card.x1.ceil());
    }
}

#[test]
fn compose_with_topic_text_is_byte_identical() {
    let mut c = Compositor::new(LayoutOpts::default(), &fixture_assets());
    let g = geometry(3);
    let a = c
        .compose(&g, None, Some("Weekly sync with everyone"), Color::rgb(90, 10, 160))
        .unwrap();
    let b = c
        .compose(&g, None, Some("Weekly sync with everyone"), Color::rgb(90, 10, 160))
        .unwrap();
    assert_eq!(a.draw.pixels.data, b.draw.pixels.data);

    let mut fresh = Compositor::new(LayoutOpts::default(), &fixture_assets());
    let c2 = fresh
        .compose(&g, None, Some("Weekly sync with everyone"), Color::rgb(90, 10, 160))
        .unwrap();
    assert_eq!(a.draw.pixels.data, c2.draw.pixels.data);
}

#[test]
fn blank_topic_draws_nothing_extra() {
    let mut c = Compositor::new(LayoutOpts::default(), &fixture_assets());
    let g = geometry(3);
    let bare = c.compose(&g, None, None, Color::default()).unwrap();
    let blank = c.compose(&g, None, Some("   "), Color::default()).unwrap();
    assert_eq!(bare.draw.pixels.data, blank.draw.pixels.data);
}
