use super::*;

fn metrics(w: f64, h: f64, dpr: f64) -> ViewportMetrics {
    ViewportMetrics::new(w, h, dpr).unwrap()
}

#[test]
fn hd_viewport_at_2x_matches_reference_numbers() {
    let opts = LayoutOpts::default();
    let g = quadrant_geometry(&metrics(1280.0, 720.0, 2.0), 0, &opts).unwrap();
    assert_eq!(g.quadrant_width, 1280.0);
    assert_eq!(g.quadrant_height, 720.0);
    assert!((g.card_width - 1088.0).abs() < 1e-9);
    assert!((g.card_height - 612.0).abs() < 1e-9);
    assert!((g.padding - 12.8).abs() < 1e-9);
    assert!(g.corner_radius > 0.0 && g.corner_radius <= g.card_height / 2.0);
}

#[test]
fn quadrants_tile_the_viewport() {
    let opts = LayoutOpts::default();
    for (w, h, dpr) in [
        (1280.0, 720.0, 2.0),
        (1001.0, 333.0, 1.0),
        (375.0, 812.0, 3.0),
        (1.0, 1.0, 1.25),
    ] {
        let m = metrics(w, h, dpr);
        let qs = all_quadrants(&m, &opts).unwrap();
        let area: f64 = qs.iter().map(|g| g.quadrant_rect().area()).sum();
        let total = m.device_width() * m.device_height();
        assert!((area - total).abs() < 1e-6, "{w}x{h}@{dpr}");

        assert_eq!(qs[0].quadrant_rect().x1, qs[1].quadrant_rect().x0);
        assert_eq!(qs[0].quadrant_rect().y1, qs[2].quadrant_rect().y0);
        assert_eq!(qs[3].quadrant_rect().x1, m.device_width());
        assert_eq!(qs[3].quadrant_rect().y1, m.device_height());
        for a in 0..4 {
            for b in (a + 1)..4 {
                let overlap = qs[a].quadrant_rect().intersect(qs[b].quadrant_rect());
                assert_eq!(overlap.area(), 0.0);
            }
        }
    }
}

#[test]
fn card_respects_padding_and_aspect() {
    let opts = LayoutOpts::default();
    for (w, h) in [(1920.0, 1080.0), (1920.0, 400.0), (800.0, 1200.0), (3000.0, 300.0)] {
        let m = metrics(w, h, 1.0);
        for g in all_quadrants(&m, &opts).unwrap() {
            assert!(g.card_height + 2.0 * g.padding <= g.quadrant_height + 1e-9);
            assert!(((g.card_width / g.card_height) - 16.0 / 9.0).abs() < 1e-9);
            let q = g.quadrant_rect();
            let c = g.card_rect();
            assert!(c.x0 >= q.x0 && c.x1 <= q.x1 + 1e-9, "{w}x{h} q{}", g.index);
            assert!(c.y0 >= q.y0 && c.y1 <= q.y1 + 1e-9, "{w}x{h} q{}", g.index);
        }
    }
}

#[test]
fn short_viewport_shrinks_card_in_unit_steps() {
    let opts = LayoutOpts::default();
    let g = quadrant_geometry(&metrics(1920.0, 400.0, 1.0), 0, &opts).unwrap();
    assert!(g.card_height + 2.0 * g.padding <= 200.0);
    // one more unit of base width would no longer fit
    let grown_h = (g.card_width / opts.card_width_ratio + 1.0) * opts.card_width_ratio * 9.0 / 16.0;
    assert!(grown_h + 2.0 * g.padding > 200.0);
}

#[test]
fn cards_hug_outer_corners() {
    let opts = LayoutOpts::default();
    let m = metrics(1280.0, 720.0, 2.0);
    let qs = all_quadrants(&m, &opts).unwrap();

    let c0 = qs[0].card_rect();
    assert_eq!(c0.x0, qs[0].padding);
    assert_eq!(c0.y0, qs[0].padding);

    let c3 = qs[3].card_rect();
    let q3 = qs[3].quadrant_rect();
    assert!(q3.x1 - c3.x1 < c3.x0 - q3.x0);
    assert!(q3.y1 - c3.y1 < c3.y0 - q3.y0);
}

#[test]
fn zero_viewport_is_degenerate_not_an_error() {
    let opts = LayoutOpts::default();
    let g = quadrant_geometry(&metrics(0.0, 720.0, 2.0), 3, &opts).unwrap();
    assert!(g.is_degenerate());
    assert_eq!(g.card_width, 0.0);
    assert_eq!(g.raster_size().0, 0);
}

#[test]
fn out_of_range_index_is_invalid_argument() {
    let err = quadrant_geometry(&metrics(100.0, 100.0, 1.0), 4, &LayoutOpts::default()).unwrap_err();
    assert!(matches!(
        err,
        crate::foundation::error::QuadviewError::InvalidArgument(_)
    ));
}

#[test]
fn geometry_is_deterministic() {
    let opts = LayoutOpts::default();
    let m = metrics(1366.0, 768.0, 1.5);
    assert_eq!(all_quadrants(&m, &opts).unwrap(), all_quadrants(&m, &opts).unwrap());
}

#[test]
fn logical_positions_divide_by_ratio() {
    let opts = LayoutOpts::default();
    let g = quadrant_geometry(&metrics(1280.0, 720.0, 2.0), 3, &opts).unwrap();
    let (x, y) = g.quadrant_position_logical();
    assert_eq!((x.0, y.0), (640, 360));
    let (cx, cy) = g.card_position_logical();
    assert_eq!(cx.0, (g.card_origin_x / 2.0).floor() as i64);
    assert_eq!(cy.0, (g.card_origin_y / 2.0).floor() as i64);
    let (w, h) = g.card_size_logical();
    assert_eq!((w.0, h.0), (544, 306));
}
