use super::*;

fn fixture_font() -> Vec<u8> {
    std::fs::read(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/data/fonts/DejaVuSans.ttf"
    ))
    .unwrap()
}

#[test]
fn garbage_font_bytes_fail_to_register() {
    assert!(TextLayoutEngine::new(b"not a font").is_err());
}

#[test]
fn fixture_font_registers() {
    assert!(TextLayoutEngine::new(&fixture_font()).is_ok());
}

#[test]
fn measure_grows_with_text() {
    let mut engine = TextLayoutEngine::new(&fixture_font()).unwrap();
    let short = engine.measure("Hi", 32.0).unwrap();
    let long = engine.measure("Hi there, everyone", 32.0).unwrap();
    assert!(short > 0.0);
    assert!(long > short);
    assert!(engine.measure("Hi", 0.0).is_err());
}

#[test]
fn wrap_respects_width() {
    let mut engine = TextLayoutEngine::new(&fixture_font()).unwrap();
    let lines = engine
        .wrap("weekly planning sync for the platform team", 24.0, 160.0)
        .unwrap();
    assert!(lines.len() > 1);
    assert_eq!(
        lines.join(" "),
        "weekly planning sync for the platform team"
    );
    for l in &lines {
        if l.contains(' ') {
            assert!(engine.measure(l, 24.0).unwrap() <= 160.0);
        }
    }
}

#[test]
fn short_text_stays_on_one_line() {
    let mut engine = TextLayoutEngine::new(&fixture_font()).unwrap();
    let lines = engine.wrap("Standup", 24.0, 400.0).unwrap();
    assert_eq!(lines, vec!["Standup".to_string()]);
}
