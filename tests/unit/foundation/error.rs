use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        QuadviewError::invalid_argument("x")
            .to_string()
            .starts_with("invalid argument:")
    );
    assert!(
        QuadviewError::asset_load("x")
            .to_string()
            .starts_with("asset load failure:")
    );
    assert!(
        QuadviewError::host_call("x")
            .to_string()
            .starts_with("host call failed:")
    );
    assert!(
        QuadviewError::permission_denied("x")
            .to_string()
            .starts_with("permission denied:")
    );
    assert!(
        QuadviewError::serde("x")
            .to_string()
            .starts_with("serialization error:")
    );
}

#[test]
fn protocol_error_carries_code() {
    let err = QuadviewError::protocol(400, "Meeting UUID cannot be blank");
    assert_eq!(
        err.to_string(),
        "protocol error [400]: Meeting UUID cannot be blank"
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = QuadviewError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: QuadviewError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, QuadviewError::Serde(_)));
}
