use super::*;

#[test]
fn roles_round_trip_host_names() {
    let r: Role = serde_json::from_str("\"host\"").unwrap();
    assert_eq!(r, Role::Host);
    let r: Role = serde_json::from_str("\"coHost\"").unwrap();
    assert_eq!(r, Role::CoHost);
    let r: Role = serde_json::from_str("\"panelist\"").unwrap();
    assert_eq!(r, Role::Other("panelist".to_owned()));
    assert_eq!(serde_json::to_string(&Role::Attendee).unwrap(), "\"attendee\"");
}

#[test]
fn running_context_meeting_check() {
    assert!(RunningContext::InMeeting.is_meeting());
    assert!(RunningContext::InImmersive.is_meeting());
    assert!(!RunningContext::InClient.is_meeting());
    let c: RunningContext = serde_json::from_str("\"inWebinar\"").unwrap();
    assert!(!c.is_meeting());
}

#[test]
fn participant_json_uses_camel_case() {
    let p: Participant = serde_json::from_str(
        r#"{"participantId":"16778240","role":"attendee","screenName":"Ada"}"#,
    )
    .unwrap();
    assert_eq!(p.participant_id.as_str(), "16778240");
    assert_eq!(p.screen_name, "Ada");

    let bare: Participant =
        serde_json::from_str(r#"{"participantId":"1","role":"host"}"#).unwrap();
    assert!(bare.screen_name.is_empty());
}
