use super::*;
use crate::foundation::core::Color;
use crate::sync::protocol::{JoinRequest, UpdateRequest};

fn join(uuid: &str) -> ClientMessage {
    ClientMessage::Join(JoinRequest {
        meeting_uuid: Some(uuid.to_owned()),
    })
}

fn update(uuid: Option<&str>, fields: SnapshotFields) -> ClientMessage {
    ClientMessage::SendUpdate(UpdateRequest {
        meeting_uuid: uuid.map(str::to_owned),
        fields,
    })
}

fn topic(t: &str) -> SnapshotFields {
    SnapshotFields {
        topic: Some(t.to_owned()),
        ..SnapshotFields::default()
    }
}

#[test]
fn first_update_creates_snapshot_and_late_joiner_receives_it() {
    let mut r = Relay::new();
    let a = r.connect();
    let out = r.handle(a, update(Some("abc"), topic("Hi"))).unwrap();
    assert!(out.is_empty());

    let snap = r.snapshot("abc").unwrap();
    assert_eq!(snap.fields.topic.as_deref(), Some("Hi"));
    assert!(snap.fields.color.is_none());
    assert!(snap.fields.participants.is_none());

    let b = r.connect();
    let out = r.handle(b, join("abc")).unwrap();
    assert_eq!(
        out,
        vec![Outgoing {
            to: b,
            message: ServerMessage::Update(topic("Hi")),
        }]
    );
}

#[test]
fn join_without_snapshot_sends_nothing() {
    let mut r = Relay::new();
    let a = r.connect();
    assert!(r.handle(a, join("m")).unwrap().is_empty());
    assert_eq!(r.room_of(a), Some("m"));
    assert_eq!(r.room_count(), 0);
}

#[test]
fn blank_meeting_id_errors_to_sender_only() {
    let mut r = Relay::new();
    let a = r.connect();
    let b = r.connect();
    r.handle(b, join("m")).unwrap();

    for msg in [update(None, topic("x")), update(Some(""), topic("x")), join("")] {
        let out = r.handle(a, msg).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].to, a);
        assert_eq!(
            out[0].message,
            ServerMessage::Error(ErrorPayload {
                code: 400,
                message: "Meeting UUID cannot be blank".to_owned(),
            })
        );
    }
    assert!(r.snapshot("m").is_none());
    assert_eq!(r.room_of(a), None);
}

#[test]
fn update_broadcasts_merged_snapshot_to_others() {
    let mut r = Relay::new();
    let a = r.connect();
    let b = r.connect();
    let c = r.connect();
    let elsewhere = r.connect();
    r.handle(b, join("m")).unwrap();
    r.handle(c, join("m")).unwrap();
    r.handle(elsewhere, join("other")).unwrap();

    r.handle(a, update(Some("m"), topic("T1"))).unwrap();
    let out = r
        .handle(
            a,
            update(
                Some("m"),
                SnapshotFields {
                    color: Some(Color::rgb(1, 2, 3)),
                    ..SnapshotFields::default()
                },
            ),
        )
        .unwrap();

    let recipients: Vec<_> = out.iter().map(|o| o.to).collect();
    assert_eq!(recipients, vec![b, c]);
    let ServerMessage::Update(fields) = &out[0].message else {
        panic!("expected update");
    };
    assert_eq!(fields.topic.as_deref(), Some("T1"));
    assert_eq!(fields.color, Some(Color::rgb(1, 2, 3)));
}

#[test]
fn first_room_sticks() {
    let mut r = Relay::new();
    let a = r.connect();
    r.handle(a, join("first")).unwrap();
    r.handle(a, update(Some("second"), topic("x"))).unwrap();
    assert_eq!(r.room_of(a), Some("first"));
    assert!(r.snapshot("first").is_some());
    assert!(r.snapshot("second").is_none());
}

#[test]
fn last_peer_leaving_deletes_snapshot() {
    let mut r = Relay::new();
    let a = r.connect();
    let b = r.connect();
    r.handle(a, update(Some("m"), topic("x"))).unwrap();
    r.handle(b, join("m")).unwrap();

    r.disconnect(a);
    assert!(r.snapshot("m").is_some());
    r.disconnect(b);
    assert!(r.snapshot("m").is_none());
    assert_eq!(r.room_count(), 0);
}

#[test]
fn unknown_peer_is_rejected() {
    let mut r = Relay::new();
    let err = r.handle(PeerId(42), join("m")).unwrap_err();
    assert!(matches!(err, QuadviewError::InvalidArgument(_)));
}

#[test]
fn empty_topic_does_not_overwrite_stored_topic() {
    let mut r = Relay::new();
    let a = r.connect();
    let b = r.connect();
    r.handle(a, update(Some("m"), topic("Planning"))).unwrap();
    r.handle(b, join("m")).unwrap();

    let out = r
        .handle(
            a,
            update(
                Some("m"),
                SnapshotFields {
                    topic: Some(String::new()),
                    color: Some(Color::rgb(1, 2, 3)),
                    ..SnapshotFields::default()
                },
            ),
        )
        .unwrap();
    let snap = r.snapshot("m").unwrap();
    assert_eq!(snap.fields.topic.as_deref(), Some("Planning"));
    assert_eq!(snap.fields.color, Some(Color::rgb(1, 2, 3)));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].to, b);
}

#[test]
fn empty_topic_on_a_fresh_room_stays_absent() {
    let mut r = Relay::new();
    let a = r.connect();
    r.handle(a, update(Some("m"), topic(""))).unwrap();
    assert!(r.snapshot("m").unwrap().fields.topic.is_none());
}
