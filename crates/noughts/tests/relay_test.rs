//! Tests for frame dispatch and the HTTP routes.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use noughts::{ParticipantId, RoomManager, ServerEvent, dispatch, router};
use noughts_engine::Mark;
use tokio::sync::mpsc;
use tower::ServiceExt;

fn connect() -> (ParticipantId, mpsc::UnboundedSender<ServerEvent>, mpsc::UnboundedReceiver<ServerEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ParticipantId::next(), tx, rx)
}

fn drain(inbox: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = inbox.try_recv() {
        events.push(event);
    }
    events
}

#[test]
fn test_full_game_over_frames() {
    let rooms = RoomManager::new();
    let (x, x_tx, mut x_rx) = connect();
    let (o, o_tx, mut o_rx) = connect();

    dispatch(&rooms, x, &x_tx, r#"{"event":"joinLobby","data":{"lobbyId":"den"}}"#);
    dispatch(&rooms, o, &o_tx, r#"{"event":"joinLobby","data":{"lobbyId":"den"}}"#);
    for (id, tx, index) in [(x, &x_tx, 0), (o, &o_tx, 4), (x, &x_tx, 1), (o, &o_tx, 5), (x, &x_tx, 2)] {
        dispatch(&rooms, id, tx, &format!(r#"{{"event":"makeMove","data":{{"index":{index}}}}}"#));
    }

    let last = drain(&mut o_rx)
        .into_iter()
        .rev()
        .find_map(|e| match e {
            ServerEvent::RoomState(s) => Some(s),
            _ => None,
        })
        .unwrap();
    assert!(!last.active);
    assert_eq!(*last.stats.x_wins(), 1);
    assert_eq!(last.your_mark, Some(Mark::O));
    assert!(!drain(&mut x_rx).is_empty());
}

#[test]
fn test_missing_lobby_id_reports_error() {
    let rooms = RoomManager::new();
    let (id, tx, mut rx) = connect();
    dispatch(&rooms, id, &tx, r#"{"event":"joinLobby","data":{}}"#);
    assert_eq!(drain(&mut rx), vec![ServerEvent::ErrorMsg("Lobby ID is required".into())]);
    assert_eq!(rooms.lobby_count(), 0);
}

#[test]
fn test_join_with_lowercase_mark_is_seated() {
    let rooms = RoomManager::new();
    let (id, tx, mut rx) = connect();
    dispatch(&rooms, id, &tx, r#"{"event":"joinLobby","data":{"lobbyId":"den","mark":"o"}}"#);

    let events = drain(&mut rx);
    assert!(events.iter().any(|e| matches!(e, ServerEvent::RoomState(s) if s.your_mark == Some(Mark::O))));
    assert_eq!(rooms.lobby_count(), 1);
    assert_eq!(rooms.mark_of(id), Some(Mark::O));
}

#[test]
fn test_join_with_unusable_lobby_id_reports_error() {
    for frame in [
        r#"{"event":"joinLobby","data":{"lobbyId":42}}"#,
        r#"{"event":"joinLobby","data":"den"}"#,
    ] {
        let rooms = RoomManager::new();
        let (id, tx, mut rx) = connect();
        dispatch(&rooms, id, &tx, frame);
        assert_eq!(
            drain(&mut rx),
            vec![ServerEvent::ErrorMsg("Lobby ID is required".into())],
            "{frame}"
        );
        assert_eq!(rooms.lobby_count(), 0);
    }
}

#[test]
fn test_bad_frames_are_dropped_silently() {
    let rooms = RoomManager::new();
    let (id, tx, mut rx) = connect();
    dispatch(&rooms, id, &tx, r#"{"event":"joinLobby","data":{"lobbyId":"den"}}"#);
    drain(&mut rx);

    for frame in [
        r#"{"event":"makeMove","data":{"index":"four"}}"#,
        r#"{"event":"makeMove","data":{"index":42}}"#,
        r#"{"event":"dance"}"#,
        "garbage",
    ] {
        dispatch(&rooms, id, &tx, frame);
    }
    assert!(drain(&mut rx).is_empty());
    assert_eq!(rooms.snapshot("den", None).unwrap().board.occupied_count(), 0);
}

#[test]
fn test_moves_before_joining_are_dropped() {
    let rooms = RoomManager::new();
    let (id, tx, mut rx) = connect();
    dispatch(&rooms, id, &tx, r#"{"event":"makeMove","data":{"index":4}}"#);
    dispatch(&rooms, id, &tx, r#"{"event":"newGame","data":{}}"#);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_health_route() {
    let response = router(RoomManager::new())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn test_lobbies_route() {
    let rooms = RoomManager::new();
    let (id, tx, _rx) = connect();
    rooms.join_lobby("den", id, tx, None);

    let response = router(rooms)
        .oneshot(Request::builder().uri("/lobbies").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json[0]["lobbyId"], "den");
    assert_eq!(json[0]["participants"], 1);
    assert_eq!(json[0]["openSeat"], true);
}
