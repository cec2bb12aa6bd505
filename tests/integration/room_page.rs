use medea_room_session::{
    layout::Layout,
    signalling::{JoinRoom, RoomEvent},
    RosterEvent,
};
use tokio::task::LocalSet;

use crate::utils::{settle, Page, Stream};

fn join_room(room_id: &str, user_name: &str) -> RoomEvent {
    RoomEvent::JoinRoom(JoinRoom {
        room_id: room_id.into(),
        peer_id: "u1".into(),
        user_name: user_name.into(),
    })
}

fn add_peer(page: &Page, peer_id: &str, user_name: &str, stream: &Stream) {
    page.room.apply(RosterEvent::PeerJoined {
        peer_id: peer_id.into(),
        user_name: user_name.into(),
    });
    page.room.apply(RosterEvent::PeerStreamChanged {
        peer_id: peer_id.into(),
        stream: Some(stream.handle()),
    });
}

fn tile_ids(layout: &Layout) -> Vec<String> {
    layout
        .tiles()
        .iter()
        .map(|t| t.peer_id.to_string())
        .collect()
}

#[tokio::test]
async fn joins_room_once_media_is_ready() {
    LocalSet::new()
        .run_until(async {
            let page = Page::new();
            page.controller.navigate(Some("abc123"));
            page.controller.watch_join();
            settle().await;
            assert!(page.signaling.emitted.borrow().is_empty());

            page.room.set_local_stream(Some(Stream::new("S1").handle()));
            settle().await;

            assert_eq!(
                *page.signaling.emitted.borrow(),
                vec![join_room("abc123", "Alice")],
            );
        })
        .await;
}

#[tokio::test]
async fn rejoins_with_new_user_name_only() {
    LocalSet::new()
        .run_until(async {
            let page = Page::new();
            page.controller.navigate(Some("abc123"));
            page.room.set_local_stream(Some(Stream::new("S1").handle()));
            page.controller.watch_join();
            settle().await;

            page.controller.navigate(Some("abc123"));
            settle().await;
            page.user.set_user_name("Alicia");
            settle().await;

            assert_eq!(
                *page.signaling.emitted.borrow(),
                vec![
                    join_room("abc123", "Alice"),
                    join_room("abc123", "Alicia"),
                ],
            );
        })
        .await;
}

#[test]
fn remote_sharer_occupies_primary_pane() {
    let page = Page::new();
    page.room.set_local_stream(Some(Stream::new("S1").handle()));
    add_peer(&page, "u2", "Bob", &Stream::new("S2"));
    add_peer(&page, "u3", "Carol", &Stream::new("S3"));

    page.room.apply(RosterEvent::SharingStarted {
        peer_id: "u2".into(),
    });

    let view = page.controller.view();
    match &view.plan.layout {
        Layout::Spotlight {
            primary,
            sidebar_columns,
            ..
        } => {
            assert_eq!(primary.id(), "S2");
            assert_eq!(*sidebar_columns, 1);
        }
        Layout::Grid { .. } => panic!("expected spotlight layout"),
    }
    assert_eq!(tile_ids(&view.plan.layout), vec!["u1", "u3"]);
}

#[tokio::test]
async fn local_sharer_is_not_duplicated() {
    let page = Page::new();
    page.room.set_local_stream(Some(Stream::new("S1").handle()));
    add_peer(&page, "u2", "Bob", &Stream::new("S2"));
    let screen = Stream::new("screen");
    page.screen.grant(&screen);

    page.controller.share_screen().await.unwrap();

    let view = page.controller.view();
    match &view.plan.layout {
        Layout::Spotlight { primary, tiles, .. } => {
            assert_eq!(primary.id(), "screen");
            assert!(tiles.iter().all(|t| !t.is_local));
        }
        Layout::Grid { .. } => panic!("expected spotlight layout"),
    }
    assert_eq!(tile_ids(&view.plan.layout), vec!["u2"]);

    page.controller.share_screen().await.unwrap();

    assert_eq!(screen.stops(), 1);
    assert!(matches!(
        page.controller.view().plan.layout,
        Layout::Grid { .. },
    ));
}

#[test]
fn unknown_sharer_falls_back_to_grid() {
    let page = Page::new();
    page.room.set_local_stream(Some(Stream::new("S1").handle()));
    add_peer(&page, "u2", "Bob", &Stream::new("S2"));

    page.room.apply(RosterEvent::SharingStarted {
        peer_id: "u9".into(),
    });

    let view = page.controller.view();
    assert!(matches!(view.plan.layout, Layout::Grid { columns: 4, .. }));
    assert_eq!(tile_ids(&view.plan.layout), vec!["u1", "u2"]);
}

#[test]
fn peers_without_media_are_hidden() {
    let page = Page::new();
    add_peer(&page, "u2", "Bob", &Stream::new("S2"));
    page.room.apply(RosterEvent::PeerJoined {
        peer_id: "u3".into(),
        user_name: "Carol".into(),
    });

    let view = page.controller.view();

    assert_eq!(tile_ids(&view.plan.layout), vec!["u1", "u2"]);
}

#[tokio::test]
async fn denied_share_keeps_layout() {
    let page = Page::new();
    add_peer(&page, "u2", "Bob", &Stream::new("S2"));
    let before = page.controller.view();

    assert!(page.controller.share_screen().await.is_err());

    assert_eq!(page.controller.view(), before);
    assert_eq!(page.room.share().active_sharer(), None);
}

#[test]
fn chat_panel_does_not_affect_columns() {
    let page = Page::new();
    let closed = page.controller.view();

    page.controller.toggle_chat();
    let open = page.controller.view();

    assert!(!closed.chat_open);
    assert!(open.chat_open);
    assert_eq!(open.plan.layout, closed.plan.layout);
}
