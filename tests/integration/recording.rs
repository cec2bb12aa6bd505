use std::time::Duration;

use medea_room_session::RecordingState;
use tokio::task::LocalSet;

use crate::utils::{settle, Page, Stream};

#[tokio::test]
async fn records_screen_into_download() {
    tokio::time::pause();
    LocalSet::new()
        .run_until(async {
            let page = Page::new();
            let display = Stream::new("display");
            page.display.grant(&display);

            page.controller.start_recording().await.unwrap();
            assert_eq!(
                page.controller.view().recording,
                RecordingState::Capturing,
            );

            page.recorder.produce(b"\x1a\x45");
            page.recorder.produce(b"");
            page.recorder.produce(b"\xdf\xa3");
            settle().await;

            page.controller.stop_recording().await.unwrap();

            assert_eq!(
                page.controller.view().recording,
                RecordingState::Idle,
            );
            assert_eq!(display.stops(), 1);
            {
                let files = page.downloads.files.borrow();
                assert_eq!(files.len(), 1);
                let (artifact, file_name) = &files[0];
                assert_eq!(artifact.data().as_ref(), b"\x1a\x45\xdf\xa3");
                assert_eq!(artifact.mime_type(), "video/webm");
                assert!(file_name.starts_with("screen-recording-"));
                assert!(file_name.ends_with(".webm"));
            }

            assert!(!page.downloads.released.get());
            tokio::time::sleep(Duration::from_millis(150)).await;
            assert!(page.downloads.released.get());
        })
        .await;
}

#[tokio::test]
async fn denied_recording_alerts_user() {
    LocalSet::new()
        .run_until(async {
            let page = Page::new();

            assert!(page.controller.start_recording().await.is_err());

            assert_eq!(
                page.controller.view().recording,
                RecordingState::Idle,
            );
            assert!(page.controller.recording().buffered_chunks().is_empty());
            assert_eq!(
                *page.alerts.shown.borrow(),
                vec!["Could not start screen recording. Please try again."],
            );
        })
        .await;
}

#[tokio::test]
async fn recording_runs_alongside_screen_share() {
    LocalSet::new()
        .run_until(async {
            let page = Page::new();
            let screen = Stream::new("screen");
            let display = Stream::new("display");
            page.screen.grant(&screen);
            page.display.grant(&display);

            page.controller.share_screen().await.unwrap();
            page.controller.start_recording().await.unwrap();
            page.controller.stop_recording().await.unwrap();

            assert!(page.room.is_local_sharer());
            assert_eq!(screen.stops(), 0);
            assert_eq!(display.stops(), 1);
        })
        .await;
}

#[tokio::test]
async fn stop_without_recording_is_noop() {
    LocalSet::new()
        .run_until(async {
            let page = Page::new();

            page.controller.stop_recording().await.unwrap();

            assert!(page.downloads.files.borrow().is_empty());
            assert_eq!(
                page.controller.view().recording,
                RecordingState::Idle,
            );
        })
        .await;
}
