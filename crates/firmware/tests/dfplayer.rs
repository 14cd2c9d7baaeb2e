//! Integration test: DFPlayer driver over a mock serial port.
//!
//! Tests that:
//!   1. Commands go out as well-formed 10-byte frames
//!   2. Queries return the matching reply and time out on silence
//!   3. Notifications arriving mid-query are kept for the next drain
//!   4. Error replies fail the query
//!   5. Repeated "finished" reports are coalesced
//!   6. A full inbox drops and counts
//!
//! Run with: cargo test -p firmware --test dfplayer

// Integration test file -- intentional test patterns permitted.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use firmware::dfplayer::{Frame, FrameDecoder};
use firmware::{DfPlayer, DfPlayerError};
use platform::config::{DFPLAYER_REPLY_TIMEOUT_MS, NOTIFICATION_DEPTH};
use platform::mocks::{MockClock, MockSerial};
use platform::{
    DeviceErrorCode, DeviceNotification, PlaySources, PlaybackDevice, PlaylistId, TrackNumber,
    VolumeLevel,
};

// -- Helpers ----------------------------------------------------------------

/// Raw frame as the module would send it.
fn incoming(code: u8, param: u16) -> [u8; 10] {
    Frame {
        code,
        feedback: false,
        param,
    }
    .encode()
}

fn player() -> (DfPlayer<MockSerial, MockClock>, MockSerial, MockClock) {
    let serial = MockSerial::new();
    let clock = MockClock::new();
    // Every clock read moves time, so a silent port eventually times out.
    clock.auto_advance(1);
    (DfPlayer::new(serial.clone(), clock.clone()), serial, clock)
}

/// Decode everything the driver wrote.
fn sent(serial: &MockSerial) -> Vec<(u8, u16)> {
    let mut decoder = FrameDecoder::new();
    serial
        .take_written()
        .into_iter()
        .filter_map(|b| decoder.push(b))
        .map(|r| {
            let f = r.unwrap();
            (f.code, f.param)
        })
        .collect()
}

// -- Commands ---------------------------------------------------------------

#[test]
fn play_track_sends_folder_and_track() {
    let (mut dev, serial, _) = player();
    dev.play_track(PlaylistId::try_new(3).unwrap(), TrackNumber::new(17))
        .unwrap();
    assert_eq!(sent(&serial), vec![(0x0F, 0x0311)]);
}

#[test]
fn volume_and_reset_frames() {
    let (mut dev, serial, _) = player();
    dev.reset().unwrap();
    dev.set_volume(VolumeLevel::new(7)).unwrap();
    assert_eq!(sent(&serial), vec![(0x0C, 0), (0x06, 7)]);
}

#[test]
fn reset_frame_bytes_on_the_wire() {
    let (mut dev, serial, _) = player();
    dev.reset().unwrap();
    assert_eq!(
        serial.take_written(),
        vec![0x7E, 0xFF, 0x06, 0x0C, 0x00, 0x00, 0x00, 0xFE, 0xEF, 0xEF]
    );
}

// -- Queries ----------------------------------------------------------------

#[test]
fn folder_count_query_returns_reply() {
    let (mut dev, serial, _) = player();
    serial.feed(&incoming(0x4E, 23));
    let count = dev.track_count(PlaylistId::try_new(2).unwrap()).unwrap();
    assert_eq!(count, 23);
    assert_eq!(sent(&serial), vec![(0x4E, 2)]);
}

#[test]
fn total_count_and_volume_queries() {
    let (mut dev, serial, _) = player();
    serial.feed(&incoming(0x48, 310));
    assert_eq!(dev.total_track_count().unwrap(), 310);
    serial.feed(&incoming(0x43, 9));
    assert_eq!(dev.volume().unwrap(), 9);
}

#[test]
fn query_skips_acks_and_foreign_replies() {
    let (mut dev, serial, _) = player();
    serial.feed(&incoming(0x41, 0));
    serial.feed(&incoming(0x43, 5));
    serial.feed(&incoming(0x4E, 8));
    assert_eq!(dev.track_count(PlaylistId::FIRST).unwrap(), 8);
}

#[test]
fn query_times_out_on_silence() {
    let (mut dev, _, clock) = player();
    let before = clock.now();
    let err = dev.track_count(PlaylistId::FIRST).unwrap_err();
    assert!(matches!(err, DfPlayerError::Timeout { command: 0x4E }));
    assert!(clock.now() - before >= DFPLAYER_REPLY_TIMEOUT_MS);
}

#[test]
fn custom_timeout_is_honoured() {
    let serial = MockSerial::new();
    let clock = MockClock::new();
    clock.auto_advance(1);
    let mut dev = DfPlayer::new(serial, clock.clone()).with_timeout_ms(10);
    assert!(dev.total_track_count().is_err());
    assert!(clock.now() < 50);
}

#[test]
fn error_reply_fails_query() {
    let (mut dev, serial, _) = player();
    serial.feed(&incoming(0x40, 6));
    let err = dev.track_count(PlaylistId::FIRST).unwrap_err();
    assert!(matches!(err, DfPlayerError::Device(DeviceErrorCode::FileMismatch)));
}

#[test]
fn notification_during_query_is_kept() {
    let (mut dev, serial, _) = player();
    serial.feed(&incoming(0x3D, 4));
    serial.feed(&incoming(0x4E, 12));
    assert_eq!(dev.track_count(PlaylistId::FIRST).unwrap(), 12);
    assert_eq!(
        dev.poll_notification(),
        Some(DeviceNotification::PlaybackFinished {
            source: PlaySources::SD,
            track: 4,
        })
    );
    assert_eq!(dev.poll_notification(), None);
}

#[test]
fn garbage_before_reply_is_skipped() {
    let (mut dev, serial, _) = player();
    let mut corrupt = incoming(0x4E, 99);
    corrupt[7] ^= 0xFF;
    serial.feed(&[0x00, 0x55]);
    serial.feed(&corrupt);
    serial.feed(&incoming(0x4E, 3));
    assert_eq!(dev.track_count(PlaylistId::FIRST).unwrap(), 3);
}

// -- Notifications ----------------------------------------------------------

#[test]
fn media_notifications_decode() {
    let (mut dev, serial, _) = player();
    serial.feed(&incoming(0x3F, 0x02));
    serial.feed(&incoming(0x3A, 0x01));
    serial.feed(&incoming(0x3B, 0x01));
    serial.feed(&incoming(0x40, 3));
    let got: Vec<_> = std::iter::from_fn(|| dev.poll_notification()).collect();
    assert_eq!(
        got,
        vec![
            DeviceNotification::MediaOnline(PlaySources::SD),
            DeviceNotification::MediaInserted(PlaySources::USB),
            DeviceNotification::MediaRemoved(PlaySources::USB),
            DeviceNotification::CommunicationError(DeviceErrorCode::SerialWrongStack),
        ]
    );
}

#[test]
fn repeated_finish_is_coalesced() {
    let (mut dev, serial, clock) = player();
    clock.auto_advance(0);
    serial.feed(&incoming(0x3D, 7));
    assert!(matches!(
        dev.poll_notification(),
        Some(DeviceNotification::PlaybackFinished { track: 7, .. })
    ));
    // The repeat arrives in a later drain.
    clock.advance(30);
    serial.feed(&incoming(0x3D, 7));
    assert_eq!(dev.poll_notification(), None);
}

#[test]
fn same_track_finishing_again_later_is_reported() {
    let (mut dev, serial, clock) = player();
    clock.auto_advance(0);
    serial.feed(&incoming(0x3D, 1));
    assert!(dev.poll_notification().is_some());
    clock.advance(60_000);
    serial.feed(&incoming(0x3D, 1));
    assert!(dev.poll_notification().is_some());
}

#[test]
fn full_inbox_drops_newest_and_counts() {
    let (mut dev, serial, _) = player();
    for _ in 0..NOTIFICATION_DEPTH + 2 {
        serial.feed(&incoming(0x3F, 0x02));
    }
    // Parked while waiting for the reply, which comes last.
    serial.feed(&incoming(0x48, 1));
    dev.total_track_count().unwrap();
    assert_eq!(dev.dropped_notifications(), 2);
    let drained = std::iter::from_fn(|| dev.poll_notification()).count();
    assert_eq!(drained, NOTIFICATION_DEPTH);
}
