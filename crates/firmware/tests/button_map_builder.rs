//! Integration test: button wiring builder validation.
//!
//! Run with: cargo test -p firmware --test button_map_builder

#![allow(clippy::unwrap_used)]

use firmware::ButtonMapBuilder;
use platform::config::DEBOUNCE_MS;
use platform::{ButtonRole, ChannelId, ConfigError, PlaylistId};

fn pl(n: u8) -> PlaylistId {
    PlaylistId::try_new(n).unwrap()
}

#[test]
fn reference_layout_matches_board_wiring() {
    let input = ButtonMapBuilder::reference_layout().build().unwrap();
    assert_eq!(input.map.len(), 9);
    assert_eq!(input.map.role_of(ChannelId::new(2)), Some(ButtonRole::VolumeDown));
    assert_eq!(input.map.role_of(ChannelId::new(3)), Some(ButtonRole::VolumeUp));
    assert_eq!(input.map.role_of(ChannelId::new(4)), Some(ButtonRole::PreviousTrack));
    assert_eq!(
        input.map.role_of(ChannelId::new(12)),
        Some(ButtonRole::SelectPlaylist(pl(6)))
    );
    assert_eq!(input.map.role_of(ChannelId::new(10)), None);
    assert_eq!(input.debouncer.window_ms(), DEBOUNCE_MS);
}

#[test]
fn custom_wiring_keeps_scan_order_and_window() {
    let input = ButtonMapBuilder::new()
        .playlist(pl(2), 7)
        .volume_up(1)
        .debounce_ms(30)
        .build()
        .unwrap();
    let channels: Vec<u8> = input.map.iter().map(|b| b.channel.get()).collect();
    assert_eq!(channels, vec![7, 1]);
    assert_eq!(input.debouncer.window_ms(), 30);
}

#[test]
fn empty_wiring_is_rejected() {
    assert_eq!(ButtonMapBuilder::new().build().unwrap_err(), ConfigError::Empty);
}

#[test]
fn shared_channel_is_rejected() {
    let err = ButtonMapBuilder::new()
        .volume_up(3)
        .volume_down(3)
        .build()
        .unwrap_err();
    assert_eq!(err, ConfigError::DuplicateChannel(ChannelId::new(3)));
}

#[test]
fn role_on_two_channels_is_rejected() {
    let err = ButtonMapBuilder::new()
        .previous(4)
        .previous(5)
        .build()
        .unwrap_err();
    assert_eq!(err, ConfigError::DuplicateRole(ButtonRole::PreviousTrack));
}

#[test]
fn tenth_button_is_rejected() {
    let err = ButtonMapBuilder::reference_layout()
        .button(20, ButtonRole::VolumeUp)
        .build()
        .unwrap_err();
    assert_eq!(err, ConfigError::TooManyButtons { count: 10, max: 9 });
}
