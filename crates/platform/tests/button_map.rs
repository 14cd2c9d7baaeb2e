//! Button map validation tests.

#![allow(clippy::unwrap_used)]

use platform::{Button, ButtonMap, ButtonRole, ChannelId, ConfigError, PlaylistId};

fn button(channel: u8, role: ButtonRole) -> Button {
    Button {
        channel: ChannelId::new(channel),
        role,
    }
}

fn playlist(n: u8) -> ButtonRole {
    ButtonRole::SelectPlaylist(PlaylistId::try_new(n).unwrap())
}

#[test]
fn default_layout_matches_reference_wiring() {
    let map = ButtonMap::default_layout();
    assert_eq!(map.len(), 9);
    assert_eq!(map.role_of(ChannelId::new(2)), Some(ButtonRole::VolumeDown));
    assert_eq!(map.role_of(ChannelId::new(3)), Some(ButtonRole::VolumeUp));
    assert_eq!(map.role_of(ChannelId::new(4)), Some(ButtonRole::PreviousTrack));
    assert_eq!(map.role_of(ChannelId::new(5)), Some(playlist(1)));
    assert_eq!(map.role_of(ChannelId::new(12)), Some(playlist(6)));
    assert_eq!(map.role_of(ChannelId::new(10)), None);
}

#[test]
fn default_layout_passes_validation() {
    let map = ButtonMap::default_layout();
    let buttons: Vec<Button> = map.iter().copied().collect();
    assert_eq!(ButtonMap::new(&buttons), Ok(map));
}

#[test]
fn scan_order_is_preserved() {
    let map = ButtonMap::new(&[
        button(9, ButtonRole::PreviousTrack),
        button(1, ButtonRole::VolumeUp),
    ])
    .unwrap();
    let channels: Vec<u8> = map.iter().map(|b| b.channel.get()).collect();
    assert_eq!(channels, vec![9, 1]);
}

#[test]
fn shared_channel_is_rejected() {
    let result = ButtonMap::new(&[
        button(3, ButtonRole::VolumeUp),
        button(3, ButtonRole::VolumeDown),
    ]);
    assert_eq!(result, Err(ConfigError::DuplicateChannel(ChannelId::new(3))));
}

#[test]
fn role_on_two_channels_is_rejected() {
    let result = ButtonMap::new(&[button(5, playlist(2)), button(6, playlist(2))]);
    assert_eq!(result, Err(ConfigError::DuplicateRole(playlist(2))));
}

#[test]
fn empty_map_is_rejected() {
    assert_eq!(ButtonMap::new(&[]), Err(ConfigError::Empty));
}

#[test]
fn nine_distinct_roles_fill_the_map() {
    let mut buttons: Vec<Button> = (1..=6).map(|n| button(n, playlist(n))).collect();
    buttons.push(button(20, ButtonRole::VolumeUp));
    buttons.push(button(21, ButtonRole::VolumeDown));
    buttons.push(button(22, ButtonRole::PreviousTrack));
    assert_eq!(ButtonMap::new(&buttons).map(|m| m.len()), Ok(9));

    // A tenth button cannot be distinct from the nine roles above, so overflow
    // is only reachable through duplicates; the error reports the duplicate.
    buttons.push(button(23, ButtonRole::VolumeUp));
    assert_eq!(
        ButtonMap::new(&buttons),
        Err(ConfigError::DuplicateRole(ButtonRole::VolumeUp))
    );
}

#[test]
fn channel_lookup_by_role() {
    let map = ButtonMap::default_layout();
    assert_eq!(map.channel_of(playlist(3)), Some(ChannelId::new(7)));
}
