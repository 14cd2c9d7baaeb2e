//! Type system enforcement tests for playback domain newtypes.
//! These newtypes keep raw storage and decoder bytes out of the state machine.

#![allow(clippy::unwrap_used)]

// ── VolumeLevel ──────────────────────────────────────────────────────────────

#[test]
fn volume_level_new_clamps_over_10() {
    use platform::audio_types::VolumeLevel;
    let v = VolumeLevel::new(0xFF);
    assert_eq!(v.get(), 10, "VolumeLevel::new(255) should clamp to 10");
}

#[test]
fn volume_level_new_allows_bounds() {
    use platform::audio_types::VolumeLevel;
    assert_eq!(VolumeLevel::new(0).get(), 0);
    assert_eq!(VolumeLevel::new(10).get(), 10);
}

#[test]
fn volume_level_try_new_rejects_over_10() {
    use platform::audio_types::VolumeLevel;
    let err = VolumeLevel::try_new(11).unwrap_err();
    assert_eq!(err.value, 11);
    assert_eq!(err.max, 10);
    assert!(VolumeLevel::try_new(255).is_err());
}

#[test]
fn volume_level_try_new_accepts_valid_range() {
    use platform::audio_types::VolumeLevel;
    for raw in 0..=10u8 {
        assert_eq!(VolumeLevel::try_new(raw).map(VolumeLevel::get), Ok(raw));
    }
}

#[test]
fn volume_level_is_one_byte() {
    use platform::audio_types::VolumeLevel;
    assert_eq!(core::mem::size_of::<VolumeLevel>(), 1);
}

// ── PlaylistId ───────────────────────────────────────────────────────────────

#[test]
fn playlist_id_rejects_zero() {
    use platform::audio_types::PlaylistId;
    assert!(PlaylistId::try_new(0).is_err());
}

#[test]
fn playlist_id_rejects_above_playlist_count() {
    use platform::audio_types::PlaylistId;
    assert!(PlaylistId::try_new(7).is_err());
}

#[test]
fn playlist_id_all_covers_every_button() {
    use platform::audio_types::PlaylistId;
    let ids: Vec<u8> = PlaylistId::all().map(PlaylistId::get).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

// ── TrackNumber ──────────────────────────────────────────────────────────────

#[test]
fn track_number_is_never_zero() {
    use platform::audio_types::TrackNumber;
    assert_eq!(TrackNumber::new(0).get(), 1);
}

#[test]
fn track_number_clamps_persisted_value_to_folder_size() {
    use platform::audio_types::TrackNumber;
    // Persisted track 9 for a folder that now holds 6 tracks.
    assert_eq!(TrackNumber::new(9).clamp_to(6).get(), 6);
}

#[test]
fn track_number_next_wraps_modulo_count() {
    use platform::audio_types::TrackNumber;
    assert_eq!(TrackNumber::new(5).next_in(5).get(), 1);
    assert_eq!(TrackNumber::new(1).next_in(5).get(), 2);
}

#[test]
fn out_of_range_error_displays_bounds() {
    use platform::audio_types::PlaylistId;
    let err = PlaylistId::try_new(9).unwrap_err();
    assert_eq!(err.to_string(), "value 9 outside 1..=6");
}
