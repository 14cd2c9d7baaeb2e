//! Property-based tests for playback domain math.
//! Verifies invariants hold for ALL raw bytes, not just fixed examples.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use platform::audio_types::{PlaylistId, TrackNumber, VolumeLevel};

proptest::proptest! {
    /// VolumeLevel::new never leaves 0..=10 for any stored byte.
    #[test]
    fn volume_level_new_always_in_range(raw in 0u8..=255u8) {
        assert!(VolumeLevel::new(raw).get() <= 10);
    }

    /// Stepping never escapes the range, whatever the starting level.
    #[test]
    fn volume_steps_stay_in_range(raw in 0u8..=10u8, ups in 0usize..20, downs in 0usize..20) {
        let mut v = VolumeLevel::new(raw);
        for _ in 0..ups { v = v.step_up(); }
        for _ in 0..downs { v = v.step_down(); }
        assert!(v.get() <= 10);
    }

    /// next_in always lands in 1..=count.
    #[test]
    fn next_track_stays_in_folder(track in 0u8..=255u8, count in 1u8..=255u8) {
        let next = TrackNumber::new(track).next_in(count);
        assert!(next.get() >= 1 && next.get() <= count);
    }

    /// previous_in always lands in 1..=count for a track inside the folder.
    #[test]
    fn previous_track_stays_in_folder(count in 1u8..=255u8, offset in 0u8..=254u8) {
        let track = TrackNumber::new(offset % count + 1);
        let prev = track.previous_in(count);
        assert!(prev.get() >= 1 && prev.get() <= count);
    }

    /// Stepping forward `count` times returns to the start.
    #[test]
    fn next_track_cycles_through_whole_folder(count in 1u8..=40u8, start in 1u8..=40u8) {
        let start = TrackNumber::new(start).clamp_to(count);
        let mut t = start;
        for _ in 0..count { t = t.next_in(count); }
        assert_eq!(t, start);
    }

    /// PlaylistId::try_new accepts exactly 1..=6.
    #[test]
    fn playlist_id_range(raw in 0u8..=255u8) {
        assert_eq!(PlaylistId::try_new(raw).is_ok(), (1..=6).contains(&raw));
    }
}
