//! Playback core: button debouncing and the playlist/track/volume state machine
#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]

#[macro_use]
mod fmt;

pub mod debounce;
pub mod session;

pub use debounce::{ButtonReleased, Debouncer};
pub use session::{Outcome, PlaybackSession, PlaybackState, SkipReason};

// Component tests; cross-crate flows live in firmware/tests.
#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
mod tests {
    /// Debouncer tests
    mod debounce_tests {
        use crate::debounce::{ButtonReleased, Debouncer};
        use platform::ChannelId;

        const A: Option<ChannelId> = Some(ChannelId::new(5));
        const B: Option<ChannelId> = Some(ChannelId::new(6));

        /// Feed `sample` every millisecond over `[from, to)`, collecting events.
        fn hold(
            d: &mut Debouncer,
            sample: Option<ChannelId>,
            from: u64,
            to: u64,
        ) -> Vec<ButtonReleased> {
            (from..to).filter_map(|t| d.poll(sample, t)).collect()
        }

        #[test]
        fn test_no_event_while_idle() {
            let mut d = Debouncer::default();
            assert!(hold(&mut d, None, 0, 500).is_empty());
        }

        #[test]
        fn test_event_fires_on_release_not_press() {
            let mut d = Debouncer::default();
            assert!(hold(&mut d, A, 0, 200).is_empty(), "press alone must not emit");
            assert_eq!(d.stable(), A);
            let events = hold(&mut d, None, 200, 400);
            assert_eq!(events, vec![ButtonReleased(ChannelId::new(5))]);
            assert_eq!(d.stable(), None);
        }

        #[test]
        fn test_long_hold_emits_once() {
            let mut d = Debouncer::default();
            hold(&mut d, A, 0, 10_000);
            assert_eq!(hold(&mut d, None, 10_000, 10_500).len(), 1);
        }

        #[test]
        fn test_release_waits_for_full_window() {
            let mut d = Debouncer::default();
            hold(&mut d, A, 0, 100);
            // Released at t=100: the event is due once "nothing" has held 50 ms.
            assert_eq!(d.poll(None, 100), None);
            assert_eq!(d.poll(None, 149), None);
            assert_eq!(d.poll(None, 150), Some(ButtonReleased(ChannelId::new(5))));
            assert_eq!(d.poll(None, 151), None);
        }

        #[test]
        fn test_short_glitch_is_ignored() {
            let mut d = Debouncer::default();
            hold(&mut d, None, 0, 100);
            // 30 ms of contact noise never becomes a stable press.
            assert!(hold(&mut d, A, 100, 130).is_empty());
            assert!(hold(&mut d, None, 130, 400).is_empty());
        }

        #[test]
        fn test_bouncing_release_emits_once() {
            let mut d = Debouncer::default();
            hold(&mut d, A, 0, 100);
            let mut events = Vec::new();
            // Contact bounce on release: alternate every 3 ms for 30 ms.
            for t in 100..130 {
                let sample = if (t / 3) % 2 == 0 { None } else { A };
                events.extend(d.poll(sample, t));
            }
            events.extend(hold(&mut d, None, 130, 300));
            assert_eq!(events, vec![ButtonReleased(ChannelId::new(5))]);
        }

        #[test]
        fn test_two_presses_emit_two_events() {
            let mut d = Debouncer::default();
            hold(&mut d, A, 0, 100);
            let first = hold(&mut d, None, 100, 200);
            hold(&mut d, A, 200, 300);
            let second = hold(&mut d, None, 300, 400);
            assert_eq!(first.len() + second.len(), 2);
        }

        #[test]
        fn test_direct_switch_drops_first_button() {
            let mut d = Debouncer::default();
            hold(&mut d, A, 0, 100);
            assert!(hold(&mut d, B, 100, 200).is_empty());
            assert_eq!(d.stable(), B);
            let events = hold(&mut d, None, 200, 300);
            assert_eq!(events, vec![ButtonReleased(ChannelId::new(6))]);
        }

        #[test]
        fn test_sparse_polling_still_works() {
            // Polls 60 ms apart: every change is stable by the next poll but one.
            let mut d = Debouncer::default();
            assert_eq!(d.poll(A, 0), None);
            assert_eq!(d.poll(A, 60), None);
            assert_eq!(d.poll(None, 120), None);
            assert_eq!(d.poll(None, 180), Some(ButtonReleased(ChannelId::new(5))));
        }
    }

    /// Playback state machine tests
    mod session_tests {
        use crate::session::{Outcome, PlaybackSession, SkipReason};
        use platform::mocks::{DeviceCommand, MockDevice, MockStore};
        use platform::{ButtonRole, PlaylistId, TrackNumber, VolumeLevel, VOLUME_ADDR};

        fn pl(n: u8) -> PlaylistId {
            PlaylistId::try_new(n).unwrap()
        }

        fn tr(n: u8) -> TrackNumber {
            TrackNumber::new(n)
        }

        /// Session on playlist 1, track 1, volume 3, over a store with
        /// `stored` preset as `(playlist, track)` slots.
        fn setup(folders: &[u16], stored: &[(u8, u8)]) -> (PlaybackSession, MockDevice, MockStore) {
            let device = MockDevice::with_folders(folders);
            let store = MockStore::new();
            for (playlist, track) in stored {
                store.preset(10 + u16::from(*playlist), *track);
            }
            (PlaybackSession::new(tr(1), VolumeLevel::new(3)), device, store)
        }

        #[test]
        fn test_restore_uses_default_volume_on_erased_store() {
            let mut store = MockStore::new();
            let session = PlaybackSession::restore(&mut store);
            assert_eq!(session.state().volume.get(), 3);
            assert_eq!(session.state().playlist, pl(1));
            // Erased slot reads 0xFF; clamped later against the folder size.
            assert_eq!(session.state().track.get(), 0xFF);
        }

        #[test]
        fn test_restore_keeps_valid_volume_and_track() {
            let mut store = MockStore::new();
            store.preset(VOLUME_ADDR, 7);
            store.preset(11, 4);
            let session = PlaybackSession::restore(&mut store);
            assert_eq!(session.state().volume.get(), 7);
            assert_eq!(session.state().track, tr(4));
        }

        #[test]
        fn test_restore_survives_unreadable_store() {
            let mut store = MockStore::new();
            store.fail_reads(true);
            let session = PlaybackSession::restore(&mut store);
            assert_eq!(session.state().volume.get(), 3);
            assert_eq!(session.state().track, TrackNumber::FIRST);
        }

        #[test]
        fn test_switch_playlist_resumes_stored_track() {
            let (mut s, mut dev, mut store) = setup(&[5, 4], &[(2, 3)]);
            let out = s.select_playlist(pl(2), &mut dev, &mut store);
            assert_eq!(out, Outcome::Playing { playlist: pl(2), track: tr(3) });
            assert_eq!(dev.last_played(), Some((2, 3)));
            assert_eq!(store.writes(), vec![(12, 3)]);
        }

        #[test]
        fn test_switch_playlist_clamps_stored_track() {
            let (mut s, mut dev, mut store) = setup(&[5, 6], &[(2, 9)]);
            s.select_playlist(pl(2), &mut dev, &mut store);
            assert_eq!(s.state().track, tr(6));
            assert_eq!(store.writes(), vec![(12, 6)]);
        }

        #[test]
        fn test_switch_to_erased_slot_plays_last_track() {
            // 0xFF from a fresh store clamps to the folder size.
            let (mut s, mut dev, mut store) = setup(&[5, 4], &[]);
            s.select_playlist(pl(2), &mut dev, &mut store);
            assert_eq!(s.state().track, tr(4));
        }

        #[test]
        fn test_same_playlist_wraps_to_first_track() {
            let (mut s, mut dev, mut store) = setup(&[5, 4], &[(2, 4)]);
            s.select_playlist(pl(2), &mut dev, &mut store);
            store.clear_writes();
            let out = s.select_playlist(pl(2), &mut dev, &mut store);
            assert_eq!(out, Outcome::Playing { playlist: pl(2), track: tr(1) });
            assert_eq!(dev.last_played(), Some((2, 1)));
            assert_eq!(store.writes(), vec![(12, 1)]);
        }

        #[test]
        fn test_same_playlist_advances_one_step_per_call() {
            let (_, mut dev, mut store) = setup(&[5], &[]);
            let mut s = PlaybackSession::new(tr(5), VolumeLevel::new(3));
            s.select_playlist(pl(1), &mut dev, &mut store);
            assert_eq!(s.state().track, tr(1));
            s.select_playlist(pl(1), &mut dev, &mut store);
            assert_eq!(s.state().track, tr(2));
        }

        #[test]
        fn test_clamp_track_limits_to_folder_size() {
            let mut s = PlaybackSession::new(tr(0xFF), VolumeLevel::new(3));
            s.clamp_track(0);
            assert_eq!(s.state().track, tr(0xFF), "zero count leaves the track alone");
            s.clamp_track(12);
            assert_eq!(s.state().track, tr(12));
            s.clamp_track(300);
            assert_eq!(s.state().track, tr(12));
        }

        #[test]
        fn test_playback_finished_advances_like_reselect() {
            let (mut s, mut dev, mut store) = setup(&[5, 4], &[(2, 4)]);
            s.select_playlist(pl(2), &mut dev, &mut store);
            s.select_playlist(pl(2), &mut dev, &mut store);
            assert_eq!(s.state().track, tr(1));
            let out = s.on_playback_finished(&mut dev, &mut store);
            assert_eq!(out, Outcome::Playing { playlist: pl(2), track: tr(2) });
            assert_eq!(dev.last_played(), Some((2, 2)));
        }

        #[test]
        fn test_empty_playlist_is_noop() {
            let (mut s, mut dev, mut store) = setup(&[5, 0], &[(2, 3)]);
            let before = s.state();
            let out = s.select_playlist(pl(2), &mut dev, &mut store);
            assert_eq!(out, Outcome::Skipped(SkipReason::EmptyPlaylist(pl(2))));
            assert_eq!(s.state(), before);
            assert!(dev.commands().is_empty());
            assert!(store.writes().is_empty());
        }

        #[test]
        fn test_unknown_track_count_is_noop() {
            let (mut s, mut dev, mut store) = setup(&[5], &[]);
            let out = s.select_playlist(pl(4), &mut dev, &mut store);
            assert_eq!(out, Outcome::Skipped(SkipReason::TrackCountUnavailable(pl(4))));
            assert!(dev.commands().is_empty());
            assert!(store.writes().is_empty());
        }

        #[test]
        fn test_previous_first_press_goes_back() {
            let (_, mut dev, mut store) = setup(&[5], &[]);
            let mut s = PlaybackSession::new(tr(5), VolumeLevel::new(3));
            let out = s.previous_track(10_000, &mut dev, &mut store);
            assert_eq!(out, Outcome::Playing { playlist: pl(1), track: tr(4) });
            assert_eq!(store.writes(), vec![(11, 4)]);
        }

        #[test]
        fn test_previous_within_window_restarts() {
            let (_, mut dev, mut store) = setup(&[5], &[]);
            let mut s = PlaybackSession::new(tr(5), VolumeLevel::new(3));
            s.previous_track(10_000, &mut dev, &mut store);
            store.clear_writes();
            dev.clear_commands();

            let out = s.previous_track(14_999, &mut dev, &mut store);
            assert_eq!(out, Outcome::Restarted { playlist: pl(1), track: tr(4) });
            let out = s.previous_track(16_000, &mut dev, &mut store);
            assert_eq!(out, Outcome::Restarted { playlist: pl(1), track: tr(4) });
            assert_eq!(dev.commands(), vec![DeviceCommand::Play(1, 4), DeviceCommand::Play(1, 4)]);
            assert!(store.writes().is_empty(), "restart must not persist");
        }

        #[test]
        fn test_previous_after_window_goes_back_again() {
            let (_, mut dev, mut store) = setup(&[5], &[]);
            let mut s = PlaybackSession::new(tr(5), VolumeLevel::new(3));
            s.previous_track(10_000, &mut dev, &mut store);
            let out = s.previous_track(15_000, &mut dev, &mut store);
            assert_eq!(out, Outcome::Playing { playlist: pl(1), track: tr(3) });
        }

        #[test]
        fn test_previous_wraps_from_first_to_last_track() {
            let (mut s, mut dev, mut store) = setup(&[7], &[]);
            let out = s.previous_track(0, &mut dev, &mut store);
            assert_eq!(out, Outcome::Playing { playlist: pl(1), track: tr(7) });
            assert_eq!(store.writes(), vec![(11, 7)]);
        }

        #[test]
        fn test_previous_wrap_with_unknown_count_is_noop() {
            let (mut s, mut dev, mut store) = setup(&[], &[]);
            let out = s.previous_track(0, &mut dev, &mut store);
            assert_eq!(out, Outcome::Skipped(SkipReason::TrackCountUnavailable(pl(1))));
            assert!(dev.commands().is_empty());
            assert!(store.writes().is_empty());
        }

        #[test]
        fn test_previous_on_empty_playlist_is_noop() {
            // Restored from an erased slot and never clamped: folder is empty.
            let (_, mut dev, mut store) = setup(&[0, 4], &[]);
            let mut s = PlaybackSession::new(tr(0xFF), VolumeLevel::new(3));
            let out = s.handle_button(ButtonRole::PreviousTrack, 10_000, &mut dev, &mut store);
            assert_eq!(out, Outcome::Skipped(SkipReason::EmptyPlaylist(pl(1))));
            assert_eq!(s.state().track, tr(0xFF));
            assert!(dev.commands().is_empty());
            assert!(store.writes().is_empty());
        }

        #[test]
        fn test_previous_with_unknown_count_is_noop_above_first_track() {
            let (_, mut dev, mut store) = setup(&[], &[]);
            let mut s = PlaybackSession::new(tr(40), VolumeLevel::new(3));
            let out = s.previous_track(0, &mut dev, &mut store);
            assert_eq!(out, Outcome::Skipped(SkipReason::TrackCountUnavailable(pl(1))));
            assert!(dev.commands().is_empty());
            assert!(store.writes().is_empty());
        }

        #[test]
        fn test_previous_clamps_stale_track_before_stepping_back() {
            let (_, mut dev, mut store) = setup(&[4], &[]);
            let mut s = PlaybackSession::new(tr(0xFF), VolumeLevel::new(3));
            let out = s.previous_track(0, &mut dev, &mut store);
            assert_eq!(out, Outcome::Playing { playlist: pl(1), track: tr(3) });
            assert_eq!(store.writes(), vec![(11, 3)]);
        }

        #[test]
        fn test_skipped_previous_does_not_open_restart_window() {
            let (_, mut dev, mut store) = setup(&[], &[]);
            let mut s = PlaybackSession::new(tr(3), VolumeLevel::new(3));
            s.previous_track(0, &mut dev, &mut store);
            dev.set_folder(1, 5);
            let out = s.previous_track(100, &mut dev, &mut store);
            assert_eq!(out, Outcome::Playing { playlist: pl(1), track: tr(2) });
        }

        #[test]
        fn test_volume_up_saturates_and_still_persists() {
            let (_, mut dev, mut store) = setup(&[5], &[]);
            let mut s = PlaybackSession::new(tr(1), VolumeLevel::new(10));
            let out = s.volume_up(&mut dev, &mut store);
            assert_eq!(out, Outcome::Volume(VolumeLevel::new(10)));
            assert_eq!(store.writes(), vec![(VOLUME_ADDR, 10)]);
            assert_eq!(dev.commands(), vec![DeviceCommand::Volume(10)]);
        }

        #[test]
        fn test_volume_down_saturates_and_still_persists() {
            let (_, mut dev, mut store) = setup(&[5], &[]);
            let mut s = PlaybackSession::new(tr(1), VolumeLevel::new(0));
            s.volume_down(&mut dev, &mut store);
            assert_eq!(s.state().volume.get(), 0);
            assert_eq!(store.writes(), vec![(VOLUME_ADDR, 0)]);
        }

        #[test]
        fn test_volume_steps() {
            let (mut s, mut dev, mut store) = setup(&[5], &[]);
            s.volume_up(&mut dev, &mut store);
            s.volume_up(&mut dev, &mut store);
            s.volume_down(&mut dev, &mut store);
            assert_eq!(s.state().volume.get(), 4);
            assert_eq!(store.byte(VOLUME_ADDR), 4);
        }

        #[test]
        fn test_handle_button_dispatches_roles() {
            let (mut s, mut dev, mut store) = setup(&[5, 4], &[(2, 2)]);
            s.handle_button(ButtonRole::SelectPlaylist(pl(2)), 0, &mut dev, &mut store);
            assert_eq!(dev.last_played(), Some((2, 2)));
            s.handle_button(ButtonRole::VolumeUp, 0, &mut dev, &mut store);
            assert_eq!(s.state().volume.get(), 4);
            s.handle_button(ButtonRole::PreviousTrack, 0, &mut dev, &mut store);
            assert_eq!(dev.last_played(), Some((2, 1)));
        }

        #[test]
        fn test_switching_back_restores_each_playlist() {
            let (mut s, mut dev, mut store) = setup(&[5, 4], &[(1, 2), (2, 3)]);
            s.select_playlist(pl(2), &mut dev, &mut store);
            s.select_playlist(pl(2), &mut dev, &mut store);
            s.select_playlist(pl(1), &mut dev, &mut store);
            assert_eq!(s.state().track, tr(2));
            s.select_playlist(pl(2), &mut dev, &mut store);
            assert_eq!(s.state().track, tr(4));
        }
    }
}
