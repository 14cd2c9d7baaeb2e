//! Playback session state machine.
//!
//! `PlaybackSession` owns the current playlist, track and volume and turns
//! button roles and "track finished" notifications into decoder commands and
//! persistent-store writes. The device and the store are borrowed per call;
//! the session keeps no handle to either.
//!
//! Nothing here fails. A folder whose size cannot be read, or that is empty,
//! abandons the transition before any side effect. A failed command or write
//! is logged and the new state is kept, since the decoder reports its own
//! trouble through notifications.

use platform::config::{DEFAULT_VOLUME, PREVIOUS_WINDOW_MS};
use platform::{
    track_slot, ButtonRole, PersistentStore, PlaybackDevice, PlaylistId, TrackNumber,
    VolumeLevel, VOLUME_ADDR,
};

/// Snapshot of what is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaybackState {
    /// Playlist (decoder folder) in use
    pub playlist: PlaylistId,
    /// Track within `playlist`
    pub track: TrackNumber,
    /// Output volume
    pub volume: VolumeLevel,
}

/// Result of one transition, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// A track was started and persisted.
    Playing {
        /// Playlist started
        playlist: PlaylistId,
        /// Track started
        track: TrackNumber,
    },
    /// The current track was started again from its beginning.
    Restarted {
        /// Playlist in use
        playlist: PlaylistId,
        /// Track restarted
        track: TrackNumber,
    },
    /// Volume was applied and persisted.
    Volume(VolumeLevel),
    /// The transition was abandoned without side effects.
    Skipped(SkipReason),
}

/// Why a transition was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SkipReason {
    /// The folder holds no tracks.
    EmptyPlaylist(PlaylistId),
    /// The decoder did not report a track count.
    TrackCountUnavailable(PlaylistId),
}

/// Playlist/track/volume state machine.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    state: PlaybackState,
    last_previous_ms: Option<u64>,
}

impl PlaybackSession {
    /// Start a session on playlist 1 with `track` at `volume`.
    pub fn new(track: TrackNumber, volume: VolumeLevel) -> Self {
        Self {
            state: PlaybackState {
                playlist: PlaylistId::FIRST,
                track,
                volume,
            },
            last_previous_ms: None,
        }
    }

    /// Rebuild the power-on state from the store.
    ///
    /// An out-of-range or unreadable volume falls back to the default level.
    /// The track of playlist 1 is taken as stored (0 becomes track 1); it is
    /// clamped once the folder size is known, see [`Self::clamp_track`].
    pub fn restore<S: PersistentStore>(store: &mut S) -> Self {
        let volume = match store.read_byte(VOLUME_ADDR) {
            Ok(raw) => VolumeLevel::try_new(raw).unwrap_or_else(|_| {
                warn!("stored volume {} out of range, using default", raw);
                VolumeLevel::new(DEFAULT_VOLUME)
            }),
            Err(_) => {
                warn!("volume unreadable, using default");
                VolumeLevel::new(DEFAULT_VOLUME)
            }
        };
        let track = read_track(store, PlaylistId::FIRST);
        debug!(
            "restored playlist 1 track {} volume {}",
            track.get(),
            volume.get()
        );
        Self::new(track, volume)
    }

    /// Current state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Limit the current track to a freshly read folder size.
    ///
    /// A zero count leaves the track untouched.
    pub fn clamp_track(&mut self, count: u16) {
        if let Some(count) = usable_count(count) {
            self.state.track = self.state.track.clamp_to(count);
        }
    }

    /// Send the current volume to the decoder and persist it.
    pub fn apply_volume<D, S>(&mut self, device: &mut D, store: &mut S) -> Outcome
    where
        D: PlaybackDevice,
        S: PersistentStore,
    {
        let volume = self.state.volume;
        info!("set volume {}", volume.get());
        if store.write_byte(VOLUME_ADDR, volume.get()).is_err() {
            warn!("persisting volume {} failed", volume.get());
        }
        if device.set_volume(volume).is_err() {
            warn!("set volume command failed");
        }
        Outcome::Volume(volume)
    }

    /// Dispatch a debounced button to its transition.
    pub fn handle_button<D, S>(
        &mut self,
        role: ButtonRole,
        now_ms: u64,
        device: &mut D,
        store: &mut S,
    ) -> Outcome
    where
        D: PlaybackDevice,
        S: PersistentStore,
    {
        match role {
            ButtonRole::VolumeUp => self.volume_up(device, store),
            ButtonRole::VolumeDown => self.volume_down(device, store),
            ButtonRole::PreviousTrack => self.previous_track(now_ms, device, store),
            ButtonRole::SelectPlaylist(playlist) => self.select_playlist(playlist, device, store),
        }
    }

    /// Select `playlist`: skip ahead if it is already playing, otherwise
    /// resume it at its stored track.
    pub fn select_playlist<D, S>(
        &mut self,
        playlist: PlaylistId,
        device: &mut D,
        store: &mut S,
    ) -> Outcome
    where
        D: PlaybackDevice,
        S: PersistentStore,
    {
        let count = match folder_size(device, playlist) {
            Ok(count) => count,
            Err(reason) => return Outcome::Skipped(reason),
        };

        let track = if playlist == self.state.playlist {
            debug!("next track in playlist {}", playlist.get());
            self.state.track.next_in(count)
        } else {
            info!("switch to playlist {}", playlist.get());
            read_track(store, playlist).clamp_to(count)
        };

        self.state.playlist = playlist;
        self.state.track = track;
        self.play_and_persist(device, store)
    }

    /// Go back one track, or restart the current one when pressed again
    /// within the previous-track window.
    ///
    /// Stepping back always reads the folder size, so a track restored but
    /// never clamped lands inside the folder. An empty or silent folder makes
    /// the press a no-op that does not open the window.
    pub fn previous_track<D, S>(&mut self, now_ms: u64, device: &mut D, store: &mut S) -> Outcome
    where
        D: PlaybackDevice,
        S: PersistentStore,
    {
        let within_window = self
            .last_previous_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < PREVIOUS_WINDOW_MS);

        let PlaybackState {
            playlist, track, ..
        } = self.state;

        if within_window {
            self.last_previous_ms = Some(now_ms);
            info!("restart playlist {} track {}", playlist.get(), track.get());
            if device.play_track(playlist, track).is_err() {
                warn!("play command failed");
            }
            return Outcome::Restarted { playlist, track };
        }

        let previous = match folder_size(device, playlist) {
            Ok(count) => track.clamp_to(count).previous_in(count),
            Err(reason) => return Outcome::Skipped(reason),
        };

        self.last_previous_ms = Some(now_ms);
        self.state.track = previous;
        self.play_and_persist(device, store)
    }

    /// One volume step up, saturating at the maximum.
    pub fn volume_up<D, S>(&mut self, device: &mut D, store: &mut S) -> Outcome
    where
        D: PlaybackDevice,
        S: PersistentStore,
    {
        self.state.volume = self.state.volume.step_up();
        self.apply_volume(device, store)
    }

    /// One volume step down, saturating at zero.
    pub fn volume_down<D, S>(&mut self, device: &mut D, store: &mut S) -> Outcome
    where
        D: PlaybackDevice,
        S: PersistentStore,
    {
        self.state.volume = self.state.volume.step_down();
        self.apply_volume(device, store)
    }

    /// The decoder finished a track: continue with the next one of the same
    /// playlist, looping forever.
    pub fn on_playback_finished<D, S>(&mut self, device: &mut D, store: &mut S) -> Outcome
    where
        D: PlaybackDevice,
        S: PersistentStore,
    {
        self.select_playlist(self.state.playlist, device, store)
    }

    fn play_and_persist<D, S>(&mut self, device: &mut D, store: &mut S) -> Outcome
    where
        D: PlaybackDevice,
        S: PersistentStore,
    {
        let PlaybackState {
            playlist, track, ..
        } = self.state;
        info!("play playlist {} track {}", playlist.get(), track.get());
        if device.play_track(playlist, track).is_err() {
            warn!("play command failed");
        }
        if store.write_byte(track_slot(playlist), track.get()).is_err() {
            warn!("persisting track for playlist {} failed", playlist.get());
        }
        Outcome::Playing { playlist, track }
    }
}

/// Stored track of `playlist`; unreadable slots start at track 1.
fn read_track<S: PersistentStore>(store: &mut S, playlist: PlaylistId) -> TrackNumber {
    match store.read_byte(track_slot(playlist)) {
        Ok(raw) => TrackNumber::new(raw),
        Err(_) => {
            warn!("stored track for playlist {} unreadable", playlist.get());
            TrackNumber::FIRST
        }
    }
}

/// Track count of `playlist`, or why it cannot be used.
fn folder_size<D: PlaybackDevice>(device: &mut D, playlist: PlaylistId) -> Result<u8, SkipReason> {
    match device.track_count(playlist) {
        Ok(count) => {
            debug!("track count in {}: {}", playlist.get(), count);
            usable_count(count).ok_or(SkipReason::EmptyPlaylist(playlist))
        }
        Err(_) => {
            warn!("track count for playlist {} unavailable", playlist.get());
            Err(SkipReason::TrackCountUnavailable(playlist))
        }
    }
}

/// Folder sizes beyond one byte are capped: the folder/track play command and
/// the persisted slot both address at most 255 tracks.
fn usable_count(count: u16) -> Option<u8> {
    match count {
        0 => None,
        n => Some(u8::try_from(n).unwrap_or(u8::MAX)),
    }
}
