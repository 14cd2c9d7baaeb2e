//! Boot sequence.
//!
//! Runs once before the poll loop. Order matters:
//!
//! 1. Reset the decoder and let it settle; it ignores commands meanwhile.
//! 2. Restore the persisted volume (or the default) and apply it.
//! 3. Read back what the decoder reports: volume, total tracks and the size of
//!    every playlist folder.
//! 4. Clamp the restored track of playlist 1 to the reported folder size.
//!
//! Nothing starts playing; the first button press does.

use embedded_hal::delay::DelayNs;
use platform::config::{APP_NAME, APP_VERSION, PLAYLIST_COUNT, RESET_SETTLE_MS, VOLUME_SETTLE_MS};
use platform::{PersistentStore, PlaybackDevice, PlaylistId};
use playback::{PlaybackSession, PlaybackState};

/// Ordered boot steps, for documentation and tests.
pub const BOOT_SEQUENCE_STEPS: &[&str] = &[
    "1. Decoder: reset, wait RESET_SETTLE_MS",
    "2. Volume: restore from store (default if out of range), apply + persist, wait VOLUME_SETTLE_MS",
    "3. Query: device volume, total track count, track count per playlist",
    "4. Session: clamp playlist 1 track to its reported count",
];

/// What the decoder reported while booting.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootReport {
    /// Volume the decoder reports after the restore
    pub device_volume: Option<u8>,
    /// Tracks on the whole medium
    pub total_tracks: Option<u16>,
    /// Tracks per playlist folder, index 0 = playlist 1
    pub folder_tracks: [Option<u16>; PLAYLIST_COUNT as usize],
    /// Session state entering the poll loop
    pub state: PlaybackState,
}

impl BootReport {
    /// Reported size of `playlist`.
    pub fn folder(&self, playlist: PlaylistId) -> Option<u16> {
        let index = usize::from(playlist.get()).checked_sub(1)?;
        self.folder_tracks.get(index).copied().flatten()
    }

    /// Playlists whose folder answered with at least one track.
    pub fn playable(&self) -> impl Iterator<Item = PlaylistId> + '_ {
        PlaylistId::all().filter(|p| self.folder(*p).is_some_and(|c| c > 0))
    }
}

/// Bring the decoder up and rebuild the session from the store.
pub fn boot<D, S, W>(device: &mut D, store: &mut S, delay: &mut W) -> (PlaybackSession, BootReport)
where
    D: PlaybackDevice,
    S: PersistentStore,
    W: DelayNs,
{
    info!("{} v{} starting", APP_NAME, APP_VERSION);

    if device.reset().is_err() {
        warn!("decoder reset failed");
    }
    delay.delay_ms(RESET_SETTLE_MS);

    let mut session = PlaybackSession::restore(store);
    session.apply_volume(device, store);
    delay.delay_ms(VOLUME_SETTLE_MS);

    let device_volume = device.volume().ok();
    let total_tracks = device.total_track_count().ok();
    debug!("decoder volume {:?}, {:?} tracks on medium", device_volume, total_tracks);

    let mut folder_tracks = [None; PLAYLIST_COUNT as usize];
    for (slot, playlist) in folder_tracks.iter_mut().zip(PlaylistId::all()) {
        *slot = device.track_count(playlist).ok();
        match *slot {
            Some(count) => debug!("playlist {}: {} tracks", playlist.get(), count),
            None => warn!("playlist {}: no track count", playlist.get()),
        }
    }

    if let Some(Some(count)) = folder_tracks.first() {
        session.clamp_track(*count);
    }

    let report = BootReport {
        device_volume,
        total_tracks,
        folder_tracks,
        state: session.state(),
    };
    info!(
        "ready: playlist {} track {} volume {}",
        report.state.playlist.get(),
        report.state.track.get(),
        report.state.volume.get()
    );
    (session, report)
}
