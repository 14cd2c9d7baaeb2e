//! Playback domain newtypes for compile-time safety.
//!
//! These zero-cost wrappers keep raw bytes from storage and the decoder out of
//! the state machine until they have been range-checked:
//! - `VolumeLevel`: clamps 0–10, the range persisted and sent to the decoder
//! - `PlaylistId`: validates 1–6, one per playlist button / decoder folder
//! - `TrackNumber`: 1-based track index inside a playlist folder

use crate::config::{MAX_VOLUME, PLAYLIST_COUNT};

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("value {value} outside {min}..={max}")]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

// ── VolumeLevel ──────────────────────────────────────────────────────────────

/// Output volume, clamped to `0..=MAX_VOLUME`.
///
/// Construct with [`VolumeLevel::new`] (clamping) or [`VolumeLevel::try_new`]
/// (strict). Stepping saturates at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct VolumeLevel(u8);

impl VolumeLevel {
    /// Loudest level accepted by the device.
    pub const MAX: Self = Self(MAX_VOLUME);

    /// Silence.
    pub const MIN: Self = Self(0);

    /// Create a `VolumeLevel`, clamping values above the maximum.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(MAX_VOLUME))
    }

    /// Create a `VolumeLevel`, returning an error if `value` exceeds the maximum.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `value > MAX_VOLUME`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        if value > MAX_VOLUME {
            Err(OutOfRangeError {
                value: u32::from(value),
                min: 0,
                max: u32::from(MAX_VOLUME),
            })
        } else {
            Ok(Self(value))
        }
    }

    /// One step louder, saturating at [`VolumeLevel::MAX`].
    #[must_use]
    pub fn step_up(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// One step quieter, saturating at zero.
    #[must_use]
    pub fn step_down(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Return the raw level (0–10).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

// ── PlaylistId ───────────────────────────────────────────────────────────────

/// Playlist (decoder folder) number, `1..=PLAYLIST_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct PlaylistId(u8);

impl PlaylistId {
    /// The playlist selected at power-on.
    pub const FIRST: Self = Self(1);

    /// Create a `PlaylistId`, rejecting 0 and anything above the playlist count.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `value` is not in `1..=PLAYLIST_COUNT`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        if value == 0 || value > PLAYLIST_COUNT {
            Err(OutOfRangeError {
                value: u32::from(value),
                min: 1,
                max: u32::from(PLAYLIST_COUNT),
            })
        } else {
            Ok(Self(value))
        }
    }

    /// Every playlist in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=PLAYLIST_COUNT).map(Self)
    }

    /// Return the folder number.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

// ── TrackNumber ──────────────────────────────────────────────────────────────

/// 1-based track index inside a playlist.
///
/// A track number is never zero. Values read back from storage are clamped
/// into `1..=count` with [`TrackNumber::clamp_to`] before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct TrackNumber(u8);

impl TrackNumber {
    /// The first track of any playlist.
    pub const FIRST: Self = Self(1);

    /// Create a `TrackNumber`, mapping 0 to the first track.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.max(1))
    }

    /// Clamp into `1..=count`. `count` must be non-zero; a zero count leaves
    /// the first track.
    #[must_use]
    pub fn clamp_to(self, count: u8) -> Self {
        Self(self.0.min(count).max(1))
    }

    /// The track after this one, wrapping to 1 after `count`.
    ///
    /// Computed as `(track mod count) + 1`, so a stale track beyond a
    /// shrunken folder still lands inside it.
    #[must_use]
    pub fn next_in(self, count: u8) -> Self {
        match self.0.checked_rem(count) {
            Some(rem) => Self(rem.saturating_add(1)),
            None => Self::FIRST,
        }
    }

    /// The track before this one, wrapping to `count` below track 1.
    #[must_use]
    pub fn previous_in(self, count: u8) -> Self {
        if self.0 > 1 {
            Self(self.0.saturating_sub(1))
        } else {
            Self::new(count)
        }
    }

    /// Return the 1-based index.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_wraps_after_last_track() {
        assert_eq!(TrackNumber::new(5).next_in(5), TrackNumber::new(1));
        assert_eq!(TrackNumber::new(4).next_in(5), TrackNumber::new(5));
    }

    #[test]
    fn next_from_stale_track_lands_inside_folder() {
        // Folder shrank from 9 to 4 tracks while track 9 was current.
        assert_eq!(TrackNumber::new(9).next_in(4), TrackNumber::new(2));
    }

    #[test]
    fn previous_wraps_to_last_track() {
        assert_eq!(TrackNumber::FIRST.previous_in(7), TrackNumber::new(7));
        assert_eq!(TrackNumber::new(3).previous_in(7), TrackNumber::new(2));
    }

    #[test]
    fn clamp_keeps_track_within_count() {
        assert_eq!(TrackNumber::new(9).clamp_to(6), TrackNumber::new(6));
        assert_eq!(TrackNumber::new(0).clamp_to(6), TrackNumber::FIRST);
        assert_eq!(TrackNumber::new(3).clamp_to(0), TrackNumber::FIRST);
    }

    #[test]
    fn volume_steps_saturate() {
        assert_eq!(VolumeLevel::MAX.step_up(), VolumeLevel::MAX);
        assert_eq!(VolumeLevel::MIN.step_down(), VolumeLevel::MIN);
        assert_eq!(VolumeLevel::new(3).step_up().get(), 4);
    }
}
