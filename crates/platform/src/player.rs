//! Playback device abstraction
//!
//! The decoder module owns audio decoding and the storage medium. The core
//! only issues commands, asks how many tracks a folder holds, and drains the
//! notifications the module sends back.

use crate::audio_types::{PlaylistId, TrackNumber, VolumeLevel};

/// Audio decoder module driven by the playback session.
pub trait PlaybackDevice {
    /// Error type
    type Error: core::fmt::Debug;

    /// Reset the module. Callers wait for it to settle before the next command.
    fn reset(&mut self) -> Result<(), Self::Error>;

    /// Start `track` of folder `playlist` from its beginning.
    fn play_track(&mut self, playlist: PlaylistId, track: TrackNumber) -> Result<(), Self::Error>;

    /// Apply an output volume.
    fn set_volume(&mut self, level: VolumeLevel) -> Result<(), Self::Error>;

    /// Number of tracks in folder `playlist`. May block for a bounded time.
    fn track_count(&mut self, playlist: PlaylistId) -> Result<u16, Self::Error>;

    /// Number of tracks on the whole medium. May block for a bounded time.
    fn total_track_count(&mut self) -> Result<u16, Self::Error>;

    /// Volume currently applied by the module. May block for a bounded time.
    fn volume(&mut self) -> Result<u8, Self::Error>;

    /// Take the oldest pending notification without blocking.
    fn poll_notification(&mut self) -> Option<DeviceNotification>;
}

/// Asynchronous message from the decoder module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceNotification {
    /// A track played to its end.
    PlaybackFinished {
        /// Medium the track was played from
        source: PlaySources,
        /// Global index reported by the module
        track: u16,
    },
    /// The module reported a communication or playback error.
    CommunicationError(DeviceErrorCode),
    /// Media became available after power-up.
    MediaOnline(PlaySources),
    /// Media was inserted.
    MediaInserted(PlaySources),
    /// Media was removed.
    MediaRemoved(PlaySources),
}

/// Set of media sources, as reported by the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct PlaySources(u8);

impl PlaySources {
    /// USB mass storage
    pub const USB: Self = Self(0x01);
    /// SD card
    pub const SD: Self = Self(0x02);
    /// PC connection
    pub const PC: Self = Self(0x04);
    /// On-board flash
    pub const FLASH: Self = Self(0x08);

    /// Build from the raw bitmask sent by the module.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw bitmask.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether every source in `other` is also in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Human readable name of the first contained source.
    #[must_use]
    pub fn name(self) -> &'static str {
        if self.contains(Self::SD) {
            "SD card"
        } else if self.contains(Self::USB) {
            "USB disk"
        } else if self.contains(Self::FLASH) {
            "flash"
        } else if self.contains(Self::PC) {
            "PC"
        } else {
            "unknown source"
        }
    }
}

/// Error code carried by a communication error notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceErrorCode {
    /// Module is still initialising
    Busy,
    /// Module is in sleep mode
    Sleeping,
    /// Serial frame was incomplete
    SerialWrongStack,
    /// Serial frame failed its checksum
    Checksum,
    /// Requested track is out of range
    FileIndexOut,
    /// Requested track was not found
    FileMismatch,
    /// Advertisement requested while idle
    Advertise,
    /// Any other code
    Unknown(u16),
}

impl DeviceErrorCode {
    /// Decode the parameter of an error notification.
    #[must_use]
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::Busy,
            2 => Self::Sleeping,
            3 => Self::SerialWrongStack,
            4 => Self::Checksum,
            5 => Self::FileIndexOut,
            6 => Self::FileMismatch,
            7 => Self::Advertise,
            other => Self::Unknown(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_name_prefers_sd() {
        let both = PlaySources::from_bits(PlaySources::SD.bits() | PlaySources::USB.bits());
        assert_eq!(both.name(), "SD card");
        assert_eq!(PlaySources::USB.name(), "USB disk");
        assert_eq!(PlaySources::default().name(), "unknown source");
    }

    #[test]
    fn error_codes_decode() {
        assert_eq!(DeviceErrorCode::from_code(4), DeviceErrorCode::Checksum);
        assert_eq!(DeviceErrorCode::from_code(0x81), DeviceErrorCode::Unknown(0x81));
    }
}
