//! Persistent byte storage for playback state.
//!
//! The store survives power loss and is addressed one byte at a time. Its
//! content on first use is undefined (an erased EEPROM reads `0xFF`), so every
//! value read back is range-checked by the caller.
//!
//! # Layout
//!
//! | Address                    | Content                              |
//! |----------------------------|--------------------------------------|
//! | `PLAYLIST_TRACK_BASE + id` | last played track of playlist `id`   |
//! | `VOLUME_ADDR`              | global volume level (0–10)           |

use crate::audio_types::PlaylistId;

/// First address of the per-playlist track table (playlist 0 is unused).
pub const PLAYLIST_TRACK_BASE: u16 = 10;

/// Address of the persisted volume byte.
pub const VOLUME_ADDR: u16 = 20;

/// Address holding the last played track of `playlist`.
#[must_use]
pub fn track_slot(playlist: PlaylistId) -> u16 {
    PLAYLIST_TRACK_BASE.saturating_add(u16::from(playlist.get()))
}

/// Byte-addressed non-volatile storage.
pub trait PersistentStore {
    /// Error type
    type Error: core::fmt::Debug;

    /// Read the byte at `addr`.
    fn read_byte(&mut self, addr: u16) -> Result<u8, Self::Error>;

    /// Write `value` at `addr`. Returns once the value is durable.
    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), Self::Error>;
}

impl<T: PersistentStore + ?Sized> PersistentStore for &mut T {
    type Error = T::Error;

    fn read_byte(&mut self, addr: u16) -> Result<u8, Self::Error> {
        (**self).read_byte(addr)
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), Self::Error> {
        (**self).write_byte(addr, value)
    }
}
