//! Button input abstraction
//!
//! Buttons are plain digital channels (active-low, pulled up). Each channel is
//! given a logical [`ButtonRole`] by a [`ButtonMap`], which also fixes the scan
//! order: when several channels read pressed in the same sample, the first one
//! in scan order wins.

use crate::audio_types::PlaylistId;
use crate::config::MAX_BUTTONS;

/// Physical input channel (GPIO line number on the reference board).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct ChannelId(u8);

impl ChannelId {
    /// Wrap a raw channel number.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Return the raw channel number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// What pressing a button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonRole {
    /// One volume step up
    VolumeUp,
    /// One volume step down
    VolumeDown,
    /// Restart or go back one track
    PreviousTrack,
    /// Switch to a playlist, or skip ahead if it is already playing
    SelectPlaylist(PlaylistId),
}

/// A channel together with its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Button {
    /// Input channel the button is wired to
    pub channel: ChannelId,
    /// Logical function of the button
    pub role: ButtonRole,
}

/// Invalid button configuration, reported once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No buttons configured.
    #[error("button map is empty")]
    Empty,
    /// More buttons than the scanner can hold.
    #[error("{count} buttons configured, at most {max} supported")]
    TooManyButtons {
        /// Buttons requested
        count: usize,
        /// Capacity of the map
        max: usize,
    },
    /// Two roles wired to the same channel.
    #[error("channel {0:?} assigned to more than one role")]
    DuplicateChannel(ChannelId),
    /// One role wired to two channels.
    #[error("role {0:?} assigned to more than one channel")]
    DuplicateRole(ButtonRole),
}

/// Validated role-to-channel mapping in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonMap {
    buttons: heapless::Vec<Button, MAX_BUTTONS>,
}

impl ButtonMap {
    /// Validate `buttons` and keep them in the given scan order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the list is empty, too long, or maps a
    /// channel or a role twice.
    pub fn new(buttons: &[Button]) -> Result<Self, ConfigError> {
        if buttons.is_empty() {
            return Err(ConfigError::Empty);
        }
        let mut map = heapless::Vec::new();
        for button in buttons {
            if map.iter().any(|b: &Button| b.channel == button.channel) {
                return Err(ConfigError::DuplicateChannel(button.channel));
            }
            if map.iter().any(|b: &Button| b.role == button.role) {
                return Err(ConfigError::DuplicateRole(button.role));
            }
            map.push(*button).map_err(|_| ConfigError::TooManyButtons {
                count: buttons.len(),
                max: MAX_BUTTONS,
            })?;
        }
        Ok(Self { buttons: map })
    }

    /// Reference board wiring: volume down, volume up, previous, then the six
    /// playlist buttons.
    ///
    /// | Role            | Channel |
    /// |-----------------|---------|
    /// | VolumeDown      | 2       |
    /// | VolumeUp        | 3       |
    /// | PreviousTrack   | 4       |
    /// | Playlist 1–5    | 5–9     |
    /// | Playlist 6      | 12      |
    #[must_use]
    pub fn default_layout() -> Self {
        const PLAYLIST_CHANNELS: [u8; 6] = [5, 6, 7, 8, 9, 12];

        let mut buttons: heapless::Vec<Button, MAX_BUTTONS> = heapless::Vec::new();
        let transport = [
            (2, ButtonRole::VolumeDown),
            (3, ButtonRole::VolumeUp),
            (4, ButtonRole::PreviousTrack),
        ];
        for (channel, role) in transport {
            let _ = buttons.push(Button {
                channel: ChannelId::new(channel),
                role,
            });
        }
        for (playlist, channel) in PlaylistId::all().zip(PLAYLIST_CHANNELS) {
            let _ = buttons.push(Button {
                channel: ChannelId::new(channel),
                role: ButtonRole::SelectPlaylist(playlist),
            });
        }
        Self { buttons }
    }

    /// Role of the button wired to `channel`.
    #[must_use]
    pub fn role_of(&self, channel: ChannelId) -> Option<ButtonRole> {
        self.buttons
            .iter()
            .find(|b| b.channel == channel)
            .map(|b| b.role)
    }

    /// Channel the button with `role` is wired to.
    #[must_use]
    pub fn channel_of(&self, role: ButtonRole) -> Option<ChannelId> {
        self.buttons
            .iter()
            .find(|b| b.role == role)
            .map(|b| b.channel)
    }

    /// Buttons in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &Button> {
        self.buttons.iter()
    }

    /// Number of configured buttons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    /// Always `false` for a validated map.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}

impl Default for ButtonMap {
    fn default() -> Self {
        Self::default_layout()
    }
}

/// One reading of every button channel.
pub trait RawInput {
    /// The first channel in scan order that currently reads pressed, if any.
    fn pressed_channel(&mut self) -> Option<ChannelId>;
}

impl<T: RawInput + ?Sized> RawInput for &mut T {
    fn pressed_channel(&mut self) -> Option<ChannelId> {
        (**self).pressed_channel()
    }
}
