//! Fluent builder for the button wiring.
//!
//! Collects role-to-channel assignments and the debounce window, then
//! validates everything at once in [`ButtonMapBuilder::build`]. Validation
//! errors surface at boot instead of as a dead button later.
//!
//! # Usage
//!
//! ```no_run
//! use firmware::input::builder::ButtonMapBuilder;
//! use platform::PlaylistId;
//!
//! let first = PlaylistId::FIRST;
//! let input = ButtonMapBuilder::new()
//!     .volume_down(2)
//!     .volume_up(3)
//!     .previous(4)
//!     .playlist(first, 5)
//!     .debounce_ms(30)
//!     .build();
//! assert!(input.is_ok());
//! ```

use platform::config::{DEBOUNCE_MS, MAX_BUTTONS};
use platform::{Button, ButtonMap, ButtonRole, ChannelId, ConfigError, PlaylistId};
use playback::Debouncer;

/// Validated input configuration produced by [`ButtonMapBuilder::build`].
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Role of every wired channel, in scan order
    pub map: ButtonMap,
    /// Debouncer tuned to the configured window
    pub debouncer: Debouncer,
}

/// Fluent builder for a [`ButtonMap`] plus debounce window.
#[derive(Debug, Clone)]
pub struct ButtonMapBuilder {
    buttons: heapless::Vec<Button, MAX_BUTTONS>,
    requested: usize,
    debounce_ms: u64,
}

impl ButtonMapBuilder {
    // -----------------------------------------------------------------------
    // Factory methods
    // -----------------------------------------------------------------------

    /// Start with no buttons and the default debounce window.
    pub fn new() -> Self {
        Self {
            buttons: heapless::Vec::new(),
            requested: 0,
            debounce_ms: DEBOUNCE_MS,
        }
    }

    /// Start from the reference board wiring, see
    /// [`ButtonMap::default_layout`].
    pub fn reference_layout() -> Self {
        ButtonMap::default_layout()
            .iter()
            .fold(Self::new(), |b, button| b.button(button.channel.get(), button.role))
    }

    // -----------------------------------------------------------------------
    // Assignments
    // -----------------------------------------------------------------------

    /// Wire `role` to `channel`. Later calls scan after earlier ones.
    #[must_use]
    pub fn button(mut self, channel: u8, role: ButtonRole) -> Self {
        self.requested = self.requested.saturating_add(1);
        let _ = self.buttons.push(Button {
            channel: ChannelId::new(channel),
            role,
        });
        self
    }

    /// Wire the volume-up button.
    #[must_use]
    pub fn volume_up(self, channel: u8) -> Self {
        self.button(channel, ButtonRole::VolumeUp)
    }

    /// Wire the volume-down button.
    #[must_use]
    pub fn volume_down(self, channel: u8) -> Self {
        self.button(channel, ButtonRole::VolumeDown)
    }

    /// Wire the previous-track button.
    #[must_use]
    pub fn previous(self, channel: u8) -> Self {
        self.button(channel, ButtonRole::PreviousTrack)
    }

    /// Wire the button selecting `playlist`.
    #[must_use]
    pub fn playlist(self, playlist: PlaylistId, channel: u8) -> Self {
        self.button(channel, ButtonRole::SelectPlaylist(playlist))
    }

    // -----------------------------------------------------------------------
    // Timing
    // -----------------------------------------------------------------------

    /// Set the debounce window in milliseconds.
    #[must_use]
    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    /// Validate the wiring.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] for an empty or oversized map, or a channel or role
    /// used twice.
    pub fn build(self) -> Result<InputConfig, ConfigError> {
        if self.requested > MAX_BUTTONS {
            return Err(ConfigError::TooManyButtons {
                count: self.requested,
                max: MAX_BUTTONS,
            });
        }
        let map = ButtonMap::new(&self.buttons)?;
        Ok(InputConfig {
            map,
            debouncer: Debouncer::new(self.debounce_ms),
        })
    }
}

impl Default for ButtonMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
