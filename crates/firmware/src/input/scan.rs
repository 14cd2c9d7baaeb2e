//! GPIO button bank.
//!
//! Buttons short their pin to ground against an internal pull-up, so a low
//! level means pressed. Pins are read in the order they were added; the first
//! pressed pin wins a poll.

use embedded_hal::digital::InputPin;
use heapless::Vec;
use platform::config::MAX_BUTTONS;
use platform::{ChannelId, RawInput};

/// Error from [`ButtonBank::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BankError {
    /// More pins than [`MAX_BUTTONS`].
    #[error("button bank is full")]
    Full,
    /// Channel already has a pin.
    #[error("channel {0:?} already has a pin")]
    DuplicateChannel(ChannelId),
}

/// Active-low push buttons, one pin per channel.
pub struct ButtonBank<P> {
    pins: Vec<(ChannelId, P), MAX_BUTTONS>,
}

impl<P: InputPin> ButtonBank<P> {
    /// Bank with no pins.
    pub const fn new() -> Self {
        Self { pins: Vec::new() }
    }

    /// Append `pin` for `channel`, after every pin added so far.
    pub fn add(&mut self, channel: ChannelId, pin: P) -> Result<(), BankError> {
        if self.pins.iter().any(|(c, _)| *c == channel) {
            return Err(BankError::DuplicateChannel(channel));
        }
        self.pins
            .push((channel, pin))
            .map_err(|_| BankError::Full)
    }

    /// Builder-style [`Self::add`].
    pub fn with(mut self, channel: ChannelId, pin: P) -> Result<Self, BankError> {
        self.add(channel, pin)?;
        Ok(self)
    }

    /// Channels in scan order.
    pub fn channels(&self) -> impl Iterator<Item = ChannelId> + '_ {
        self.pins.iter().map(|(c, _)| *c)
    }
}

impl<P: InputPin> Default for ButtonBank<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: InputPin> RawInput for ButtonBank<P> {
    fn pressed_channel(&mut self) -> Option<ChannelId> {
        for (channel, pin) in &mut self.pins {
            // A pin that cannot be read counts as released.
            if pin.is_low().unwrap_or(false) {
                return Some(*channel);
            }
        }
        None
    }
}
