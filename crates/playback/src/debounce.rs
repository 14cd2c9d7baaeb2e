//! Button debouncer.
//!
//! `Debouncer` turns one raw reading per poll into at most one
//! [`ButtonReleased`] event per physical press. It is a pure function of its
//! running state and the timestamps it is handed: no timers, no blocking.
//!
//! A reading is trusted only once it has stayed unchanged for the debounce
//! window. Events fire when a trusted press turns into a trusted "nothing
//! pressed", so holding a button longer never produces more events.
//!
//! ```text
//! raw      ──┐ ┌┐ ┌───────────────┐ ┌┐ ┌──────────
//!            └─┘└─┘               └─┘└─┘
//! stable   ─────────────┐                 ┌────────
//!                       └─────────────────┘  ← ButtonReleased
//! ```
//!
//! Only one channel is tracked at a time. When a sample contains several
//! pressed channels the scanner reports the first in scan order, and a direct
//! switch from one stable press to another drops the first press silently.

use platform::config::DEBOUNCE_MS;
use platform::ChannelId;

/// A debounced press-and-release of one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonReleased(pub ChannelId);

/// Release-edge debouncer for a bank of buttons.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window_ms: u64,
    candidate: Option<ChannelId>,
    candidate_since_ms: u64,
    stable: Option<ChannelId>,
}

impl Debouncer {
    /// Create a debouncer with the given stability window.
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            candidate: None,
            candidate_since_ms: 0,
            stable: None,
        }
    }

    /// Feed one reading taken at `now_ms`.
    ///
    /// Returns the released button when a stable press has just turned into a
    /// stable release.
    pub fn poll(&mut self, sample: Option<ChannelId>, now_ms: u64) -> Option<ButtonReleased> {
        if sample != self.candidate {
            self.candidate = sample;
            self.candidate_since_ms = now_ms;
        }

        if now_ms.saturating_sub(self.candidate_since_ms) < self.window_ms {
            return None;
        }

        let released = match (self.stable, sample) {
            (Some(held), None) => Some(ButtonReleased(held)),
            _ => None,
        };
        self.stable = sample;
        released
    }

    /// The button currently accepted as held down.
    pub fn stable(&self) -> Option<ChannelId> {
        self.stable
    }

    /// The stability window in milliseconds.
    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_MS)
    }
}
