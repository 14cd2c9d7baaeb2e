//! Poll-loop driver.
//!
//! One [`PollDriver::poll_once`] call is one cycle of the main loop:
//!
//! ```text
//! drain decoder notifications ──► session (track finished → next track)
//! sample buttons ──► debouncer ──► ButtonMap ──► session
//! ```
//!
//! The clock is read once per cycle and the same timestamp feeds both the
//! debouncer and the previous-track window. Everything runs to completion on
//! the caller's thread; the only waits are bounded decoder queries.

use embedded_hal::delay::DelayNs;
use platform::config::POLL_INTERVAL_MS;
use platform::{
    ButtonMap, DeviceNotification, Monotonic, PersistentStore, PlaybackDevice, RawInput,
};
use playback::{ButtonReleased, Debouncer, Outcome, PlaybackSession};

use crate::input::InputConfig;

/// Owns the peripherals and the session for the lifetime of the program.
pub struct PollDriver<I, D, S, C> {
    input: I,
    device: D,
    store: S,
    clock: C,
    map: ButtonMap,
    debouncer: Debouncer,
    session: PlaybackSession,
}

impl<I, D, S, C> PollDriver<I, D, S, C>
where
    I: RawInput,
    D: PlaybackDevice,
    S: PersistentStore,
    C: Monotonic,
{
    /// Assemble a driver around a booted session.
    pub fn new(
        input: I,
        device: D,
        store: S,
        clock: C,
        config: InputConfig,
        session: PlaybackSession,
    ) -> Self {
        debug!(
            "poll driver: {} buttons, debounce {} ms",
            config.map.len(),
            config.debouncer.window_ms()
        );
        Self {
            input,
            device,
            store,
            clock,
            map: config.map,
            debouncer: config.debouncer,
            session,
        }
    }

    /// Run one cycle. Returns the outcome of a debounced button, if any.
    pub fn poll_once(&mut self) -> Option<Outcome> {
        self.drain_notifications();

        let now = self.clock.now_ms();
        let sample = self.input.pressed_channel();
        let ButtonReleased(channel) = self.debouncer.poll(sample, now)?;
        let Some(role) = self.map.role_of(channel) else {
            warn!("released channel {} has no role", channel.get());
            return None;
        };
        debug!("button {:?} on channel {}", role, channel.get());
        Some(
            self.session
                .handle_button(role, now, &mut self.device, &mut self.store),
        )
    }

    /// Poll forever, pausing [`POLL_INTERVAL_MS`] between cycles.
    pub fn run<W: DelayNs>(&mut self, delay: &mut W) -> ! {
        let pause = u32::try_from(POLL_INTERVAL_MS).unwrap_or(1);
        loop {
            self.poll_once();
            delay.delay_ms(pause);
        }
    }

    /// Handle every pending decoder notification. Returns how many there were.
    pub fn drain_notifications(&mut self) -> usize {
        let mut handled = 0usize;
        while let Some(notification) = self.device.poll_notification() {
            handled = handled.saturating_add(1);
            self.on_notification(notification);
        }
        handled
    }

    fn on_notification(&mut self, notification: DeviceNotification) {
        match notification {
            DeviceNotification::PlaybackFinished { source, track } => {
                info!("{} finished track {}", source.name(), track);
                self.session
                    .on_playback_finished(&mut self.device, &mut self.store);
            }
            DeviceNotification::CommunicationError(code) => {
                warn!("decoder error {:?}", code);
            }
            DeviceNotification::MediaOnline(source) => info!("{} online", source.name()),
            DeviceNotification::MediaInserted(source) => {
                info!("{} inserted", source.name());
                match self.device.total_track_count() {
                    Ok(count) => info!("{} tracks on medium", count),
                    Err(_) => warn!("total track count unavailable"),
                }
            }
            DeviceNotification::MediaRemoved(source) => info!("{} removed", source.name()),
        }
    }

    /// Current session.
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    /// The decoder.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// The persistent store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Button wiring in use.
    pub fn map(&self) -> &ButtonMap {
        &self.map
    }
}
