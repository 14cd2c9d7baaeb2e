//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests. Mocks that a driver takes ownership
//! of are cheap handles over shared state, so a test can keep a clone and
//! steer or inspect them while the driver runs.

#![cfg(any(test, feature = "std"))]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::*;

// ── Clock ────────────────────────────────────────────────────────────────────

/// Manually driven clock.
///
/// `auto_advance` makes every read move time forward, which lets code that
/// waits on the clock terminate in tests.
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now: Rc<Cell<u64>>,
    step: Rc<Cell<u64>>,
}

impl MockClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time, without the auto-advance step.
    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Set the current time.
    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    /// Move time forward.
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    /// Advance by `ms` on every read.
    pub fn auto_advance(&self, ms: u64) {
        self.step.set(ms);
    }
}

impl Monotonic for MockClock {
    fn now_ms(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now.saturating_add(self.step.get()));
        now
    }
}

// ── Keypad ───────────────────────────────────────────────────────────────────

/// Keypad whose pressed channel is set by the test.
#[derive(Debug, Clone, Default)]
pub struct MockKeypad {
    pressed: Rc<Cell<Option<ChannelId>>>,
}

impl MockKeypad {
    /// Create a keypad with nothing pressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold down `channel`.
    pub fn press(&self, channel: ChannelId) {
        self.pressed.set(Some(channel));
    }

    /// Let go of every button.
    pub fn release(&self) {
        self.pressed.set(None);
    }
}

impl RawInput for MockKeypad {
    fn pressed_channel(&mut self) -> Option<ChannelId> {
        self.pressed.get()
    }
}

// ── Store ────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct StoreState {
    bytes: [u8; 256],
    writes: Vec<(u16, u8)>,
    fail_reads: bool,
}

/// In-memory store that records every write.
///
/// Starts erased (`0xFF`), like a factory-fresh EEPROM.
#[derive(Debug, Clone)]
pub struct MockStore {
    state: Rc<RefCell<StoreState>>,
}

/// Error returned by [`MockStore`] when reads are set to fail or the address
/// is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockStoreError;

impl MockStore {
    /// Create an erased store.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(StoreState {
                bytes: [0xFF; 256],
                writes: Vec::new(),
                fail_reads: false,
            })),
        }
    }

    /// Preset a byte without recording a write.
    pub fn preset(&self, addr: u16, value: u8) {
        if let Some(byte) = self.state.borrow_mut().bytes.get_mut(usize::from(addr)) {
            *byte = value;
        }
    }

    /// Current byte at `addr`.
    pub fn byte(&self, addr: u16) -> u8 {
        self.state
            .borrow()
            .bytes
            .get(usize::from(addr))
            .copied()
            .unwrap_or(0xFF)
    }

    /// Every `(addr, value)` written so far, oldest first.
    pub fn writes(&self) -> Vec<(u16, u8)> {
        self.state.borrow().writes.clone()
    }

    /// Forget recorded writes.
    pub fn clear_writes(&self) {
        self.state.borrow_mut().writes.clear();
    }

    /// Make every read fail.
    pub fn fail_reads(&self, fail: bool) {
        self.state.borrow_mut().fail_reads = fail;
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistentStore for MockStore {
    type Error = MockStoreError;

    fn read_byte(&mut self, addr: u16) -> Result<u8, Self::Error> {
        let state = self.state.borrow();
        if state.fail_reads {
            return Err(MockStoreError);
        }
        state.bytes.get(usize::from(addr)).copied().ok_or(MockStoreError)
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        let byte = state.bytes.get_mut(usize::from(addr)).ok_or(MockStoreError)?;
        *byte = value;
        state.writes.push((addr, value));
        Ok(())
    }
}

// ── Playback device ──────────────────────────────────────────────────────────

/// Command recorded by [`MockDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    /// `reset()`
    Reset,
    /// `play_track(playlist, track)` as raw numbers
    Play(u8, u8),
    /// `set_volume(level)` as a raw level
    Volume(u8),
}

#[derive(Debug, Default)]
struct DeviceState {
    folders: [Option<u16>; 7],
    commands: Vec<DeviceCommand>,
    notifications: VecDeque<DeviceNotification>,
    queries: usize,
    total_queries: usize,
    volume: u8,
}

/// Simulated decoder with configurable folder sizes.
///
/// Folders without a configured size fail the count query, like a module that
/// does not answer.
#[derive(Debug, Clone, Default)]
pub struct MockDevice {
    state: Rc<RefCell<DeviceState>>,
}

/// Error returned by [`MockDevice`] for folders without a configured size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockDeviceError;

impl MockDevice {
    /// Create a device with no folders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a device with `counts[i]` tracks in folder `i + 1`.
    pub fn with_folders(counts: &[u16]) -> Self {
        let device = Self::new();
        for (folder, count) in (1u8..).zip(counts) {
            device.set_folder(folder, *count);
        }
        device
    }

    /// Set the track count of `folder`.
    pub fn set_folder(&self, folder: u8, count: u16) {
        if let Some(slot) = self.state.borrow_mut().folders.get_mut(usize::from(folder)) {
            *slot = Some(count);
        }
    }

    /// Make the count query for `folder` fail.
    pub fn remove_folder(&self, folder: u8) {
        if let Some(slot) = self.state.borrow_mut().folders.get_mut(usize::from(folder)) {
            *slot = None;
        }
    }

    /// Queue a notification for the next drain.
    pub fn notify(&self, notification: DeviceNotification) {
        self.state.borrow_mut().notifications.push_back(notification);
    }

    /// Every command issued so far, oldest first.
    pub fn commands(&self) -> Vec<DeviceCommand> {
        self.state.borrow().commands.clone()
    }

    /// Last `play_track` call as raw `(playlist, track)`.
    pub fn last_played(&self) -> Option<(u8, u8)> {
        self.state.borrow().commands.iter().rev().find_map(|c| match c {
            DeviceCommand::Play(p, t) => Some((*p, *t)),
            _ => None,
        })
    }

    /// Forget recorded commands.
    pub fn clear_commands(&self) {
        self.state.borrow_mut().commands.clear();
    }

    /// Number of folder count queries answered or failed so far.
    pub fn queries(&self) -> usize {
        self.state.borrow().queries
    }

    /// Number of whole-medium count queries so far.
    pub fn total_queries(&self) -> usize {
        self.state.borrow().total_queries
    }
}

impl PlaybackDevice for MockDevice {
    type Error = MockDeviceError;

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.state.borrow_mut().commands.push(DeviceCommand::Reset);
        Ok(())
    }

    fn play_track(&mut self, playlist: PlaylistId, track: TrackNumber) -> Result<(), Self::Error> {
        self.state
            .borrow_mut()
            .commands
            .push(DeviceCommand::Play(playlist.get(), track.get()));
        Ok(())
    }

    fn set_volume(&mut self, level: VolumeLevel) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.volume = level.get();
        state.commands.push(DeviceCommand::Volume(level.get()));
        Ok(())
    }

    fn track_count(&mut self, playlist: PlaylistId) -> Result<u16, Self::Error> {
        let mut state = self.state.borrow_mut();
        state.queries = state.queries.saturating_add(1);
        state
            .folders
            .get(usize::from(playlist.get()))
            .copied()
            .flatten()
            .ok_or(MockDeviceError)
    }

    fn total_track_count(&mut self) -> Result<u16, Self::Error> {
        let mut state = self.state.borrow_mut();
        state.total_queries = state.total_queries.saturating_add(1);
        Ok(state.folders.iter().flatten().fold(0u16, |acc, c| acc.saturating_add(*c)))
    }

    fn volume(&mut self) -> Result<u8, Self::Error> {
        Ok(self.state.borrow().volume)
    }

    fn poll_notification(&mut self) -> Option<DeviceNotification> {
        self.state.borrow_mut().notifications.pop_front()
    }
}

// ── Serial port ──────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SerialState {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

/// Loopback-free serial port: the test queues bytes the device "sends" and
/// reads back what the driver wrote.
#[derive(Debug, Clone, Default)]
pub struct MockSerial {
    state: Rc<RefCell<SerialState>>,
}

impl MockSerial {
    /// Create an idle port.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for the driver to receive.
    pub fn feed(&self, bytes: &[u8]) {
        self.state.borrow_mut().rx.extend(bytes.iter().copied());
    }

    /// Take everything the driver has written so far.
    pub fn take_written(&self) -> Vec<u8> {
        std::mem::take(&mut self.state.borrow_mut().tx)
    }

    /// Bytes queued but not yet read by the driver.
    pub fn pending_rx(&self) -> usize {
        self.state.borrow().rx.len()
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = core::convert::Infallible;
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut state = self.state.borrow_mut();
        let mut n = 0usize;
        for slot in buf.iter_mut() {
            match state.rx.pop_front() {
                Some(byte) => {
                    *slot = byte;
                    n = n.saturating_add(1);
                }
                None => break,
            }
        }
        Ok(n)
    }
}

impl embedded_io::ReadReady for MockSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.state.borrow().rx.is_empty())
    }
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.state.borrow_mut().tx.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
