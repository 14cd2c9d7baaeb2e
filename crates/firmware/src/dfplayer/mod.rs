//! DFPlayer Mini driver.
//!
//! Implements [`PlaybackDevice`] over any blocking `embedded-io` serial port.
//! Commands are fire-and-forget. Queries send a frame and read replies until
//! the matching answer arrives or [`DFPLAYER_REPLY_TIMEOUT_MS`] elapses on the
//! supplied [`Monotonic`] clock.
//!
//! Notifications (track finished, media events, errors) can arrive at any
//! time, including while a query waits for its answer. They are parked in a
//! bounded inbox and handed out by [`PlaybackDevice::poll_notification`].
//! When the inbox is full the newest notification is dropped and counted.

pub mod frame;

use embedded_io::{Read, ReadReady, Write};
use heapless::Deque;
use platform::config::{DFPLAYER_REPLY_TIMEOUT_MS, FINISHED_DEDUP_MS, NOTIFICATION_DEPTH};
use platform::{
    DeviceErrorCode, DeviceNotification, Monotonic, PlaySources, PlaybackDevice, PlaylistId,
    TrackNumber, VolumeLevel,
};

pub use frame::{Command, Frame, FrameDecoder, FrameError, Message};

/// Errors from the DFPlayer link.
#[derive(Debug, thiserror::Error)]
pub enum DfPlayerError<E> {
    /// The serial port failed.
    #[error("serial port error: {0:?}")]
    Serial(E),
    /// No answer to a query in time.
    #[error("no reply to command {command:#04x}")]
    Timeout {
        /// Query code
        command: u8,
    },
    /// The module answered a query with an error frame.
    #[error("module reported {0:?}")]
    Device(DeviceErrorCode),
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for DfPlayerError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Serial(_) => defmt::write!(f, "Serial"),
            Self::Timeout { command } => defmt::write!(f, "Timeout({=u8:#x})", command),
            Self::Device(code) => defmt::write!(f, "Device({})", code),
        }
    }
}

/// Last "finished" report handed to the inbox.
#[derive(Debug, Clone, Copy)]
struct Finished {
    source: PlaySources,
    track: u16,
    at_ms: u64,
}

/// DFPlayer Mini on serial port `S`, timed by clock `C`.
pub struct DfPlayer<S, C> {
    serial: S,
    clock: C,
    decoder: FrameDecoder,
    inbox: Deque<DeviceNotification, NOTIFICATION_DEPTH>,
    dropped: u32,
    last_finished: Option<Finished>,
    timeout_ms: u64,
}

impl<S, C> DfPlayer<S, C>
where
    S: Read + Write + ReadReady,
    C: Monotonic,
{
    /// Wrap an already configured 9600 8N1 port.
    pub fn new(serial: S, clock: C) -> Self {
        Self {
            serial,
            clock,
            decoder: FrameDecoder::new(),
            inbox: Deque::new(),
            dropped: 0,
            last_finished: None,
            timeout_ms: DFPLAYER_REPLY_TIMEOUT_MS,
        }
    }

    /// Override the query timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Notifications lost to a full inbox since start-up.
    pub fn dropped_notifications(&self) -> u32 {
        self.dropped
    }

    /// Give back the port and clock.
    pub fn release(self) -> (S, C) {
        (self.serial, self.clock)
    }

    fn send(&mut self, command: Command, param: u16) -> Result<(), DfPlayerError<S::Error>> {
        trace!("dfplayer tx {} {}", command.code(), param);
        let bytes = Frame::command(command, param).encode();
        self.serial.write_all(&bytes).map_err(DfPlayerError::Serial)?;
        self.serial.flush().map_err(DfPlayerError::Serial)
    }

    fn query(&mut self, command: Command, param: u16) -> Result<u16, DfPlayerError<S::Error>> {
        self.send(command, param)?;
        let deadline = self.clock.now_ms().saturating_add(self.timeout_ms);
        loop {
            match self.next_frame()? {
                Some(frame) => match frame.message() {
                    Message::Reply { code, param } if code == command.code() => return Ok(param),
                    Message::Error(code) => {
                        warn!("dfplayer rejected query: {:?}", code);
                        return Err(DfPlayerError::Device(code));
                    }
                    Message::Notification(notification) => self.park(notification),
                    Message::Reply { code, .. } => debug!("stray reply {}", code),
                    Message::Ack => {}
                },
                None if self.clock.now_ms() >= deadline => {
                    warn!("dfplayer query {} timed out", command.code());
                    return Err(DfPlayerError::Timeout {
                        command: command.code(),
                    });
                }
                None => {}
            }
        }
    }

    /// Read buffered bytes until one frame completes or the port runs dry.
    fn next_frame(&mut self) -> Result<Option<Frame>, DfPlayerError<S::Error>> {
        while self.serial.read_ready().map_err(DfPlayerError::Serial)? {
            let mut byte = [0u8; 1];
            if self.serial.read(&mut byte).map_err(DfPlayerError::Serial)? == 0 {
                break;
            }
            let [byte] = byte;
            match self.decoder.push(byte) {
                Some(Ok(frame)) => return Ok(Some(frame)),
                Some(Err(err)) => warn!("dfplayer frame dropped: {:?}", err),
                None => {}
            }
        }
        Ok(None)
    }

    /// Move every complete frame waiting on the port into the inbox.
    fn pump(&mut self) {
        loop {
            match self.next_frame() {
                Ok(Some(frame)) => match frame.message() {
                    Message::Notification(notification) => self.park(notification),
                    Message::Error(code) => {
                        self.park(DeviceNotification::CommunicationError(code));
                    }
                    Message::Reply { code, .. } => debug!("late reply {}", code),
                    Message::Ack => {}
                },
                Ok(None) => break,
                Err(_) => {
                    warn!("dfplayer serial read failed");
                    break;
                }
            }
        }
    }

    fn park(&mut self, notification: DeviceNotification) {
        if let DeviceNotification::PlaybackFinished { source, track } = notification {
            let now = self.clock.now_ms();
            let repeat = self.last_finished.is_some_and(|last| {
                last.source == source
                    && last.track == track
                    && now.saturating_sub(last.at_ms) < FINISHED_DEDUP_MS
            });
            if repeat {
                trace!("repeat finish of track {} ignored", track);
                return;
            }
            self.last_finished = Some(Finished {
                source,
                track,
                at_ms: now,
            });
        }

        if self.inbox.push_back(notification).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            warn!("notification inbox full, dropped {:?}", notification);
        }
    }
}

impl<S, C> PlaybackDevice for DfPlayer<S, C>
where
    S: Read + Write + ReadReady,
    C: Monotonic,
{
    type Error = DfPlayerError<S::Error>;

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.decoder.clear();
        self.send(Command::Reset, 0)
    }

    fn play_track(&mut self, playlist: PlaylistId, track: TrackNumber) -> Result<(), Self::Error> {
        self.send(
            Command::PlayFolderTrack,
            u16::from_be_bytes([playlist.get(), track.get()]),
        )
    }

    fn set_volume(&mut self, level: VolumeLevel) -> Result<(), Self::Error> {
        self.send(Command::SetVolume, u16::from(level.get()))
    }

    fn track_count(&mut self, playlist: PlaylistId) -> Result<u16, Self::Error> {
        self.query(Command::QueryFolderTracks, u16::from(playlist.get()))
    }

    fn total_track_count(&mut self) -> Result<u16, Self::Error> {
        self.query(Command::QueryTotalTracks, 0)
    }

    fn volume(&mut self) -> Result<u8, Self::Error> {
        self.query(Command::QueryVolume, 0)
            .map(|v| u8::try_from(v).unwrap_or(u8::MAX))
    }

    fn poll_notification(&mut self) -> Option<DeviceNotification> {
        self.pump();
        self.inbox.pop_front()
    }
}
