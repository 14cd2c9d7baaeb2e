//! DFPlayer Mini wire format.
//!
//! Every message in both directions is a fixed 10-byte frame:
//!
//! ```text
//! 7E FF 06 CMD FB PH PL CH CL EF
//! │  │  │  │   │  └──┴─ parameter, big endian
//! │  │  │  │   └─ 1 = request acknowledgement
//! │  │  │  └─ command / message code
//! │  │  └─ length of FF..PL
//! │  └─ version
//! └─ start marker                CH CL = checksum, EF = end marker
//! ```
//!
//! The checksum is the two's complement of the 16-bit sum of `FF..PL`.

use platform::{DeviceErrorCode, DeviceNotification, PlaySources};

/// Start-of-frame marker.
pub const START: u8 = 0x7E;
/// Protocol version byte.
pub const VERSION: u8 = 0xFF;
/// Payload length byte (version through parameter).
pub const LENGTH: u8 = 0x06;
/// End-of-frame marker.
pub const END: u8 = 0xEF;
/// Bytes in one frame.
pub const FRAME_LEN: usize = 10;

/// Commands sent to the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Play `track` (low byte) of `folder` (high byte).
    PlayFolderTrack = 0x0F,
    /// Set output volume.
    SetVolume = 0x06,
    /// Soft reset.
    Reset = 0x0C,
    /// Ask for the current volume.
    QueryVolume = 0x43,
    /// Ask for the number of tracks on the SD card.
    QueryTotalTracks = 0x48,
    /// Ask for the number of tracks in a folder.
    QueryFolderTracks = 0x4E,
}

impl Command {
    /// Wire code.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

// Message codes sent by the module on its own.
const MEDIA_INSERTED: u8 = 0x3A;
const MEDIA_REMOVED: u8 = 0x3B;
const FINISHED_USB: u8 = 0x3C;
const FINISHED_SD: u8 = 0x3D;
const FINISHED_FLASH: u8 = 0x3E;
const MEDIA_ONLINE: u8 = 0x3F;
const ERROR: u8 = 0x40;
const ACK: u8 = 0x41;

/// One decoded 10-byte frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Command or message code
    pub code: u8,
    /// Acknowledgement requested
    pub feedback: bool,
    /// 16-bit parameter
    pub param: u16,
}

impl Frame {
    /// Frame carrying `command` with `param`, no acknowledgement requested.
    pub const fn command(command: Command, param: u16) -> Self {
        Self {
            code: command.code(),
            feedback: false,
            param,
        }
    }

    /// Serialize to wire bytes.
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let [ph, pl] = self.param.to_be_bytes();
        let body = [VERSION, LENGTH, self.code, u8::from(self.feedback), ph, pl];
        let [ch, cl] = checksum(&body).to_be_bytes();
        let [b0, b1, b2, b3, b4, b5] = body;
        [START, b0, b1, b2, b3, b4, b5, ch, cl, END]
    }

    /// What this frame means to the host.
    pub fn message(&self) -> Message {
        let source = |code: u8| match code {
            FINISHED_USB => PlaySources::USB,
            FINISHED_SD => PlaySources::SD,
            _ => PlaySources::FLASH,
        };
        // Media messages carry the source bitmask in the low byte.
        let [_, low] = self.param.to_be_bytes();
        match self.code {
            FINISHED_USB | FINISHED_SD | FINISHED_FLASH => {
                Message::Notification(DeviceNotification::PlaybackFinished {
                    source: source(self.code),
                    track: self.param,
                })
            }
            MEDIA_INSERTED => Message::Notification(DeviceNotification::MediaInserted(
                PlaySources::from_bits(low),
            )),
            MEDIA_REMOVED => Message::Notification(DeviceNotification::MediaRemoved(
                PlaySources::from_bits(low),
            )),
            MEDIA_ONLINE => Message::Notification(DeviceNotification::MediaOnline(
                PlaySources::from_bits(low),
            )),
            ERROR => Message::Error(DeviceErrorCode::from_code(self.param)),
            ACK => Message::Ack,
            code => Message::Reply {
                code,
                param: self.param,
            },
        }
    }
}

/// Classified incoming frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message {
    /// Unsolicited event for the host.
    Notification(DeviceNotification),
    /// Answer to a query, tagged with the query code.
    Reply {
        /// Code of the query answered
        code: u8,
        /// Answer
        param: u16,
    },
    /// The module rejected the last command.
    Error(DeviceErrorCode),
    /// Command acknowledgement.
    Ack,
}

/// Two's complement of the 16-bit sum of `body`.
pub fn checksum(body: &[u8]) -> u16 {
    let sum = body
        .iter()
        .fold(0u16, |acc, b| acc.wrapping_add(u16::from(*b)));
    0u16.wrapping_sub(sum)
}

/// Why a complete frame was thrown away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Version or length byte is not `FF 06`.
    #[error("bad header {version:#04x} {length:#04x}")]
    Header {
        /// Received version byte
        version: u8,
        /// Received length byte
        length: u8,
    },
    /// Tenth byte is not the end marker.
    #[error("missing end marker, got {0:#04x}")]
    End(u8),
    /// Checksum does not match the body.
    #[error("checksum {found:#06x}, expected {expected:#06x}")]
    Checksum {
        /// Computed from the body
        expected: u16,
        /// Carried by the frame
        found: u16,
    },
}

/// Incremental frame parser fed one byte at a time.
///
/// Bytes before a start marker are skipped. After a rejected frame the parser
/// restarts at the next start marker inside the rejected bytes, so a frame
/// that began mid-garbage is not lost.
#[derive(Debug, Clone, Default)]
pub struct FrameDecoder {
    buf: [u8; FRAME_LEN],
    len: usize,
}

impl FrameDecoder {
    /// Empty parser.
    pub const fn new() -> Self {
        Self {
            buf: [0; FRAME_LEN],
            len: 0,
        }
    }

    /// Bytes of the frame in progress.
    pub fn pending(&self) -> usize {
        self.len
    }

    /// Forget the frame in progress.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Feed one byte. Returns a result once ten bytes starting at a start
    /// marker have been collected.
    pub fn push(&mut self, byte: u8) -> Option<Result<Frame, FrameError>> {
        if self.len == 0 && byte != START {
            return None;
        }
        let slot = self.buf.get_mut(self.len)?;
        *slot = byte;
        self.len = self.len.saturating_add(1);
        if self.len < FRAME_LEN {
            return None;
        }

        let result = Self::parse(&self.buf);
        if result.is_err() {
            self.resync();
        } else {
            self.len = 0;
        }
        Some(result)
    }

    fn parse(buf: &[u8; FRAME_LEN]) -> Result<Frame, FrameError> {
        let [_, version, length, code, feedback, ph, pl, ch, cl, end] = *buf;
        if version != VERSION || length != LENGTH {
            return Err(FrameError::Header { version, length });
        }
        if end != END {
            return Err(FrameError::End(end));
        }
        let expected = checksum(&[version, length, code, feedback, ph, pl]);
        let found = u16::from_be_bytes([ch, cl]);
        if expected != found {
            return Err(FrameError::Checksum { expected, found });
        }
        Ok(Frame {
            code,
            feedback: feedback != 0,
            param: u16::from_be_bytes([ph, pl]),
        })
    }

    /// Keep everything from the next start marker after byte 0.
    fn resync(&mut self) {
        let next = self
            .buf
            .iter()
            .skip(1)
            .position(|b| *b == START)
            .map(|p| p.saturating_add(1));
        match next {
            Some(from) => {
                self.buf.copy_within(from.., 0);
                self.len = FRAME_LEN.saturating_sub(from);
            }
            None => self.len = 0,
        }
    }
}
