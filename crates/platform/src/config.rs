//! Application configuration and constants
//!
//! Central timing, range and wiring values used across the workspace. Drivers
//! and the state machine reference these rather than hardcoding numbers.

/// The application name
pub const APP_NAME: &str = "Folder Jukebox";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ── Input ────────────────────────────────────────────────────────────────────

/// A raw button reading must stay unchanged this long before it is accepted.
pub const DEBOUNCE_MS: u64 = 50;

/// Pause between two poll cycles of the main loop.
pub const POLL_INTERVAL_MS: u64 = 1;

/// Upper bound on configured buttons (3 transport + 6 playlists).
pub const MAX_BUTTONS: usize = 9;

// ── Playback ─────────────────────────────────────────────────────────────────

/// Number of playlist buttons, and therefore decoder folders in use.
pub const PLAYLIST_COUNT: u8 = 6;

/// A second "previous" press within this window restarts the current track.
pub const PREVIOUS_WINDOW_MS: u64 = 5_000;

/// Loudest volume level.
pub const MAX_VOLUME: u8 = 10;

/// Volume used when the persisted byte is out of range (fresh EEPROM reads 0xFF).
pub const DEFAULT_VOLUME: u8 = 3;

// ── Decoder module ───────────────────────────────────────────────────────────

/// Serial link speed of the DFPlayer Mini.
pub const DFPLAYER_BAUD: u32 = 9_600;

/// Longest wait for the reply to a decoder query.
pub const DFPLAYER_REPLY_TIMEOUT_MS: u64 = 900;

/// Settle time after a decoder reset before it accepts commands.
pub const RESET_SETTLE_MS: u32 = 1_000;

/// Settle time after restoring the volume at boot.
pub const VOLUME_SETTLE_MS: u32 = 200;

/// A second "finished" report for the same track within this window is a
/// repeat from the module, not a new event.
pub const FINISHED_DEDUP_MS: u64 = 1_000;

/// Depth of the decoder notification inbox.
pub const NOTIFICATION_DEPTH: usize = 8;

// ── Persistent storage ───────────────────────────────────────────────────────

/// Bytes addressable in the persistent store (24C02 EEPROM).
pub const STORE_SIZE: u16 = 256;

/// 24C02 internal write cycle time.
pub const EEPROM_WRITE_CYCLE_MS: u32 = 5;
