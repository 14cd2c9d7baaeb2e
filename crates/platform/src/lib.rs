//! Hardware Abstraction Layer (HAL) for the folder jukebox
//!
//! This crate provides the domain types and trait-based abstractions the
//! playback core is written against, enabling development and testing without
//! physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: boot, poll driver)
//!         ↓
//! Core (playback crate: debouncer, session)
//!         ↓
//! Platform HAL (this crate - types and trait abstractions)
//!         ↓
//! Drivers (DFPlayer serial link, I²C EEPROM, GPIO buttons)
//! ```
//!
//! # Abstractions
//!
//! - [`PlaybackDevice`] - Decoder module commands, queries and notifications
//! - [`PersistentStore`] - Byte storage surviving power loss
//! - [`RawInput`] - One reading of every button channel
//! - [`Monotonic`] - Millisecond clock sampled once per poll
//!
//! # Features
//!
//! - `std`: Enable standard library support (file-backed store, mocks)
//! - `defmt`: Enable defmt::Format derives for hardware logging
//!
//! # Example
//!
//! ```no_run
//! use platform::{PersistentStore, VolumeLevel, VOLUME_ADDR};
//!
//! fn saved_volume<S: PersistentStore>(store: &mut S) -> Option<VolumeLevel> {
//!     let raw = store.read_byte(VOLUME_ADDR).ok()?;
//!     VolumeLevel::try_new(raw).ok()
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)] // accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod audio_types;
pub mod clock;
pub mod config;
pub mod input;
pub mod mocks;
pub mod player;
pub mod storage;

#[cfg(feature = "std")]
pub mod storage_local;

// Re-export main types and traits
pub use audio_types::{OutOfRangeError, PlaylistId, TrackNumber, VolumeLevel};
pub use clock::Monotonic;
pub use input::{Button, ButtonMap, ButtonRole, ChannelId, ConfigError, RawInput};
pub use player::{DeviceErrorCode, DeviceNotification, PlaySources, PlaybackDevice};
pub use storage::{track_slot, PersistentStore, PLAYLIST_TRACK_BASE, VOLUME_ADDR};

#[cfg(feature = "std")]
pub use clock::StdClock;
