//! Folder Jukebox firmware
//!
//! Button-operated playlist player: six playlist buttons, previous-track and
//! volume buttons, a DFPlayer Mini decoder on a serial link and a small I²C
//! EEPROM remembering the last track of every playlist.
//!
//! # Architecture
//!
//! This firmware follows a layered architecture:
//!
//! ```text
//! Application Layer (main.rs, boot, driver)
//!         ↓
//! Core (playback crate: debouncer, session)
//!         ↓
//! Drivers (dfplayer, eeprom, input)
//!         ↓
//! Platform HAL (embedded-hal / embedded-io, Embassy on STM32)
//! ```
//!
//! # Features
//!
//! - `hardware` - Build for STM32H7 target (embassy, defmt)
//! - `emulator` - Build the headless desktop player (tracing)
//! - `std` - Enable standard library (for emulator and testing)
//!
//! # Examples
//!
//! ## Hardware Target
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf --features hardware
//! ```
//!
//! ## Emulator Target
//!
//! ```bash
//! cargo run --example headless_player --features emulator
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline (allow println in tests via clippy.toml)
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

#[macro_use]
mod fmt;

pub mod boot;
pub mod dfplayer;
pub mod driver;
pub mod eeprom;
pub mod input;

#[cfg(feature = "hardware")]
pub mod hardware;

// Re-export key types
pub use boot::{boot, BootReport};
pub use dfplayer::{DfPlayer, DfPlayerError};
pub use driver::PollDriver;
pub use eeprom::{EepromError, I2cEeprom};
pub use input::{ButtonBank, ButtonMapBuilder, InputConfig};
