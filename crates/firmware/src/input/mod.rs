//! Button input.
//!
//! | Piece                 | Role                                   |
//! |-----------------------|----------------------------------------|
//! | [`ButtonBank`]        | GPIO pins → first pressed channel      |
//! | [`ButtonMapBuilder`]  | channel → role wiring + debounce window |
//!
//! The bank implements [`platform::RawInput`], so the poll driver runs the
//! same way over real pins and over `platform::mocks::MockKeypad`.

pub use platform::{Button, ButtonMap, ButtonRole, ChannelId, RawInput};

/// Fluent builder API for the button wiring.
pub mod builder;
pub use builder::{ButtonMapBuilder, InputConfig};

/// Active-low GPIO button bank.
pub mod scan;
pub use scan::{BankError, ButtonBank};
