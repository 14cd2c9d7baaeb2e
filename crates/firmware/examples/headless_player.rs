//! Headless desktop player.
//!
//! Runs the real boot sequence and poll driver against a simulated decoder,
//! a scripted keypad and an EEPROM image file, on simulated time. Every
//! transition is logged through `tracing`.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example headless_player --features emulator -- /tmp/jukebox.eeprom
//! ```
//!
//! Run it twice with the same image to watch the stored tracks and volume
//! come back.

use embedded_hal::delay::DelayNs;
use firmware::{boot, ButtonMapBuilder, PollDriver};
use platform::mocks::{MockClock, MockDevice, MockKeypad};
use platform::storage_local::FileStore;
use platform::{ChannelId, DeviceNotification, Monotonic, PlaySources};
use tracing_subscriber::EnvFilter;

/// Folder sizes of playlists 1..=6.
const FOLDERS: [u16; 6] = [12, 4, 0, 7, 25, 3];

/// What happens at a given simulated millisecond.
#[derive(Debug, Clone, Copy)]
enum Step {
    Press(u8),
    Release,
    TrackFinished,
}

/// A short session: volume up twice, playlist 2, skip within it, finish a
/// track, go back, restart, try the empty playlist 3, then playlist 5.
const SCRIPT: &[(u64, Step)] = &[
    (100, Step::Press(3)),
    (200, Step::Release),
    (400, Step::Press(3)),
    (500, Step::Release),
    (1_000, Step::Press(6)),
    (1_120, Step::Release),
    (2_000, Step::Press(6)),
    (2_080, Step::Release),
    (30_000, Step::TrackFinished),
    (31_000, Step::Press(4)),
    (31_100, Step::Release),
    (32_000, Step::Press(4)),
    (32_100, Step::Release),
    (40_000, Step::Press(7)),
    (40_100, Step::Release),
    (41_000, Step::Press(9)),
    (41_090, Step::Release),
];

/// Delay that moves simulated time instead of sleeping.
struct SimDelay(MockClock);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.advance(u64::from(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.advance(u64::from(ms));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args()
        .nth(1)
        .map_or_else(|| std::env::temp_dir().join("jukebox.eeprom"), Into::into);
    tracing::info!("store image: {}", path.display());

    let clock = MockClock::new();
    let keypad = MockKeypad::new();
    let device = MockDevice::with_folders(&FOLDERS);
    let mut store = FileStore::open(&path)?;

    let (session, report) = boot(&mut device.clone(), &mut store, &mut SimDelay(clock.clone()));
    tracing::info!(?report, "booted");

    let input = ButtonMapBuilder::reference_layout().build()?;
    let mut driver = PollDriver::new(
        keypad.clone(),
        device.clone(),
        store,
        clock.clone(),
        input,
        session,
    );

    let start = clock.now_ms();
    let end = SCRIPT.last().map_or(0, |(at, _)| *at).saturating_add(500);
    let mut script = SCRIPT.iter().peekable();
    for t in 0..end {
        while let Some((_, step)) = script.next_if(|(at, _)| *at == t) {
            match step {
                Step::Press(channel) => keypad.press(ChannelId::new(*channel)),
                Step::Release => keypad.release(),
                Step::TrackFinished => {
                    let track = driver.session().state().track.get();
                    device.notify(DeviceNotification::PlaybackFinished {
                        source: PlaySources::SD,
                        track: u16::from(track),
                    });
                }
            }
        }
        clock.set(start.saturating_add(t));
        if let Some(outcome) = driver.poll_once() {
            tracing::info!(?outcome, at_ms = t, "transition");
        }
    }

    let state = driver.session().state();
    tracing::info!(
        playlist = state.playlist.get(),
        track = state.track.get(),
        volume = state.volume.get(),
        "final state"
    );
    Ok(())
}
