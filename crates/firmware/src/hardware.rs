//! STM32H743 board support: clocks, watchdog and the millisecond clock.
//!
//! # Pin assignments
//!
//! | Signal            | MCU pin | Channel | Notes                        |
//! |-------------------|---------|---------|------------------------------|
//! | Volume down       | PE2     | 2       | Active-low, internal pull-up |
//! | Volume up         | PE3     | 3       | Active-low, internal pull-up |
//! | Previous          | PE4     | 4       | Active-low, internal pull-up |
//! | Playlist 1–5      | PE5–PE9 | 5–9     | Active-low, internal pull-up |
//! | Playlist 6        | PE10    | 12      | Active-low, internal pull-up |
//! | DFPlayer RX ← TX  | PD5     |         | USART2 TX, 9600 8N1          |
//! | DFPlayer TX → RX  | PD6     |         | USART2 RX                    |
//! | EEPROM SCL        | PB8     |         | I2C1, 100 kHz                |
//! | EEPROM SDA        | PB9     |         | I2C1                         |
//!
//! Channel numbers follow the reference board, so [`platform::ButtonMap::default_layout`]
//! applies unchanged.

use platform::Monotonic;

/// Watchdog period. Covers the longest poll cycle: a finished-track query and
/// a button query back to back, each bounded by the decoder reply timeout.
pub const WATCHDOG_TIMEOUT_MS: u32 = 4_000;

/// Watchdog period in the microseconds `IndependentWatchdog` expects.
pub const fn watchdog_timeout_us() -> u32 {
    WATCHDOG_TIMEOUT_MS.saturating_mul(1_000)
}

/// Clock tree: HSI 64 MHz → PLL1 → 400 MHz system clock, 100 MHz APBs.
pub fn build_embassy_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc::*;

    let mut config = embassy_stm32::Config::default();

    config.rcc.hsi = Some(HSIPrescaler::DIV1);
    config.rcc.csi = true;

    // HSI (64 MHz) / 4 = 16 MHz × 50 = 800 MHz VCO, P = 400 MHz, Q = 200 MHz
    config.rcc.pll1 = Some(Pll {
        source: PllSource::HSI,
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL50,
        divp: Some(PllDiv::DIV2),
        divq: Some(PllDiv::DIV4),
        divr: None,
    });

    config.rcc.sys = Sysclk::PLL1_P;
    config.rcc.ahb_pre = AHBPrescaler::DIV2;
    config.rcc.apb1_pre = APBPrescaler::DIV2;
    config.rcc.apb2_pre = APBPrescaler::DIV2;
    config.rcc.apb3_pre = APBPrescaler::DIV2;
    config.rcc.apb4_pre = APBPrescaler::DIV2;
    config.rcc.voltage_scale = VoltageScale::Scale1;

    config
}

/// [`Monotonic`] over the Embassy time driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Monotonic for EmbassyClock {
    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }
}
