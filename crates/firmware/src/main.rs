//! Folder Jukebox Firmware - Main Entry Point
//!
//! Hardware-only entry point for STM32H743ZI.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_stm32::dma::NoDma;
use embassy_stm32::gpio::{AnyPin, Input, Pull};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::time::Hertz;
use embassy_stm32::usart::{self, BufferedUart};
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_time::{Delay, Duration, Timer};

use firmware::hardware::{build_embassy_config, watchdog_timeout_us, EmbassyClock};
use firmware::{boot, ButtonBank, ButtonMapBuilder, DfPlayer, I2cEeprom, PollDriver};
use platform::config::{DFPLAYER_BAUD, POLL_INTERVAL_MS};
use platform::ChannelId;

// Logger + panic handler
use defmt_rtt as _;
use panic_probe as _;

bind_interrupts!(struct Irqs {
    USART2 => usart::BufferedInterruptHandler<peripherals::USART2>;
    I2C1_EV => i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER => i2c::ErrorInterruptHandler<peripherals::I2C1>;
});

/// Park the core after an unrecoverable init error; the watchdog is not yet
/// armed, so the error stays visible over RTT.
async fn halt() -> ! {
    loop {
        Timer::after(Duration::from_secs(1)).await;
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    defmt::info!("{=str} v{=str}", platform::config::APP_NAME, platform::config::APP_VERSION);
    let p = embassy_stm32::init(build_embassy_config());

    // ── Buttons ─────────────────────────────────────────────────────────────
    let input = match ButtonMapBuilder::reference_layout().build() {
        Ok(input) => input,
        Err(e) => {
            defmt::error!("invalid button map: {}", e);
            halt().await
        }
    };

    let pins: [(u8, Input<'static, AnyPin>); 9] = [
        (2, Input::new(p.PE2, Pull::Up).degrade()),
        (3, Input::new(p.PE3, Pull::Up).degrade()),
        (4, Input::new(p.PE4, Pull::Up).degrade()),
        (5, Input::new(p.PE5, Pull::Up).degrade()),
        (6, Input::new(p.PE6, Pull::Up).degrade()),
        (7, Input::new(p.PE7, Pull::Up).degrade()),
        (8, Input::new(p.PE8, Pull::Up).degrade()),
        (9, Input::new(p.PE9, Pull::Up).degrade()),
        (12, Input::new(p.PE10, Pull::Up).degrade()),
    ];
    let mut bank = ButtonBank::new();
    // Scan in map order so the first configured button wins a tie.
    let mut pins = pins.map(Some);
    for button in input.map.iter() {
        let wired = pins
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|(ch, _)| *ch == button.channel.get()))
            .and_then(Option::take);
        match wired {
            Some((channel, pin)) => {
                if let Err(e) = bank.add(ChannelId::new(channel), pin) {
                    defmt::error!("button bank: {}", e);
                    halt().await;
                }
            }
            None => defmt::warn!("channel {=u8} has no pin", button.channel.get()),
        }
    }

    // ── DFPlayer on USART2 ──────────────────────────────────────────────────
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = DFPLAYER_BAUD;
    let mut tx_buf = [0u8; 64];
    let mut rx_buf = [0u8; 128];
    let uart = match BufferedUart::new(
        p.USART2,
        Irqs,
        p.PD6, // RX
        p.PD5, // TX
        &mut tx_buf,
        &mut rx_buf,
        uart_config,
    ) {
        Ok(uart) => uart,
        Err(_) => {
            defmt::error!("USART2 configuration rejected");
            halt().await
        }
    };
    let mut device = DfPlayer::new(uart, EmbassyClock);

    // ── EEPROM on I2C1 ──────────────────────────────────────────────────────
    let i2c = I2c::new(
        p.I2C1,
        p.PB8, // SCL
        p.PB9, // SDA
        Irqs,
        NoDma,
        NoDma,
        Hertz(100_000),
        Default::default(),
    );
    let mut store = I2cEeprom::new(i2c, Delay);

    // ── Boot ────────────────────────────────────────────────────────────────
    let (session, report) = boot(&mut device, &mut store, &mut Delay);
    defmt::info!("boot report: {}", report);

    // The watchdog is armed only after boot: the reset settle alone takes a
    // second and every folder query may wait for the reply timeout.
    let mut watchdog = embassy_stm32::wdg::IndependentWatchdog::new(p.IWDG1, watchdog_timeout_us());
    watchdog.unleash();
    defmt::info!("IWDG watchdog armed: timeout={=u32}us", watchdog_timeout_us());

    let mut driver = PollDriver::new(bank, device, store, EmbassyClock, input, session);

    defmt::info!("Entering poll loop");
    let pause = Duration::from_millis(POLL_INTERVAL_MS);
    loop {
        if let Some(outcome) = driver.poll_once() {
            defmt::debug!("{}", outcome);
        }
        watchdog.pet();
        Timer::after(pause).await;
    }
}
