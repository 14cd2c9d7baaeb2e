//! Integration test: 24Cxx EEPROM store on a mock I²C bus.
//!
//! Run with: cargo test -p firmware --test eeprom

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use firmware::eeprom::DEFAULT_ADDRESS;
use firmware::{EepromError, I2cEeprom};
use platform::config::EEPROM_WRITE_CYCLE_MS;
use platform::{PersistentStore, VOLUME_ADDR};

/// Delay that adds up the time it was asked to wait.
#[derive(Default)]
struct TallyDelay {
    total_ns: u64,
}

impl DelayNs for TallyDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

#[test]
fn read_sets_word_address_then_reads() {
    let expectations = [I2cTransaction::write_read(
        DEFAULT_ADDRESS,
        vec![11],
        vec![4],
    )];
    let mut bus = I2cMock::new(&expectations);
    let mut store = I2cEeprom::new(bus.clone(), NoopDelay);

    assert_eq!(store.read_byte(11).unwrap(), 4);
    bus.done();
}

#[test]
fn write_sends_address_and_value_then_waits() {
    let expectations = [I2cTransaction::write(DEFAULT_ADDRESS, vec![20, 7])];
    let mut bus = I2cMock::new(&expectations);
    let mut store = I2cEeprom::new(bus.clone(), TallyDelay::default());

    store.write_byte(VOLUME_ADDR, 7).unwrap();
    let (_bus, delay) = store.release();
    assert!(delay.total_ns >= u64::from(EEPROM_WRITE_CYCLE_MS) * 1_000_000);
    bus.done();
}

#[test]
fn strapped_address_is_used() {
    let expectations = [I2cTransaction::write_read(0x53, vec![0], vec![0xFF])];
    let mut bus = I2cMock::new(&expectations);
    let mut store = I2cEeprom::with_address(bus.clone(), NoopDelay, 0x53);

    assert_eq!(store.read_byte(0).unwrap(), 0xFF);
    bus.done();
}

#[test]
fn address_past_the_chip_is_rejected_without_bus_traffic() {
    let mut bus = I2cMock::new(&[]);
    let mut store = I2cEeprom::new(bus.clone(), NoopDelay);

    assert!(matches!(
        store.read_byte(256),
        Err(EepromError::AddressOutOfRange(256))
    ));
    assert!(matches!(
        store.write_byte(1_000, 1),
        Err(EepromError::AddressOutOfRange(1_000))
    ));
    bus.done();
}

#[test]
fn bus_error_is_reported() {
    let expectations = [I2cTransaction::write(DEFAULT_ADDRESS, vec![12, 3])
        .with_error(ErrorKind::Other)];
    let mut bus = I2cMock::new(&expectations);
    let mut store = I2cEeprom::new(bus.clone(), NoopDelay);

    assert!(matches!(store.write_byte(12, 3), Err(EepromError::Bus(_))));
    bus.done();
}
