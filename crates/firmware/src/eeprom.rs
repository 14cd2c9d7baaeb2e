//! 24Cxx I²C EEPROM as a [`PersistentStore`].
//!
//! A 24C02 holds 256 bytes behind a one-byte word address. Reads set the
//! address pointer and read one byte back; writes send address and value in
//! one transfer, after which the chip ignores the bus for its internal write
//! cycle.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use platform::config::{EEPROM_WRITE_CYCLE_MS, STORE_SIZE};
use platform::PersistentStore;

/// 7-bit bus address with A0..A2 tied low.
pub const DEFAULT_ADDRESS: u8 = 0x50;

/// Errors from the EEPROM store.
#[derive(Debug, thiserror::Error)]
pub enum EepromError<E> {
    /// The bus transfer failed (NACK, arbitration loss, ...).
    #[error("i2c error: {0:?}")]
    Bus(E),
    /// Address past the end of the chip.
    #[error("address {0} outside the EEPROM array")]
    AddressOutOfRange(u16),
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for EepromError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Bus(_) => defmt::write!(f, "Bus"),
            Self::AddressOutOfRange(addr) => defmt::write!(f, "AddressOutOfRange({=u16})", addr),
        }
    }
}

/// 24C02-class EEPROM on bus `I`, waiting out write cycles with `D`.
pub struct I2cEeprom<I, D> {
    i2c: I,
    delay: D,
    address: u8,
}

impl<I: I2c, D: DelayNs> I2cEeprom<I, D> {
    /// EEPROM at [`DEFAULT_ADDRESS`].
    pub fn new(i2c: I, delay: D) -> Self {
        Self::with_address(i2c, delay, DEFAULT_ADDRESS)
    }

    /// EEPROM at a strapped bus address.
    pub fn with_address(i2c: I, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Give back the bus and delay.
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    fn word_address(addr: u16) -> Result<u8, EepromError<I::Error>> {
        if addr >= STORE_SIZE {
            return Err(EepromError::AddressOutOfRange(addr));
        }
        u8::try_from(addr).map_err(|_| EepromError::AddressOutOfRange(addr))
    }
}

impl<I: I2c, D: DelayNs> PersistentStore for I2cEeprom<I, D> {
    type Error = EepromError<I::Error>;

    fn read_byte(&mut self, addr: u16) -> Result<u8, Self::Error> {
        let word = Self::word_address(addr)?;
        let mut value = [0u8; 1];
        self.i2c
            .write_read(self.address, &[word], &mut value)
            .map_err(EepromError::Bus)?;
        let [value] = value;
        Ok(value)
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), Self::Error> {
        let word = Self::word_address(addr)?;
        self.i2c
            .write(self.address, &[word, value])
            .map_err(EepromError::Bus)?;
        self.delay.delay_ms(EEPROM_WRITE_CYCLE_MS);
        Ok(())
    }
}
