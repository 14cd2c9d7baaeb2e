//! File-backed persistent store for the desktop emulator.
//!
//! `FileStore` implements [`PersistentStore`] on top of a fixed-size image
//! file, one byte per address. A new image is filled with `0xFF` so a first
//! run sees the same content as an erased EEPROM.
//! Used when the `std` feature is enabled (emulator builds only).

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::config::STORE_SIZE;
use crate::storage::PersistentStore;

/// Error type for the file-backed store.
#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    /// Underlying file operation failed
    #[error("store image I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Address beyond the store size
    #[error("address {0} outside store")]
    AddressOutOfRange(u16),
}

/// A [`PersistentStore`] backed by an image file.
///
/// # Example
/// ```no_run
/// use platform::storage_local::FileStore;
/// use platform::PersistentStore;
///
/// let mut store = FileStore::open("jukebox.eeprom").unwrap();
/// store.write_byte(20, 5).unwrap();
/// ```
pub struct FileStore {
    file: File,
}

impl FileStore {
    /// Open the image at `path`, creating and erasing it if missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FileStoreError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        let len = file.metadata()?.len();
        if len < u64::from(STORE_SIZE) {
            let missing = usize::try_from(u64::from(STORE_SIZE).saturating_sub(len))
                .unwrap_or_default();
            file.seek(SeekFrom::End(0))?;
            file.write_all(&vec![0xFF; missing])?;
            file.sync_data()?;
        }
        Ok(Self { file })
    }

    fn seek_to(&mut self, addr: u16) -> Result<(), FileStoreError> {
        if addr >= STORE_SIZE {
            return Err(FileStoreError::AddressOutOfRange(addr));
        }
        self.file.seek(SeekFrom::Start(u64::from(addr)))?;
        Ok(())
    }
}

impl PersistentStore for FileStore {
    type Error = FileStoreError;

    fn read_byte(&mut self, addr: u16) -> Result<u8, Self::Error> {
        self.seek_to(addr)?;
        let mut byte = [0u8; 1];
        self.file.read_exact(&mut byte)?;
        let [value] = byte;
        Ok(value)
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), Self::Error> {
        self.seek_to(addr)?;
        self.file.write_all(&[value])?;
        self.file.sync_data()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn fresh_image_reads_erased() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("fresh.eeprom")).unwrap();
        assert_eq!(store.read_byte(0).unwrap(), 0xFF);
        assert_eq!(store.read_byte(STORE_SIZE - 1).unwrap(), 0xFF);
    }

    #[test]
    fn written_bytes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persist.eeprom");
        {
            let mut store = FileStore::open(&path).unwrap();
            store.write_byte(12, 3).unwrap();
            store.write_byte(20, 7).unwrap();
        }
        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.read_byte(12).unwrap(), 3);
        assert_eq!(store.read_byte(20).unwrap(), 7);
        assert_eq!(store.read_byte(13).unwrap(), 0xFF);
    }

    #[test]
    fn address_past_end_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("bounds.eeprom")).unwrap();
        assert!(matches!(
            store.read_byte(STORE_SIZE),
            Err(FileStoreError::AddressOutOfRange(a)) if a == STORE_SIZE
        ));
    }
}
