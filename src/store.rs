use crate::error::Error;
use crate::platform::Platform;
use crate::record::{ConfigurationRecord, FACTORY_PWD, FACTORY_SSID, RECORD_SIZE};
#[cfg(feature = "defmt")]
use defmt::{trace, warn};

/// Guards the configuration record against flash corruption: whatever is in memory
/// matches what is durably persisted (modulo explicit unsaved edits), and a damaged
/// flash image heals itself back to factory defaults on load.
///
/// The store owns the one live [`ConfigurationRecord`] of the process and a single
/// erase unit of the flash starting at `base_address`. Each operation performs a
/// full read or erase/write cycle against that region; the single-threaded host
/// guarantees no interleaving.
pub struct SettingsStore<T: Platform> {
    hal: T,
    base_address: u32,
    record: ConfigurationRecord,
}

impl<T: Platform> SettingsStore<T> {
    /// Creates a store over the erase unit at `base_address`. The in-memory record
    /// starts as factory defaults until [`SettingsStore::load`] is called.
    pub fn new(base_address: u32, hal: T) -> Result<Self, Error> {
        if !(base_address as usize).is_multiple_of(T::ERASE_SIZE) {
            return Err(Error::InvalidRegionOffset);
        }
        if RECORD_SIZE > T::ERASE_SIZE {
            return Err(Error::RegionTooSmall);
        }
        if base_address as usize + T::ERASE_SIZE > hal.capacity() {
            return Err(Error::RegionTooSmall);
        }

        Ok(Self {
            hal,
            base_address,
            record: ConfigurationRecord::factory(),
        })
    }

    /// Loads the record from flash and verifies its sentinel digest byte-for-byte.
    ///
    /// * Region still in its erased state: nothing was ever stored. Defaults stay
    ///   active, storage is left untouched, returns `Ok(false)`.
    /// * Digest mismatch or unparseable image: the region is wiped and the factory
    ///   defaults are persisted in its place, returns `Ok(false)`.
    /// * Digest matches: the loaded record becomes the active one, returns
    ///   `Ok(true)`.
    ///
    /// Corruption is never an error; only flash I/O failures are.
    pub fn load(&mut self) -> Result<bool, Error> {
        let mut buf = [0u8; RECORD_SIZE];
        self.hal
            .read(self.base_address, &mut buf)
            .map_err(|_| Error::FlashError)?;

        if buf.iter().all(|&b| b == 0xFF) {
            // erased flash, no prior content
            #[cfg(feature = "defmt")]
            trace!("settings region empty, keeping factory defaults");
            return Ok(false);
        }

        match ConfigurationRecord::from_bytes(&buf) {
            Ok(record) if record.digest_valid() => {
                self.record = record;
                Ok(true)
            }
            _ => {
                #[cfg(feature = "defmt")]
                warn!("stored settings footprint invalid, wiping and restoring defaults");
                self.reset()?;
                Ok(false)
            }
        }
    }

    /// Recomputes the sentinel digest and persists the whole record: full-region
    /// erase followed by one write of the record image. No partial-write paths.
    ///
    /// A failed save is reported to the caller, never retried here.
    pub fn save(&mut self) -> Result<(), Error> {
        self.record.refresh_digest();
        let buf = self.record.to_bytes();

        self.hal
            .erase(self.base_address, self.base_address + T::ERASE_SIZE as u32)
            .map_err(|_| Error::FlashError)?;
        self.hal
            .write(self.base_address, &buf)
            .map_err(|_| Error::FlashError)?;
        Ok(())
    }

    /// Overwrites every field, digest included, with factory defaults, then saves.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.record = ConfigurationRecord::factory();
        self.save()
    }

    /// Whether the current in-memory record still carries factory values — an
    /// indirect full-content comparison through the digest, not per field.
    pub fn is_factory_default(&self) -> bool {
        self.record.compute_digest() == ConfigurationRecord::factory().compute_digest()
    }

    /// Whether the network credentials were changed from their defaults. Both the
    /// SSID and the password must differ for the node to attempt a connection.
    pub fn is_network_configured(&self) -> bool {
        self.record.ssid() != FACTORY_SSID && self.record.pwd() != FACTORY_PWD
    }

    /// The active record, for rendering the web UI.
    pub fn record(&self) -> &ConfigurationRecord {
        &self.record
    }

    /// Mutable access for applying admin-page updates. Edits become durable on the
    /// next [`SettingsStore::save`].
    pub fn record_mut(&mut self) -> &mut ConfigurationRecord {
        &mut self.record
    }
}
