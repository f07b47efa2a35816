//! The persisted configuration record and its on-wire layout.
//!
//! The layout is a fixed-width, sequential field contract — no padding beyond the
//! declared field widths, every string NUL-terminated and NUL-padded:
//!
//! | field      | width | offset |
//! |------------|-------|--------|
//! | ssid       | 33    | 0      |
//! | pwd        | 64    | 33     |
//! | admin_user | 13    | 97     |
//! | admin_pwd  | 13    | 110    |
//! | title      | 51    | 123    |
//! | heading    | 51    | 174    |
//! | is_celsius | 6     | 225    |
//! | sentinel   | 33    | 231    |
//!
//! `is_celsius` stores the literal text `"true"` or `"false"`. `sentinel` stores the
//! 32-character hex digest over all preceding field values plus a NUL terminator.

use crate::FixedStr;
use crate::digest::Digest;
use crate::error::Error;

pub(crate) const SSID_WIDTH: usize = 33; // 32 chars is max SSID size + 1 NUL
pub(crate) const PWD_WIDTH: usize = 64; // 63 chars is max passphrase size + 1 NUL
pub(crate) const ADMIN_USER_WIDTH: usize = 13;
pub(crate) const ADMIN_PWD_WIDTH: usize = 13;
pub(crate) const TITLE_WIDTH: usize = 51;
pub(crate) const HEADING_WIDTH: usize = 51;
pub(crate) const UNIT_FLAG_WIDTH: usize = 6; // fits "false" + NUL
pub(crate) const SENTINEL_WIDTH: usize = 33; // 32 hex chars + NUL

const SSID_OFFSET: usize = 0;
const PWD_OFFSET: usize = SSID_OFFSET + SSID_WIDTH;
const ADMIN_USER_OFFSET: usize = PWD_OFFSET + PWD_WIDTH;
const ADMIN_PWD_OFFSET: usize = ADMIN_USER_OFFSET + ADMIN_USER_WIDTH;
const TITLE_OFFSET: usize = ADMIN_PWD_OFFSET + ADMIN_PWD_WIDTH;
const HEADING_OFFSET: usize = TITLE_OFFSET + TITLE_WIDTH;
const UNIT_FLAG_OFFSET: usize = HEADING_OFFSET + HEADING_WIDTH;
const SENTINEL_OFFSET: usize = UNIT_FLAG_OFFSET + UNIT_FLAG_WIDTH;

/// Total wire size of one record.
pub const RECORD_SIZE: usize = SENTINEL_OFFSET + SENTINEL_WIDTH;

// Keeps record writes aligned on backends with a 4-byte write unit.
const _: () = assert!(RECORD_SIZE.is_multiple_of(4), "record size must be word aligned");

pub(crate) const FACTORY_SSID: &str = "SET_ME";
pub(crate) const FACTORY_PWD: &str = "SET_ME";
const FACTORY_ADMIN_USER: &str = "admin";
const FACTORY_ADMIN_PWD: &str = "admin";
const FACTORY_TITLE: &str = "TempNode Sensor";
const FACTORY_HEADING: &str = "Temp Info";
const FACTORY_IS_CELSIUS: bool = false;

const FLAG_TRUE: &str = "true";
const FLAG_FALSE: &str = "false";

const fn flag_text(is_celsius: bool) -> &'static str {
    if is_celsius { FLAG_TRUE } else { FLAG_FALSE }
}

/// The one settings entity the node persists. Exactly one live instance exists per
/// running process, owned by [`crate::SettingsStore`].
///
/// The embedded digest is only guaranteed to match the field values after
/// [`ConfigurationRecord::refresh_digest`], which the store runs on every save.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigurationRecord {
    ssid: FixedStr<SSID_WIDTH>,
    pwd: FixedStr<PWD_WIDTH>,
    admin_user: FixedStr<ADMIN_USER_WIDTH>,
    admin_pwd: FixedStr<ADMIN_PWD_WIDTH>,
    title: FixedStr<TITLE_WIDTH>,
    heading: FixedStr<HEADING_WIDTH>,
    is_celsius: bool,
    digest: Digest,
}

impl ConfigurationRecord {
    /// The compile-time factory baseline, digest already consistent.
    pub fn factory() -> Self {
        let mut record = Self {
            ssid: const { FixedStr::from_str(FACTORY_SSID) },
            pwd: const { FixedStr::from_str(FACTORY_PWD) },
            admin_user: const { FixedStr::from_str(FACTORY_ADMIN_USER) },
            admin_pwd: const { FixedStr::from_str(FACTORY_ADMIN_PWD) },
            title: const { FixedStr::from_str(FACTORY_TITLE) },
            heading: const { FixedStr::from_str(FACTORY_HEADING) },
            is_celsius: FACTORY_IS_CELSIUS,
            digest: Digest::over(&[]),
        };
        record.refresh_digest();
        record
    }

    pub fn ssid(&self) -> &str {
        self.ssid.as_str()
    }

    /// Replaces the SSID. Input that would not fit the 33-byte field (terminator
    /// included) is rejected with [`Error::ValueTooLong`] and the prior value stays.
    /// All other setters follow the same policy.
    pub fn set_ssid(&mut self, ssid: &str) -> Result<(), Error> {
        self.ssid = FixedStr::new(ssid)?;
        Ok(())
    }

    pub fn pwd(&self) -> &str {
        self.pwd.as_str()
    }

    pub fn set_pwd(&mut self, pwd: &str) -> Result<(), Error> {
        self.pwd = FixedStr::new(pwd)?;
        Ok(())
    }

    pub fn admin_user(&self) -> &str {
        self.admin_user.as_str()
    }

    pub fn set_admin_user(&mut self, user: &str) -> Result<(), Error> {
        self.admin_user = FixedStr::new(user)?;
        Ok(())
    }

    pub fn admin_pwd(&self) -> &str {
        self.admin_pwd.as_str()
    }

    pub fn set_admin_pwd(&mut self, pwd: &str) -> Result<(), Error> {
        self.admin_pwd = FixedStr::new(pwd)?;
        Ok(())
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), Error> {
        self.title = FixedStr::new(title)?;
        Ok(())
    }

    pub fn heading(&self) -> &str {
        self.heading.as_str()
    }

    pub fn set_heading(&mut self, heading: &str) -> Result<(), Error> {
        self.heading = FixedStr::new(heading)?;
        Ok(())
    }

    pub fn is_celsius(&self) -> bool {
        self.is_celsius
    }

    pub fn set_is_celsius(&mut self, is_celsius: bool) {
        self.is_celsius = is_celsius;
    }

    /// The digest currently embedded in the record, i.e. the sentinel as loaded or
    /// as written on the last save.
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Fingerprints the current field values in wire order. The flag contributes
    /// its literal text, exactly as persisted.
    pub fn compute_digest(&self) -> Digest {
        Digest::over(&[
            self.ssid.as_str().as_bytes(),
            self.pwd.as_str().as_bytes(),
            self.admin_user.as_str().as_bytes(),
            self.admin_pwd.as_str().as_bytes(),
            self.title.as_str().as_bytes(),
            self.heading.as_str().as_bytes(),
            flag_text(self.is_celsius).as_bytes(),
        ])
    }

    pub fn refresh_digest(&mut self) {
        self.digest = self.compute_digest();
    }

    /// Whether the embedded digest matches the field values. A record loaded from
    /// flash that fails this check is corrupt.
    pub fn digest_valid(&self) -> bool {
        self.digest == self.compute_digest()
    }

    /// Serializes to the fixed wire layout. NUL padding everywhere, so the image is
    /// a pure function of the field values.
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        buf[SSID_OFFSET..PWD_OFFSET].copy_from_slice(self.ssid.as_bytes());
        buf[PWD_OFFSET..ADMIN_USER_OFFSET].copy_from_slice(self.pwd.as_bytes());
        buf[ADMIN_USER_OFFSET..ADMIN_PWD_OFFSET].copy_from_slice(self.admin_user.as_bytes());
        buf[ADMIN_PWD_OFFSET..TITLE_OFFSET].copy_from_slice(self.admin_pwd.as_bytes());
        buf[TITLE_OFFSET..HEADING_OFFSET].copy_from_slice(self.title.as_bytes());
        buf[HEADING_OFFSET..UNIT_FLAG_OFFSET].copy_from_slice(self.heading.as_bytes());
        buf[UNIT_FLAG_OFFSET..UNIT_FLAG_OFFSET + flag_text(self.is_celsius).len()]
            .copy_from_slice(flag_text(self.is_celsius).as_bytes());
        buf[SENTINEL_OFFSET..SENTINEL_OFFSET + 32].copy_from_slice(self.digest.as_bytes());
        buf
    }

    /// Parses a wire image. Structural damage (missing NUL, invalid UTF-8, a unit
    /// flag that is neither `"true"` nor `"false"`) is reported as `CorruptedData`;
    /// whether the sentinel matches the content is a separate question answered by
    /// [`ConfigurationRecord::digest_valid`].
    pub fn from_bytes(raw: &[u8; RECORD_SIZE]) -> Result<Self, Error> {
        let unit_flag: FixedStr<UNIT_FLAG_WIDTH> =
            FixedStr::from_wire(&raw[UNIT_FLAG_OFFSET..SENTINEL_OFFSET])?;
        let is_celsius = match unit_flag.as_str() {
            FLAG_TRUE => true,
            FLAG_FALSE => false,
            _ => return Err(Error::CorruptedData),
        };

        if raw[SENTINEL_OFFSET + 32] != 0 {
            return Err(Error::CorruptedData);
        }
        let mut sentinel = [0u8; 32];
        sentinel.copy_from_slice(&raw[SENTINEL_OFFSET..SENTINEL_OFFSET + 32]);

        Ok(Self {
            ssid: FixedStr::from_wire(&raw[SSID_OFFSET..PWD_OFFSET])?,
            pwd: FixedStr::from_wire(&raw[PWD_OFFSET..ADMIN_USER_OFFSET])?,
            admin_user: FixedStr::from_wire(&raw[ADMIN_USER_OFFSET..ADMIN_PWD_OFFSET])?,
            admin_pwd: FixedStr::from_wire(&raw[ADMIN_PWD_OFFSET..TITLE_OFFSET])?,
            title: FixedStr::from_wire(&raw[TITLE_OFFSET..HEADING_OFFSET])?,
            heading: FixedStr::from_wire(&raw[HEADING_OFFSET..UNIT_FLAG_OFFSET])?,
            is_celsius,
            digest: Digest::from_raw(sentinel),
        })
    }
}
