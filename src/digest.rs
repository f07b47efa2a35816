//! Content fingerprinting for the settings record plus the device id derivation.
//!
//! The digest guards against flash corruption, not against an attacker, so a fast
//! general-purpose checksum is enough. CRC-82/DARC gives the widest value the `crc`
//! crate computes in one pass; rendered as a fixed 32-character hex string it slots
//! straight into the record's sentinel field.

use crc::{CRC_82_DARC, Crc};

const FINGERPRINT: Crc<u128> = Crc::<u128>::new(&CRC_82_DARC);

const HEX: &[u8; 16] = b"0123456789abcdef";

/// A 32-character, lowercase hex fingerprint over an ordered byte concatenation.
/// Deterministic, no salt: the same input always yields the same digest.
#[derive(Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Digest([u8; 32]);

impl Digest {
    /// Fingerprints the concatenation of `parts` in order. Part boundaries do not
    /// contribute to the digest; the settings record relies on its fixed field
    /// order instead.
    pub fn over(parts: &[&[u8]]) -> Self {
        let mut digest = FINGERPRINT.digest();
        for part in parts {
            digest.update(part);
        }
        let value = digest.finalize();

        let mut out = [0u8; 32];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = HEX[((value >> ((31 - i) * 4)) & 0xF) as usize];
        }
        Self(out)
    }

    /// Reconstructs a digest from its 32 raw hex bytes, e.g. the sentinel field of
    /// a loaded record. No validation happens here: a garbled sentinel simply never
    /// compares equal to a computed digest.
    pub(crate) const fn from_raw(raw: [u8; 32]) -> Self {
        Self(raw)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // always ASCII on the `over` path; `from_raw` bytes are only compared
        core::str::from_utf8(&self.0).unwrap_or("<non-ascii digest>")
    }
}

impl core::fmt::Debug for Digest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Digest({})", self.as_str())
    }
}

/// Six uppercase hex characters identifying one physical device, derived from its
/// MAC address text. Appended to the hostname and the provisioning AP SSID so that
/// multiple nodes can coexist on one network.
#[derive(Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceId([u8; 6]);

impl DeviceId {
    /// Hashes the MAC address text and keeps the last six hex characters,
    /// uppercased. Stable for a given address.
    pub fn from_mac(mac: &str) -> Self {
        let digest = Digest::over(&[mac.as_bytes()]);
        let mut id = [0u8; 6];
        id.copy_from_slice(&digest.as_bytes()[26..]);
        for byte in &mut id {
            *byte = byte.to_ascii_uppercase();
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        // hex characters only
        unsafe { core::str::from_utf8_unchecked(&self.0) }
    }
}

impl core::fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "DeviceId({})", self.as_str())
    }
}

impl core::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
