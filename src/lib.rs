#![doc = include_str!("../README.md")]
#![cfg_attr(not(target_arch = "x86_64"), no_std)]

pub mod digest;
pub mod error;
pub mod net;
pub mod platform;
mod record;
pub mod signal;
mod store;

extern crate alloc;

use core::fmt;

/// A fixed-width, NUL-terminated string field as it lives inside the persisted
/// configuration record. `N` is the on-wire width including the terminator, so a
/// `FixedStr<33>` holds up to 32 bytes of text.
///
/// Unused trailing bytes are NUL so that the wire image of a record is fully
/// determined by its field values.
#[derive(Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedStr<const N: usize>([u8; N]);

impl<const N: usize> FixedStr<N> {
    /// Creates a field from a string literal, padding with NUL bytes.
    ///
    /// Panics (at compile time when used in a const context) if the text does not
    /// leave room for the terminator. Used for the factory defaults:
    ///   `const SSID: FixedStr<33> = FixedStr::from_str("SET_ME");`
    pub const fn from_str(s: &str) -> Self {
        let src = s.as_bytes();
        assert!(src.len() < N);
        let mut dst = [0u8; N];
        let mut i = 0;
        while i < src.len() {
            dst[i] = src[i];
            i += 1;
        }
        Self(dst)
    }

    /// Fallible runtime constructor. Returns [`error::Error::ValueTooLong`] when the
    /// text plus terminator would not fit the field width.
    pub fn new(s: &str) -> Result<Self, error::Error> {
        if s.len() >= N {
            return Err(error::Error::ValueTooLong);
        }
        Ok(Self::from_str(s))
    }

    /// Reads a field back from its wire representation. The slice must be exactly
    /// `N` bytes, contain a NUL terminator and hold valid UTF-8 up to it.
    pub(crate) fn from_wire(raw: &[u8]) -> Result<Self, error::Error> {
        if raw.len() != N {
            return Err(error::Error::CorruptedData);
        }
        let end = raw
            .iter()
            .position(|&b| b == 0)
            .ok_or(error::Error::CorruptedData)?;
        core::str::from_utf8(&raw[..end]).map_err(|_| error::Error::CorruptedData)?;

        let mut dst = [0u8; N];
        dst[..end].copy_from_slice(&raw[..end]);
        Ok(Self(dst))
    }

    /// The text up to the NUL terminator.
    pub fn as_str(&self) -> &str {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(N);
        // contents are validated UTF-8 on every construction path
        unsafe { core::str::from_utf8_unchecked(&self.0[..end]) }
    }

    /// The full `N`-byte wire image, NUL padding included.
    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedStr({:?})", self.as_str())
    }
}

impl<const N: usize> fmt::Display for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> AsRef<str> for FixedStr<N> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

pub use digest::{DeviceId, Digest};
pub use error::Error;
pub use record::{ConfigurationRecord, RECORD_SIZE};
pub use signal::{IpSignaler, SignalMode, Step};
pub use store::SettingsStore;
