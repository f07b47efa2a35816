use thiserror::Error;

/// Errors that can occur while working with the settings region or a blink request.
/// Marked non-exhaustive to allow additions without breaking the API.
///
/// Note that a corrupted settings record is *not* reported through this type: the
/// store heals it on load by falling back to factory defaults. `CorruptedData` only
/// shows up when parsing a record image directly.
#[derive(Error, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The settings region offset has to be aligned to the flash erase unit.
    #[error("invalid region offset")]
    InvalidRegionOffset,

    /// The flash is too small for the settings region, or the erase unit is too
    /// small to hold one configuration record.
    #[error("region too small")]
    RegionTooSmall,

    /// The internal error value is returned from the flash backend.
    #[error("internal flash error")]
    FlashError,

    /// A field value plus its NUL terminator would not fit the fixed field width.
    /// The prior value is retained.
    #[error("value too long")]
    ValueTooLong,

    /// A record image is structurally invalid: missing terminator, bad UTF-8 or an
    /// unrecognized unit flag text.
    #[error("corrupted data")]
    CorruptedData,
}
