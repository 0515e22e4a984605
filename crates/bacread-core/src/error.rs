use core::fmt;

/// Failure while writing a frame into a caller-owned buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The output buffer has no room for the next field.
    BufferTooSmall,
    /// A field value does not fit its wire representation.
    ValueOutOfRange,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall => f.write_str("output buffer too small"),
            Self::ValueOutOfRange => f.write_str("value out of range for its encoding"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

/// Failure while parsing a received frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    UnexpectedEof,
    InvalidTag,
    InvalidLength,
    InvalidValue,
    /// Well-formed but outside what this reader handles (e.g. a non-UTF-8 charset).
    Unsupported,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => f.write_str("frame ended early"),
            Self::InvalidTag => f.write_str("unexpected tag"),
            Self::InvalidLength => f.write_str("invalid length field"),
            Self::InvalidValue => f.write_str("invalid field value"),
            Self::Unsupported => f.write_str("unsupported encoding"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}
