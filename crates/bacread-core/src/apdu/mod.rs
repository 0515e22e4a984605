/// Confirmed-request and acknowledgement headers.
pub mod confirmed;
/// Error, Reject and Abort PDUs.
pub mod fault;
pub mod unconfirmed;

pub use confirmed::{ComplexAckHeader, ConfirmedRequestHeader, SimpleAck};
pub use fault::{AbortPdu, ErrorPdu, RejectPdu};
pub use unconfirmed::UnconfirmedRequestHeader;

use crate::DecodeError;

/// APDU type carried in the high nibble of the first octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ApduType {
    ConfirmedRequest = 0,
    UnconfirmedRequest = 1,
    SimpleAck = 2,
    ComplexAck = 3,
    SegmentAck = 4,
    Error = 5,
    Reject = 6,
    Abort = 7,
}

impl ApduType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::ConfirmedRequest),
            1 => Some(Self::UnconfirmedRequest),
            2 => Some(Self::SimpleAck),
            3 => Some(Self::ComplexAck),
            4 => Some(Self::SegmentAck),
            5 => Some(Self::Error),
            6 => Some(Self::Reject),
            7 => Some(Self::Abort),
            _ => None,
        }
    }

    /// Classifies a whole APDU by its first octet.
    pub fn of(apdu: &[u8]) -> Option<Self> {
        apdu.first().and_then(|b| Self::from_u8(b >> 4))
    }

    pub(crate) const fn header_bits(self) -> u8 {
        (self as u8) << 4
    }
}

pub(crate) fn expect_type(b0: u8, expected: ApduType) -> Result<(), DecodeError> {
    if b0 >> 4 == expected as u8 {
        Ok(())
    } else {
        Err(DecodeError::InvalidValue)
    }
}
