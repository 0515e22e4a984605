use crate::apdu::{expect_type, ApduType};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::types::MaxApdu;
use crate::{DecodeError, EncodeError};

const SEGMENTED: u8 = 0b0000_1000;
const MORE_FOLLOWS: u8 = 0b0000_0100;
const SEGMENTED_RESPONSE_ACCEPTED: u8 = 0b0000_0010;

/// Header of an unsegmented Confirmed-Request PDU.
///
/// Outgoing requests are never segmented; a segmented incoming request is
/// still decoded far enough to be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedRequestHeader {
    pub segmented: bool,
    pub segmented_response_accepted: bool,
    pub max_segments: u8,
    pub max_apdu: MaxApdu,
    pub invoke_id: u8,
    pub service_choice: u8,
}

impl ConfirmedRequestHeader {
    pub const fn new(invoke_id: u8, service_choice: u8, max_apdu: MaxApdu) -> Self {
        Self {
            segmented: false,
            segmented_response_accepted: false,
            max_segments: 0,
            max_apdu,
            invoke_id,
            service_choice,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if self.segmented || self.max_segments > 7 {
            return Err(EncodeError::ValueOutOfRange);
        }
        let mut b0 = ApduType::ConfirmedRequest.header_bits();
        if self.segmented_response_accepted {
            b0 |= SEGMENTED_RESPONSE_ACCEPTED;
        }
        w.write_u8(b0)?;
        w.write_u8((self.max_segments << 4) | self.max_apdu.to_u8())?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        expect_type(b0, ApduType::ConfirmedRequest)?;
        let segmented = b0 & SEGMENTED != 0;
        let seg_apdu = r.read_u8()?;
        let invoke_id = r.read_u8()?;
        if segmented {
            // sequence number, proposed window size
            r.read_exact(2)?;
        }
        let service_choice = r.read_u8()?;
        Ok(Self {
            segmented,
            segmented_response_accepted: b0 & SEGMENTED_RESPONSE_ACCEPTED != 0,
            max_segments: (seg_apdu >> 4) & 0x07,
            max_apdu: MaxApdu::from_u8(seg_apdu & 0x0F).ok_or(DecodeError::InvalidValue)?,
            invoke_id,
            service_choice,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexAckHeader {
    pub segmented: bool,
    pub more_follows: bool,
    pub invoke_id: u8,
    pub sequence_number: Option<u8>,
    pub proposed_window_size: Option<u8>,
    pub service_choice: u8,
}

impl ComplexAckHeader {
    pub const fn unsegmented(invoke_id: u8, service_choice: u8) -> Self {
        Self {
            segmented: false,
            more_follows: false,
            invoke_id,
            sequence_number: None,
            proposed_window_size: None,
            service_choice,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let mut b0 = ApduType::ComplexAck.header_bits();
        if self.segmented {
            b0 |= SEGMENTED;
        }
        if self.more_follows {
            b0 |= MORE_FOLLOWS;
        }
        w.write_u8(b0)?;
        w.write_u8(self.invoke_id)?;
        if self.segmented {
            w.write_u8(self.sequence_number.unwrap_or(0))?;
            w.write_u8(self.proposed_window_size.unwrap_or(1))?;
        }
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        expect_type(b0, ApduType::ComplexAck)?;
        let segmented = b0 & SEGMENTED != 0;
        let invoke_id = r.read_u8()?;
        let (sequence_number, proposed_window_size) = if segmented {
            (Some(r.read_u8()?), Some(r.read_u8()?))
        } else {
            (None, None)
        };
        Ok(Self {
            segmented,
            more_follows: b0 & MORE_FOLLOWS != 0,
            invoke_id,
            sequence_number,
            proposed_window_size,
            service_choice: r.read_u8()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleAck {
    pub invoke_id: u8,
    pub service_choice: u8,
}

impl SimpleAck {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(ApduType::SimpleAck.header_bits())?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        expect_type(r.read_u8()?, ApduType::SimpleAck)?;
        Ok(Self {
            invoke_id: r.read_u8()?,
            service_choice: r.read_u8()?,
        })
    }
}
