use crate::apdu::{expect_type, ApduType};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnconfirmedRequestHeader {
    pub service_choice: u8,
}

impl UnconfirmedRequestHeader {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(ApduType::UnconfirmedRequest.header_bits())?;
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        expect_type(r.read_u8()?, ApduType::UnconfirmedRequest)?;
        Ok(Self {
            service_choice: r.read_u8()?,
        })
    }
}
