use crate::apdu::{expect_type, ApduType};
use crate::encoding::{
    primitives::{decode_unsigned, encode_app_enumerated},
    reader::Reader,
    tag::{AppTag, Tag},
    writer::Writer,
};
use crate::types::{AbortReason, ErrorClass, ErrorCode, RejectReason};
use crate::{DecodeError, EncodeError};

/// An Error-PDU. Class and code are absent when the peer sent neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPdu {
    pub invoke_id: u8,
    pub service_choice: u8,
    pub error_class: Option<ErrorClass>,
    pub error_code: Option<ErrorCode>,
}

impl ErrorPdu {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(ApduType::Error.header_bits())?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)?;
        if let (Some(class), Some(code)) = (self.error_class, self.error_code) {
            encode_app_enumerated(w, class.to_u32())?;
            encode_app_enumerated(w, code.to_u32())?;
        }
        Ok(())
    }

    /// Accepts application-enumerated or context-tagged class/code, bare or
    /// wrapped in an opening/closing tag 0.
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        expect_type(r.read_u8()?, ApduType::Error)?;
        let invoke_id = r.read_u8()?;
        let service_choice = r.read_u8()?;
        let mut error_class = None;
        let mut error_code = None;
        if !r.is_empty() {
            let (first, wrapped) = match Tag::decode(r)? {
                Tag::Opening { tag_num: 0 } => (Tag::decode(r)?, true),
                tag => (tag, false),
            };
            error_class = Some(ErrorClass::from_u32(error_field(r, first, 0)?));
            let second = Tag::decode(r)?;
            error_code = Some(ErrorCode::from_u32(error_field(r, second, 1)?));
            if wrapped && Tag::decode(r)? != (Tag::Closing { tag_num: 0 }) {
                return Err(DecodeError::InvalidTag);
            }
        }
        Ok(Self {
            invoke_id,
            service_choice,
            error_class,
            error_code,
        })
    }
}

fn error_field(r: &mut Reader<'_>, tag: Tag, ctx_tag: u8) -> Result<u32, DecodeError> {
    match tag {
        Tag::Context { tag_num, len } if tag_num == ctx_tag => decode_unsigned(r, len as usize),
        Tag::Application {
            tag: AppTag::Enumerated,
            len,
        } => decode_unsigned(r, len as usize),
        _ => Err(DecodeError::InvalidTag),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectPdu {
    pub invoke_id: u8,
    pub reason: RejectReason,
}

impl RejectPdu {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(ApduType::Reject.header_bits())?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.reason.to_u8())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        expect_type(r.read_u8()?, ApduType::Reject)?;
        Ok(Self {
            invoke_id: r.read_u8()?,
            reason: RejectReason::from_u8(r.read_u8()?),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbortPdu {
    /// Set when the abort was sent by the server side of the transaction.
    pub server: bool,
    pub invoke_id: u8,
    pub reason: AbortReason,
}

impl AbortPdu {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(ApduType::Abort.header_bits() | u8::from(self.server))?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.reason.to_u8())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        expect_type(b0, ApduType::Abort)?;
        Ok(Self {
            server: b0 & 0x01 != 0,
            invoke_id: r.read_u8()?,
            reason: AbortReason::from_u8(r.read_u8()?),
        })
    }
}
