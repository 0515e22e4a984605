//! ReadProperty (confirmed service 12) request parameters and acknowledgement.

use crate::apdu::{ComplexAckHeader, ConfirmedRequestHeader};
use crate::encoding::{
    primitives::{decode_unsigned, encode_ctx_object_id, encode_ctx_unsigned},
    reader::Reader,
    tag::Tag,
    writer::Writer,
};
use crate::services::value_codec::{decode_until_closing, encode_application_data_value};
use crate::services::SERVICE_READ_PROPERTY;
use crate::types::{DataValue, MaxApdu, ObjectId, PropertyId};
use crate::{DecodeError, EncodeError};
use alloc::vec::Vec;

const TAG_OBJECT_ID: u8 = 0;
const TAG_PROPERTY_ID: u8 = 1;
const TAG_ARRAY_INDEX: u8 = 2;
const TAG_VALUE: u8 = 3;

/// The parameters of a ReadProperty request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadProperty {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
}

impl ReadProperty {
    /// Writes the service parameters only (no APDU header).
    pub fn encode_params(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_object_id(w, TAG_OBJECT_ID, self.object_id.raw())?;
        encode_ctx_unsigned(w, TAG_PROPERTY_ID, self.property_id.to_u32())?;
        if let Some(index) = self.array_index {
            encode_ctx_unsigned(w, TAG_ARRAY_INDEX, index)?;
        }
        Ok(())
    }

    /// Writes a complete unsegmented Confirmed-Request APDU.
    pub fn encode_request(
        &self,
        w: &mut Writer<'_>,
        invoke_id: u8,
        max_apdu: MaxApdu,
        segmented_response_accepted: bool,
    ) -> Result<(), EncodeError> {
        let mut header = ConfirmedRequestHeader::new(invoke_id, SERVICE_READ_PROPERTY, max_apdu);
        header.segmented_response_accepted = segmented_response_accepted;
        header.encode(w)?;
        self.encode_params(w)
    }

    pub fn decode_params(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let object_id = ObjectId::from_raw(ctx_unsigned(r, TAG_OBJECT_ID)?);
        let property_id = PropertyId::from_u32(ctx_unsigned(r, TAG_PROPERTY_ID)?);
        let array_index = if r.is_empty() {
            None
        } else {
            Some(ctx_unsigned(r, TAG_ARRAY_INDEX)?)
        };
        Ok(Self {
            object_id,
            property_id,
            array_index,
        })
    }
}

fn ctx_unsigned(r: &mut Reader<'_>, expected: u8) -> Result<u32, DecodeError> {
    match Tag::decode(r)? {
        Tag::Context { tag_num, len } if tag_num == expected => decode_unsigned(r, len as usize),
        _ => Err(DecodeError::InvalidTag),
    }
}

/// A ReadProperty-ACK. `values` holds every application value found between
/// the opening and closing tag 3, in order; scalars yield exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadPropertyAck<'a> {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub values: Vec<DataValue<'a>>,
}

impl<'a> ReadPropertyAck<'a> {
    /// Parses a whole APDU; anything other than an unsegmented ReadProperty
    /// complex ack is `InvalidValue`.
    pub fn decode(apdu: &'a [u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(apdu);
        let header = ComplexAckHeader::decode(&mut r)?;
        if header.segmented || header.service_choice != SERVICE_READ_PROPERTY {
            return Err(DecodeError::InvalidValue);
        }
        Self::decode_after_header(&mut r)
    }

    pub fn decode_after_header(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let object_id = ObjectId::from_raw(ctx_unsigned(r, TAG_OBJECT_ID)?);
        let property_id = PropertyId::from_u32(ctx_unsigned(r, TAG_PROPERTY_ID)?);

        let (array_index, opening) = match Tag::decode(r)? {
            Tag::Context {
                tag_num: TAG_ARRAY_INDEX,
                len,
            } => (Some(decode_unsigned(r, len as usize)?), Tag::decode(r)?),
            other => (None, other),
        };
        if opening != (Tag::Opening { tag_num: TAG_VALUE }) {
            return Err(DecodeError::InvalidTag);
        }
        let values = decode_until_closing(r, TAG_VALUE)?;

        Ok(Self {
            object_id,
            property_id,
            array_index,
            values,
        })
    }

    pub fn encode(&self, w: &mut Writer<'_>, invoke_id: u8) -> Result<(), EncodeError> {
        ComplexAckHeader::unsegmented(invoke_id, SERVICE_READ_PROPERTY).encode(w)?;
        ReadProperty {
            object_id: self.object_id,
            property_id: self.property_id,
            array_index: self.array_index,
        }
        .encode_params(w)?;
        Tag::Opening { tag_num: TAG_VALUE }.encode(w)?;
        for value in &self.values {
            encode_application_data_value(w, value)?;
        }
        Tag::Closing { tag_num: TAG_VALUE }.encode(w)
    }
}
