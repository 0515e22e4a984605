use crate::apdu::UnconfirmedRequestHeader;
use crate::encoding::{
    primitives::{
        decode_app_enumerated, decode_app_object_id, decode_app_unsigned, encode_app_enumerated,
        encode_app_object_id, encode_app_unsigned,
    },
    reader::Reader,
    writer::Writer,
};
use crate::services::SERVICE_I_AM;
use crate::types::{ObjectId, Segmentation};
use crate::{DecodeError, EncodeError};

/// I-Am announcement of a device's identity and capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IAmRequest {
    pub device_id: ObjectId,
    /// Maximum APDU length accepted, in octets.
    pub max_apdu: u32,
    pub segmentation: Segmentation,
    pub vendor_id: u16,
}

impl IAmRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        UnconfirmedRequestHeader {
            service_choice: SERVICE_I_AM,
        }
        .encode(w)?;
        encode_app_object_id(w, self.device_id.raw())?;
        encode_app_unsigned(w, self.max_apdu)?;
        encode_app_enumerated(w, self.segmentation.to_u32())?;
        encode_app_unsigned(w, u32::from(self.vendor_id))
    }

    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let device_id = ObjectId::from_raw(decode_app_object_id(r)?);
        let max_apdu = decode_app_unsigned(r)?;
        let segmentation =
            Segmentation::from_u32(decode_app_enumerated(r)?).ok_or(DecodeError::InvalidValue)?;
        let vendor_id =
            u16::try_from(decode_app_unsigned(r)?).map_err(|_| DecodeError::InvalidValue)?;
        Ok(Self {
            device_id,
            max_apdu,
            segmentation,
            vendor_id,
        })
    }
}
