use crate::encoding::{
    reader::Reader,
    tag::{AppTag, Tag},
    writer::Writer,
};
use crate::{DecodeError, EncodeError};

/// Minimal big-endian octets for an unsigned value (1–4 bytes).
fn unsigned_octets(value: u32) -> ([u8; 4], usize) {
    let bytes = value.to_be_bytes();
    let skip = (value.leading_zeros() / 8).min(3) as usize;
    (bytes, skip)
}

/// Minimal two's-complement octets for a signed value (1–4 bytes).
fn signed_octets(value: i32) -> ([u8; 4], usize) {
    let bytes = value.to_be_bytes();
    let mut skip = 0;
    while skip < 3 {
        let (head, next) = (bytes[skip], bytes[skip + 1]);
        let redundant = (head == 0x00 && next & 0x80 == 0) || (head == 0xFF && next & 0x80 != 0);
        if !redundant {
            break;
        }
        skip += 1;
    }
    (bytes, skip)
}

/// Writes the minimal unsigned octets and returns how many were written.
pub fn encode_unsigned(w: &mut Writer<'_>, value: u32) -> Result<usize, EncodeError> {
    let (bytes, skip) = unsigned_octets(value);
    w.write_all(&bytes[skip..])?;
    Ok(4 - skip)
}

pub fn decode_unsigned(r: &mut Reader<'_>, len: usize) -> Result<u32, DecodeError> {
    if !(1..=4).contains(&len) {
        return Err(DecodeError::InvalidLength);
    }
    Ok(r
        .read_exact(len)?
        .iter()
        .fold(0u32, |acc, b| (acc << 8) | u32::from(*b)))
}

pub fn encode_signed(w: &mut Writer<'_>, value: i32) -> Result<usize, EncodeError> {
    let (bytes, skip) = signed_octets(value);
    w.write_all(&bytes[skip..])?;
    Ok(4 - skip)
}

pub fn decode_signed(r: &mut Reader<'_>, len: usize) -> Result<i32, DecodeError> {
    if !(1..=4).contains(&len) {
        return Err(DecodeError::InvalidLength);
    }
    let raw = r.read_exact(len)?;
    let fill = if raw[0] & 0x80 != 0 { 0xFF } else { 0x00 };
    let mut out = [fill; 4];
    out[4 - len..].copy_from_slice(raw);
    Ok(i32::from_be_bytes(out))
}

fn encode_unsigned_with(
    w: &mut Writer<'_>,
    header: impl FnOnce(u32) -> Tag,
    value: u32,
) -> Result<(), EncodeError> {
    let (bytes, skip) = unsigned_octets(value);
    header((4 - skip) as u32).encode(w)?;
    w.write_all(&bytes[skip..])
}

pub fn encode_app_unsigned(w: &mut Writer<'_>, value: u32) -> Result<(), EncodeError> {
    encode_unsigned_with(w, |len| Tag::Application { tag: AppTag::UnsignedInt, len }, value)
}

pub fn encode_app_enumerated(w: &mut Writer<'_>, value: u32) -> Result<(), EncodeError> {
    encode_unsigned_with(w, |len| Tag::Application { tag: AppTag::Enumerated, len }, value)
}

pub fn encode_app_signed(w: &mut Writer<'_>, value: i32) -> Result<(), EncodeError> {
    let (bytes, skip) = signed_octets(value);
    Tag::Application {
        tag: AppTag::SignedInt,
        len: (4 - skip) as u32,
    }
    .encode(w)?;
    w.write_all(&bytes[skip..])
}

pub fn encode_app_real(w: &mut Writer<'_>, value: f32) -> Result<(), EncodeError> {
    Tag::Application {
        tag: AppTag::Real,
        len: 4,
    }
    .encode(w)?;
    w.write_be_u32(value.to_bits())
}

pub fn encode_app_object_id(w: &mut Writer<'_>, object_id_raw: u32) -> Result<(), EncodeError> {
    Tag::Application {
        tag: AppTag::ObjectId,
        len: 4,
    }
    .encode(w)?;
    w.write_be_u32(object_id_raw)
}

pub fn encode_ctx_unsigned(w: &mut Writer<'_>, tag_num: u8, value: u32) -> Result<(), EncodeError> {
    encode_unsigned_with(w, |len| Tag::Context { tag_num, len }, value)
}

pub fn encode_ctx_object_id(
    w: &mut Writer<'_>,
    tag_num: u8,
    object_id_raw: u32,
) -> Result<(), EncodeError> {
    Tag::Context { tag_num, len: 4 }.encode(w)?;
    w.write_be_u32(object_id_raw)
}

/// Reads a context tag that must carry `expected_tag_num`, then its unsigned value.
pub fn decode_ctx_unsigned(r: &mut Reader<'_>, expected_tag_num: u8) -> Result<u32, DecodeError> {
    match Tag::decode(r)? {
        Tag::Context { tag_num, len } if tag_num == expected_tag_num => {
            decode_unsigned(r, len as usize)
        }
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn decode_app_unsigned(r: &mut Reader<'_>) -> Result<u32, DecodeError> {
    match Tag::decode(r)? {
        Tag::Application {
            tag: AppTag::UnsignedInt,
            len,
        } => decode_unsigned(r, len as usize),
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn decode_app_enumerated(r: &mut Reader<'_>) -> Result<u32, DecodeError> {
    match Tag::decode(r)? {
        Tag::Application {
            tag: AppTag::Enumerated,
            len,
        } => decode_unsigned(r, len as usize),
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn decode_app_object_id(r: &mut Reader<'_>) -> Result<u32, DecodeError> {
    match Tag::decode(r)? {
        Tag::Application {
            tag: AppTag::ObjectId,
            len: 4,
        } => r.read_be_u32(),
        _ => Err(DecodeError::InvalidTag),
    }
}
