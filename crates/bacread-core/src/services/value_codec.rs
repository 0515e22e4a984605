use crate::encoding::{
    primitives::{
        decode_signed, decode_unsigned, encode_app_enumerated, encode_app_real, encode_app_signed,
        encode_app_unsigned,
    },
    reader::Reader,
    tag::{AppTag, Tag},
    writer::Writer,
};
use crate::types::{BitString, DataValue, Date, ObjectId, Time};
use crate::{DecodeError, EncodeError};
use alloc::vec::Vec;

/// Character set 0: UTF-8 (ANSI X3.4 superset).
const CHARSET_UTF8: u8 = 0;

fn u32_len(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::ValueOutOfRange)
}

fn app_header(w: &mut Writer<'_>, tag: AppTag, len: u32) -> Result<(), EncodeError> {
    Tag::Application { tag, len }.encode(w)
}

pub fn encode_application_data_value(
    w: &mut Writer<'_>,
    value: &DataValue<'_>,
) -> Result<(), EncodeError> {
    match value {
        DataValue::Null => app_header(w, AppTag::Null, 0),
        DataValue::Boolean(v) => app_header(w, AppTag::Boolean, u32::from(*v)),
        DataValue::Unsigned(v) => encode_app_unsigned(w, *v),
        DataValue::Signed(v) => encode_app_signed(w, *v),
        DataValue::Real(v) => encode_app_real(w, *v),
        DataValue::Double(v) => {
            app_header(w, AppTag::Double, 8)?;
            w.write_all(&v.to_bits().to_be_bytes())
        }
        DataValue::OctetString(v) => {
            app_header(w, AppTag::OctetString, u32_len(v.len())?)?;
            w.write_all(v)
        }
        DataValue::CharacterString(v) => {
            let bytes = v.as_bytes();
            app_header(w, AppTag::CharacterString, u32_len(bytes.len() + 1)?)?;
            w.write_u8(CHARSET_UTF8)?;
            w.write_all(bytes)
        }
        DataValue::BitString(v) => {
            if v.unused_bits > 7 {
                return Err(EncodeError::ValueOutOfRange);
            }
            app_header(w, AppTag::BitString, u32_len(v.data.len() + 1)?)?;
            w.write_u8(v.unused_bits)?;
            w.write_all(v.data)
        }
        DataValue::Enumerated(v) => encode_app_enumerated(w, *v),
        DataValue::Date(v) => {
            app_header(w, AppTag::Date, 4)?;
            w.write_all(&[v.year_since_1900, v.month, v.day, v.weekday])
        }
        DataValue::Time(v) => {
            app_header(w, AppTag::Time, 4)?;
            w.write_all(&[v.hour, v.minute, v.second, v.hundredths])
        }
        DataValue::ObjectId(v) => {
            app_header(w, AppTag::ObjectId, 4)?;
            w.write_be_u32(v.raw())
        }
        DataValue::Context { tag_num, data } => {
            Tag::Context {
                tag_num: *tag_num,
                len: u32_len(data.len())?,
            }
            .encode(w)?;
            w.write_all(data)
        }
        DataValue::Constructed { tag_num, values } => {
            Tag::Opening { tag_num: *tag_num }.encode(w)?;
            for child in values {
                encode_application_data_value(w, child)?;
            }
            Tag::Closing { tag_num: *tag_num }.encode(w)
        }
    }
}

pub fn decode_application_data_value<'a>(r: &mut Reader<'a>) -> Result<DataValue<'a>, DecodeError> {
    let tag = Tag::decode(r)?;
    decode_application_data_value_from_tag(r, tag)
}

/// Decodes the value introduced by an already-read `tag`. A stray closing
/// tag is an error; callers looking for one must check before calling.
pub fn decode_application_data_value_from_tag<'a>(
    r: &mut Reader<'a>,
    tag: Tag,
) -> Result<DataValue<'a>, DecodeError> {
    let (app, len) = match tag {
        Tag::Application { tag, len } => (tag, len as usize),
        Tag::Context { tag_num, len } => {
            return Ok(DataValue::Context {
                tag_num,
                data: r.read_exact(len as usize)?,
            })
        }
        Tag::Opening { tag_num } => {
            let values = decode_until_closing(r, tag_num)?;
            return Ok(DataValue::Constructed { tag_num, values });
        }
        Tag::Closing { .. } => return Err(DecodeError::InvalidTag),
    };

    Ok(match app {
        AppTag::Null => DataValue::Null,
        AppTag::Boolean => DataValue::Boolean(len != 0),
        AppTag::UnsignedInt => DataValue::Unsigned(decode_unsigned(r, len)?),
        AppTag::SignedInt => DataValue::Signed(decode_signed(r, len)?),
        AppTag::Real => {
            if len != 4 {
                return Err(DecodeError::InvalidLength);
            }
            DataValue::Real(f32::from_bits(r.read_be_u32()?))
        }
        AppTag::Double => {
            DataValue::Double(f64::from_bits(u64::from_be_bytes(fixed::<8>(r, len)?)))
        }
        AppTag::OctetString => DataValue::OctetString(r.read_exact(len)?),
        AppTag::CharacterString => {
            if len == 0 {
                return Err(DecodeError::InvalidLength);
            }
            let raw = r.read_exact(len)?;
            if raw[0] != CHARSET_UTF8 {
                return Err(DecodeError::Unsupported);
            }
            let s = core::str::from_utf8(&raw[1..]).map_err(|_| DecodeError::InvalidValue)?;
            DataValue::CharacterString(s)
        }
        AppTag::BitString => {
            if len == 0 {
                return Err(DecodeError::InvalidLength);
            }
            let raw = r.read_exact(len)?;
            if raw[0] > 7 {
                return Err(DecodeError::InvalidValue);
            }
            DataValue::BitString(BitString::new(raw[0], &raw[1..]))
        }
        AppTag::Enumerated => DataValue::Enumerated(decode_unsigned(r, len)?),
        AppTag::Date => {
            let [year_since_1900, month, day, weekday] = fixed::<4>(r, len)?;
            DataValue::Date(Date {
                year_since_1900,
                month,
                day,
                weekday,
            })
        }
        AppTag::Time => {
            let [hour, minute, second, hundredths] = fixed::<4>(r, len)?;
            DataValue::Time(Time {
                hour,
                minute,
                second,
                hundredths,
            })
        }
        AppTag::ObjectId => {
            DataValue::ObjectId(ObjectId::from_raw(u32::from_be_bytes(fixed::<4>(r, len)?)))
        }
    })
}

/// Decodes values up to (and consuming) the closing tag `tag_num`.
pub fn decode_until_closing<'a>(
    r: &mut Reader<'a>,
    tag_num: u8,
) -> Result<Vec<DataValue<'a>>, DecodeError> {
    let mut values = Vec::new();
    loop {
        let tag = Tag::decode(r)?;
        if tag == (Tag::Closing { tag_num }) {
            return Ok(values);
        }
        values.push(decode_application_data_value_from_tag(r, tag)?);
    }
}

fn fixed<const N: usize>(r: &mut Reader<'_>, len: usize) -> Result<[u8; N], DecodeError> {
    if len != N {
        return Err(DecodeError::InvalidLength);
    }
    r.read_array::<N>()
}

#[cfg(test)]
mod tests {
    use super::{
        decode_application_data_value, decode_until_closing, encode_application_data_value,
    };
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::types::{DataValue, Time};
    use crate::DecodeError;
    use alloc::vec;

    #[test]
    fn decodes_real_and_string() {
        let mut r = Reader::new(&[0x44, 0x42, 0x91, 0x00, 0x00]);
        assert_eq!(decode_application_data_value(&mut r).unwrap(), DataValue::Real(72.5));

        let mut r = Reader::new(&[0x75, 0x05, 0x00, b'Z', b'o', b'n', b'e']);
        assert_eq!(
            decode_application_data_value(&mut r).unwrap(),
            DataValue::CharacterString("Zone")
        );
    }

    #[test]
    fn rejects_non_utf8_charset() {
        let mut r = Reader::new(&[0x73, 0x04, b'h', b'i']);
        assert_eq!(decode_application_data_value(&mut r), Err(DecodeError::Unsupported));
    }

    #[test]
    fn timestamp_choice_keeps_context_octets() {
        // BACnetTimeStamp [0] time wrapped in opening/closing tag 1
        let frame = [0x1E, 0x0C, 10, 30, 0, 0, 0x1F];
        let mut r = Reader::new(&frame);
        let value = decode_application_data_value(&mut r).unwrap();
        assert_eq!(
            value,
            DataValue::Constructed {
                tag_num: 1,
                values: vec![DataValue::Context {
                    tag_num: 0,
                    data: &[10, 30, 0, 0],
                }],
            }
        );
        assert!(r.is_empty());
    }

    #[test]
    fn collects_values_until_closing_tag() {
        let values = [
            DataValue::Unsigned(3),
            DataValue::Time(Time {
                hour: 1,
                minute: 2,
                second: 3,
                hundredths: 4,
            }),
        ];
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        for v in &values {
            encode_application_data_value(&mut w, v).unwrap();
        }
        w.write_u8(0x3F).unwrap();
        let len = w.position();

        let mut r = Reader::new(&buf[..len]);
        assert_eq!(decode_until_closing(&mut r, 3).unwrap(), values.to_vec());
    }
}
