use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

const CLASS_CONTEXT: u8 = 0x08;
const LVT_OPENING: u8 = 6;
const LVT_CLOSING: u8 = 7;
const LVT_EXTENDED: u8 = 5;
const TAG_NUM_EXTENDED: u8 = 0x0F;

/// Application tag numbers (ASHRAE 135 clause 20.2.1.4).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppTag {
    Null = 0,
    Boolean = 1,
    UnsignedInt = 2,
    SignedInt = 3,
    Real = 4,
    Double = 5,
    OctetString = 6,
    CharacterString = 7,
    BitString = 8,
    Enumerated = 9,
    Date = 10,
    Time = 11,
    ObjectId = 12,
}

impl AppTag {
    pub fn from_u8(value: u8) -> Result<Self, DecodeError> {
        Ok(match value {
            0 => Self::Null,
            1 => Self::Boolean,
            2 => Self::UnsignedInt,
            3 => Self::SignedInt,
            4 => Self::Real,
            5 => Self::Double,
            6 => Self::OctetString,
            7 => Self::CharacterString,
            8 => Self::BitString,
            9 => Self::Enumerated,
            10 => Self::Date,
            11 => Self::Time,
            12 => Self::ObjectId,
            _ => return Err(DecodeError::InvalidTag),
        })
    }
}

/// A decoded tag header. For application booleans `len` carries the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Application { tag: AppTag, len: u32 },
    Context { tag_num: u8, len: u32 },
    Opening { tag_num: u8 },
    Closing { tag_num: u8 },
}

impl Tag {
    pub fn encode(self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let (tag_num, class, lvt, len) = match self {
            Tag::Application { tag, len } => (tag as u8, 0, length_code(len), Some(len)),
            Tag::Context { tag_num, len } => (tag_num, CLASS_CONTEXT, length_code(len), Some(len)),
            Tag::Opening { tag_num } => (tag_num, CLASS_CONTEXT, LVT_OPENING, None),
            Tag::Closing { tag_num } => (tag_num, CLASS_CONTEXT, LVT_CLOSING, None),
        };

        let extended_num = tag_num >= TAG_NUM_EXTENDED;
        let high = if extended_num { TAG_NUM_EXTENDED } else { tag_num };
        w.write_u8((high << 4) | class | lvt)?;
        if extended_num {
            w.write_u8(tag_num)?;
        }

        match len {
            Some(len) if lvt == LVT_EXTENDED => write_extended_len(w, len),
            _ => Ok(()),
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let first = r.read_u8()?;
        let tag_num = match first >> 4 {
            TAG_NUM_EXTENDED => r.read_u8()?,
            n => n,
        };
        let lvt = first & 0x07;

        if first & CLASS_CONTEXT != 0 {
            return match lvt {
                LVT_OPENING => Ok(Tag::Opening { tag_num }),
                LVT_CLOSING => Ok(Tag::Closing { tag_num }),
                _ => Ok(Tag::Context {
                    tag_num,
                    len: read_len(r, lvt)?,
                }),
            };
        }

        let tag = AppTag::from_u8(tag_num)?;
        let len = if tag == AppTag::Boolean {
            // Application booleans carry the value in the length field.
            u32::from(lvt)
        } else {
            read_len(r, lvt)?
        };
        Ok(Tag::Application { tag, len })
    }
}

const fn length_code(len: u32) -> u8 {
    if len < LVT_EXTENDED as u32 {
        len as u8
    } else {
        LVT_EXTENDED
    }
}

fn write_extended_len(w: &mut Writer<'_>, len: u32) -> Result<(), EncodeError> {
    match len {
        0..=253 => w.write_u8(len as u8),
        254..=0xFFFF => {
            w.write_u8(254)?;
            w.write_be_u16(len as u16)
        }
        _ => {
            w.write_u8(255)?;
            w.write_be_u32(len)
        }
    }
}

fn read_len(r: &mut Reader<'_>, lvt: u8) -> Result<u32, DecodeError> {
    match lvt {
        0..=4 => Ok(u32::from(lvt)),
        LVT_EXTENDED => match r.read_u8()? {
            254 => r.read_be_u16().map(u32::from),
            255 => r.read_be_u32(),
            n => Ok(u32::from(n)),
        },
        _ => Err(DecodeError::InvalidLength),
    }
}

#[cfg(test)]
mod tests {
    use super::{AppTag, Tag};
    use crate::encoding::{reader::Reader, writer::Writer};

    fn encoded(tag: Tag) -> ([u8; 8], usize) {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        tag.encode(&mut w).unwrap();
        let n = w.as_written().len();
        (buf, n)
    }

    #[test]
    fn context_object_id_header_is_one_byte() {
        let (buf, n) = encoded(Tag::Context { tag_num: 0, len: 4 });
        assert_eq!(&buf[..n], &[0x0C]);
    }

    #[test]
    fn opening_and_closing_three() {
        let (open, n) = encoded(Tag::Opening { tag_num: 3 });
        assert_eq!(&open[..n], &[0x3E]);
        let (close, n) = encoded(Tag::Closing { tag_num: 3 });
        assert_eq!(&close[..n], &[0x3F]);
    }

    #[test]
    fn extended_number_and_length_decode() {
        let tag = Tag::Context {
            tag_num: 20,
            len: 300,
        };
        let (buf, n) = encoded(tag);
        assert_eq!(&buf[..n], &[0xFD, 20, 254, 0x01, 0x2C]);
        let mut r = Reader::new(&buf[..n]);
        assert_eq!(Tag::decode(&mut r).unwrap(), tag);
    }

    #[test]
    fn application_boolean_value_lives_in_length() {
        let mut r = Reader::new(&[0x11]);
        assert_eq!(
            Tag::decode(&mut r).unwrap(),
            Tag::Application {
                tag: AppTag::Boolean,
                len: 1
            }
        );
        assert!(r.is_empty());
    }
}
