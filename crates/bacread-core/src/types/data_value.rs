use crate::types::ObjectId;
use alloc::vec::Vec;
use core::fmt;

/// A primitive bit string borrowed from a received frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitString<'a> {
    pub unused_bits: u8,
    pub data: &'a [u8],
}

impl<'a> BitString<'a> {
    pub const fn new(unused_bits: u8, data: &'a [u8]) -> Self {
        Self { unused_bits, data }
    }

    /// Number of meaningful bits.
    pub fn len(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.unused_bits as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bit `index`, counted from the most significant bit of the first octet.
    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= self.len() {
            return None;
        }
        Some(self.data[index / 8] & (0x80 >> (index % 8)) != 0)
    }
}

/// A BACnet date. Any field may be 255 ("unspecified").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Date {
    pub year_since_1900: u8,
    pub month: u8,
    pub day: u8,
    pub weekday: u8,
}

/// A BACnet time of day. Any field may be 255 ("unspecified").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub hundredths: u8,
}

const UNSPECIFIED: u8 = 0xFF;

fn field(f: &mut fmt::Formatter<'_>, value: u8, width: usize) -> fmt::Result {
    if value == UNSPECIFIED {
        f.write_str("*")
    } else {
        write!(f, "{value:0width$}")
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year_since_1900 == UNSPECIFIED {
            f.write_str("*")?;
        } else {
            write!(f, "{}", 1900 + u16::from(self.year_since_1900))?;
        }
        f.write_str("-")?;
        field(f, self.month, 2)?;
        f.write_str("-")?;
        field(f, self.day, 2)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        field(f, self.hour, 2)?;
        f.write_str(":")?;
        field(f, self.minute, 2)?;
        f.write_str(":")?;
        field(f, self.second, 2)?;
        f.write_str(".")?;
        field(f, self.hundredths, 2)
    }
}

/// One application-tagged value, or a constructed group of them, as read
/// off the wire. Strings and octets borrow from the frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue<'a> {
    Null,
    Boolean(bool),
    Unsigned(u32),
    Signed(i32),
    Real(f32),
    Double(f64),
    OctetString(&'a [u8]),
    CharacterString(&'a str),
    BitString(BitString<'a>),
    Enumerated(u32),
    Date(Date),
    Time(Time),
    ObjectId(ObjectId),
    /// A context-tagged primitive inside a constructed value; the meaning of
    /// its octets depends on the enclosing production.
    Context { tag_num: u8, data: &'a [u8] },
    /// Values between an opening and closing tag pair.
    Constructed {
        tag_num: u8,
        values: Vec<DataValue<'a>>,
    },
}

impl DataValue<'_> {
    /// Short name of the value's kind, used in mismatch diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Unsigned(_) => "unsigned",
            Self::Signed(_) => "signed",
            Self::Real(_) => "real",
            Self::Double(_) => "double",
            Self::OctetString(_) => "octetString",
            Self::CharacterString(_) => "characterString",
            Self::BitString(_) => "bitString",
            Self::Enumerated(_) => "enumerated",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::ObjectId(_) => "objectIdentifier",
            Self::Context { .. } => "context",
            Self::Constructed { .. } => "constructed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BitString, Date, Time};

    #[test]
    fn bit_string_indexes_from_msb() {
        let flags = BitString::new(4, &[0b1010_0000]);
        assert_eq!(flags.len(), 4);
        assert_eq!(flags.bit(0), Some(true));
        assert_eq!(flags.bit(1), Some(false));
        assert_eq!(flags.bit(2), Some(true));
        assert_eq!(flags.bit(4), None);
    }

    #[test]
    fn date_and_time_render_wildcards() {
        let date = Date {
            year_since_1900: 124,
            month: 3,
            day: 0xFF,
            weekday: 0xFF,
        };
        assert_eq!(date.to_string(), "2024-03-*");
        let time = Time {
            hour: 7,
            minute: 5,
            second: 0,
            hundredths: 0xFF,
        };
        assert_eq!(time.to_string(), "07:05:00.*");
    }
}
