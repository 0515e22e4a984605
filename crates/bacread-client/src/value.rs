use bacread_core::datatype::ResolvedDatatype;
use bacread_core::types::{DataValue, Date, ObjectId, PropertyId, Time};
use std::fmt;

/// An owned bit string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitStringValue {
    pub unused_bits: u8,
    pub data: Vec<u8>,
}

impl BitStringValue {
    /// The meaningful bits, most significant first.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        let len = (self.data.len() * 8).saturating_sub(usize::from(self.unused_bits));
        (0..len).map(|i| self.data[i / 8] & (0x80 >> (i % 8)) != 0)
    }
}

/// A decoded property value that owns its data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Value {
    Null,
    Boolean(bool),
    Unsigned(u32),
    Signed(i32),
    Real(f32),
    Double(f64),
    OctetString(Vec<u8>),
    CharacterString(String),
    BitString(BitStringValue),
    Enumerated(u32),
    Date(Date),
    Time(Time),
    ObjectId(ObjectId),
    /// Context-tagged primitive whose meaning depends on its enclosing value.
    Context {
        tag_num: u8,
        data: Vec<u8>,
    },
    /// A constructed value, as found inside `any`-typed properties.
    Constructed {
        tag_num: u8,
        values: Vec<Value>,
    },
    /// Every element of an array or list property.
    Sequence(Vec<Value>),
}

impl<'a> From<&DataValue<'a>> for Value {
    fn from(value: &DataValue<'a>) -> Self {
        match value {
            DataValue::Null => Self::Null,
            DataValue::Boolean(v) => Self::Boolean(*v),
            DataValue::Unsigned(v) => Self::Unsigned(*v),
            DataValue::Signed(v) => Self::Signed(*v),
            DataValue::Real(v) => Self::Real(*v),
            DataValue::Double(v) => Self::Double(*v),
            DataValue::OctetString(v) => Self::OctetString(v.to_vec()),
            DataValue::CharacterString(v) => Self::CharacterString((*v).to_string()),
            DataValue::BitString(v) => Self::BitString(BitStringValue {
                unused_bits: v.unused_bits,
                data: v.data.to_vec(),
            }),
            DataValue::Enumerated(v) => Self::Enumerated(*v),
            DataValue::Date(v) => Self::Date(*v),
            DataValue::Time(v) => Self::Time(*v),
            DataValue::ObjectId(v) => Self::ObjectId(*v),
            DataValue::Context { tag_num, data } => Self::Context {
                tag_num: *tag_num,
                data: data.to_vec(),
            },
            DataValue::Constructed { tag_num, values } => Self::Constructed {
                tag_num: *tag_num,
                values: values.iter().map(Self::from).collect(),
            },
        }
    }
}

fn write_hex(f: &mut fmt::Formatter<'_>, data: &[u8]) -> fmt::Result {
    for b in data {
        write!(f, "{b:02x}")?;
    }
    Ok(())
}

fn write_list(f: &mut fmt::Formatter<'_>, values: &[Value]) -> fmt::Result {
    f.write_str("[")?;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{v}")?;
    }
    f.write_str("]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Unsigned(v) | Self::Enumerated(v) => write!(f, "{v}"),
            Self::Signed(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::OctetString(v) => write_hex(f, v),
            Self::CharacterString(v) => f.write_str(v),
            Self::BitString(v) => v
                .bits()
                .try_for_each(|bit| f.write_str(if bit { "1" } else { "0" })),
            Self::Date(v) => write!(f, "{v}"),
            Self::Time(v) => write!(f, "{v}"),
            Self::ObjectId(v) => write!(f, "{v}"),
            Self::Context { tag_num, data } => {
                write!(f, "[{tag_num}]")?;
                write_hex(f, data)
            }
            Self::Constructed { tag_num, values } => {
                write!(f, "{{{tag_num}}}")?;
                write_list(f, values)
            }
            Self::Sequence(values) => write_list(f, values),
        }
    }
}

/// The outcome of one ReadProperty: the value and the shape it was decoded
/// against.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedValue {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub datatype: ResolvedDatatype,
    pub value: Value,
}

#[cfg(test)]
mod tests {
    use super::{BitStringValue, Value};
    use bacread_core::types::{BitString, DataValue, Date, ObjectId, ObjectType};

    #[test]
    fn converts_borrowed_values() {
        let raw = [0xA0u8];
        let wire = DataValue::Constructed {
            tag_num: 0,
            values: vec![
                DataValue::CharacterString("lobby"),
                DataValue::BitString(BitString::new(4, &raw)),
            ],
        };
        assert_eq!(
            Value::from(&wire),
            Value::Constructed {
                tag_num: 0,
                values: vec![
                    Value::CharacterString("lobby".into()),
                    Value::BitString(BitStringValue {
                        unused_bits: 4,
                        data: vec![0xA0],
                    }),
                ],
            }
        );
    }

    #[test]
    fn display() {
        assert_eq!(Value::Real(72.5).to_string(), "72.5");
        assert_eq!(
            Value::BitString(BitStringValue {
                unused_bits: 4,
                data: vec![0xA0],
            })
            .to_string(),
            "1010"
        );
        assert_eq!(Value::OctetString(vec![0xde, 0xad]).to_string(), "dead");
        assert_eq!(
            Value::Sequence(vec![
                Value::ObjectId(ObjectId::new(ObjectType::Device, 5)),
                Value::ObjectId(ObjectId::new(ObjectType::AnalogInput, 1)),
            ])
            .to_string(),
            "[device:5, analogInput:1]"
        );
        let date = Date {
            year_since_1900: 124,
            month: 3,
            day: 255,
            weekday: 255,
        };
        assert_eq!(Value::Date(date).to_string(), "2024-03-*");
    }
}
