use alloc::string::String;

pub mod data_value;
pub mod enums;
pub mod object_id;
pub mod object_type;
pub mod property_id;

pub use data_value::{BitString, DataValue, Date, Time};
pub use enums::{AbortReason, ErrorClass, ErrorCode, MaxApdu, RejectReason, Segmentation};
pub use object_id::ObjectId;
pub use object_type::ObjectType;
pub use property_id::PropertyId;

/// Declares a BACnet enumeration with named standard codes, a `Proprietary`
/// catch-all, the numeric conversions and the camelCase wire names.
///
/// `from_*` always maps a named code to its named variant, so values built
/// through it compare equal regardless of how they were spelled.
macro_rules! bacnet_enum {
    (
        $(#[$meta:meta])*
        $name:ident($repr:ty, $to:ident, $from:ident) {
            $($variant:ident = $code:literal => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $($variant,)+
            /// A code with no named variant (vendor range or newer revisions).
            Proprietary($repr),
        }

        impl $name {
            pub const fn $to(self) -> $repr {
                match self {
                    $(Self::$variant => $code,)+
                    Self::Proprietary(v) => v,
                }
            }

            pub const fn $from(value: $repr) -> Self {
                match value {
                    $($code => Self::$variant,)+
                    v => Self::Proprietary(v),
                }
            }

            /// Standard camelCase name, e.g. `analogInput`.
            pub const fn name(self) -> Option<&'static str> {
                match self {
                    $(Self::$variant => Some($text),)+
                    Self::Proprietary(_) => None,
                }
            }

            /// Accepts camelCase, hyphenated or underscored spellings.
            pub fn from_name(name: &str) -> Option<Self> {
                match $crate::types::camel_case(name).as_str() {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self.name() {
                    Some(name) => f.write_str(name),
                    None => write!(f, "{}", self.$to()),
                }
            }
        }
    };
}
pub(crate) use bacnet_enum;

/// `analog-input`, `analog_input` and `AnalogInput` all become `analogInput`.
pub(crate) fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.trim().chars() {
        match ch {
            '-' | '_' | ' ' => upper_next = !out.is_empty(),
            c if upper_next => {
                out.push(c.to_ascii_uppercase());
                upper_next = false;
            }
            c if out.is_empty() => out.push(c.to_ascii_lowercase()),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::camel_case;

    #[test]
    fn spellings_normalize() {
        assert_eq!(camel_case("analog-input"), "analogInput");
        assert_eq!(camel_case("multi_state_value"), "multiStateValue");
        assert_eq!(camel_case("PresentValue"), "presentValue");
        assert_eq!(camel_case(" objectName "), "objectName");
    }
}
