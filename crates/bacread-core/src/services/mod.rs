pub mod i_am;
pub mod read_property;
pub mod value_codec;
pub mod who_is;

/// Confirmed service choice for ReadProperty.
pub const SERVICE_READ_PROPERTY: u8 = 0x0C;
/// Unconfirmed service choice for I-Am.
pub const SERVICE_I_AM: u8 = 0x00;
/// Unconfirmed service choice for Who-Is.
pub const SERVICE_WHO_IS: u8 = 0x08;
