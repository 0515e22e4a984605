//! BACnet wire codecs and type tables for the bacread property reader.
//!
//! `bacread-core` holds everything that is pure data: the tag/primitive
//! encoding, NPDU and APDU headers, the handful of services a property reader
//! speaks (ReadProperty, Who-Is, I-Am), the standard object and property
//! tables and the [`DatatypeRegistry`](datatype::DatatypeRegistry) that maps an
//! object/property pair to the shape of its value.
//!
//! Nothing here touches a socket; see `bacread-datalink` and `bacread-client`.
//!
//! # Feature flags
//!
//! - **`std`** (default): `std::error::Error` implementations.
//! - **`serde`**: `Serialize`/`Deserialize` on identifiers and datatypes.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// APDU headers for confirmed requests and their replies.
pub mod apdu;
/// Property datatype inference by object type, property and vendor.
pub mod datatype;
/// Binary encoding primitives, tags and the cursor reader/writer.
pub mod encoding;
/// Codec error types.
pub mod error;
/// NPDU encoding and decoding.
pub mod npdu;
/// Service payload codecs.
pub mod services;
/// Object identifiers, object types, property identifiers and data values.
pub mod types;

pub use error::{DecodeError, EncodeError};
