//! Async BACnet/IP ReadProperty engine.
//!
//! A [`Session`] owns one UDP endpoint and correlates responses by invoke
//! id. [`RequestBuilder`] validates what to read, [`ResponseDecoder`] turns
//! the acknowledgement into a typed [`Value`], and [`ReadPoint`] strings the
//! three together for repeated reads.

pub mod config;
pub mod decode;
pub mod error;
pub mod identity;
pub mod point;
pub mod request;
pub mod session;
pub mod value;

pub use bacread_core::datatype::{
    Datatype, DatatypeRegistry, DatatypeRegistryBuilder, ObjectTypeRef, PropertyRef,
    ResolvedDatatype,
};
pub use bacread_datalink::{resolve, BacnetIpTransport, NetworkAddress};
pub use config::SessionConfig;
pub use decode::ResponseDecoder;
pub use error::ClientError;
pub use identity::{DeviceIdentity, DeviceIdentityBuilder, ServicesSupported};
pub use point::ReadPoint;
pub use request::{ReadDescriptor, ReadPropertyRequest, RequestBuilder};
pub use session::{PendingExchange, Response, Session};
pub use value::{BitStringValue, DecodedValue, Value};
