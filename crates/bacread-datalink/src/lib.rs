//! BACnet/IP data link for bacread: host resolution, BVLC framing and the
//! UDP transport.

#![allow(async_fn_in_trait)]

pub mod address;
pub mod bip;
pub mod resolve;
pub mod traits;

pub use address::{AddressError, DataLinkAddress, NetworkAddress, BACNET_IP_DEFAULT_PORT};
pub use bip::transport::BacnetIpTransport;
pub use resolve::{resolve, resolve_with, HostLookup, SystemLookup};
pub use traits::{DataLink, DataLinkError};
