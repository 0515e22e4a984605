/// BACnet Virtual Link Control header.
pub mod bvlc;
/// UDP transport for BACnet/IP.
pub mod transport;
