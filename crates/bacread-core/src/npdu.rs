use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

/// BACnet network layer protocol version (always `0x01`).
pub const NPDU_VERSION: u8 = 0x01;

const CONTROL_NETWORK_MESSAGE: u8 = 0x80;
const CONTROL_HAS_DESTINATION: u8 = 0x20;
const CONTROL_HAS_SOURCE: u8 = 0x08;
const CONTROL_EXPECTING_REPLY: u8 = 0x04;
const CONTROL_PRIORITY_MASK: u8 = 0x03;
const MAX_MAC_LEN: usize = 6;

/// Network number plus MAC of a station on a remote BACnet network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteStation {
    pub network: u16,
    pub mac: [u8; MAX_MAC_LEN],
    pub mac_len: u8,
}

impl RemoteStation {
    pub fn mac(&self) -> &[u8] {
        &self.mac[..usize::from(self.mac_len).min(MAX_MAC_LEN)]
    }
}

/// NPDU header preceding every APDU.
///
/// A property reader only ever originates local traffic, so encoding writes
/// no routing fields; decoding still has to step over SNET/SADR and DNET/DADR
/// added by routers on the way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Npdu {
    pub expecting_reply: bool,
    pub priority: u8,
    pub destination: Option<RemoteStation>,
    pub source: Option<RemoteStation>,
    pub hop_count: Option<u8>,
    /// Set when the NPDU carries a network-layer message instead of an APDU.
    pub network_message: Option<u8>,
}

impl Npdu {
    /// Local, normal-priority NPDU carrying an APDU.
    pub const fn local(expecting_reply: bool) -> Self {
        Self {
            expecting_reply,
            priority: 0,
            destination: None,
            source: None,
            hop_count: None,
            network_message: None,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if self.network_message.is_some() {
            return Err(EncodeError::ValueOutOfRange);
        }
        let mut control = self.priority & CONTROL_PRIORITY_MASK;
        if self.expecting_reply {
            control |= CONTROL_EXPECTING_REPLY;
        }
        if self.destination.is_some() {
            control |= CONTROL_HAS_DESTINATION;
        }
        if self.source.is_some() {
            control |= CONTROL_HAS_SOURCE;
        }

        w.write_u8(NPDU_VERSION)?;
        w.write_u8(control)?;
        if let Some(dest) = &self.destination {
            encode_station(w, dest)?;
        }
        if let Some(src) = &self.source {
            encode_station(w, src)?;
        }
        if self.destination.is_some() {
            w.write_u8(self.hop_count.unwrap_or(255))?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if r.read_u8()? != NPDU_VERSION {
            return Err(DecodeError::InvalidValue);
        }
        let control = r.read_u8()?;

        let destination = if control & CONTROL_HAS_DESTINATION != 0 {
            Some(decode_station(r)?)
        } else {
            None
        };
        let source = if control & CONTROL_HAS_SOURCE != 0 {
            Some(decode_station(r)?)
        } else {
            None
        };
        let hop_count = match destination {
            Some(_) => Some(r.read_u8()?),
            None => None,
        };
        let network_message = if control & CONTROL_NETWORK_MESSAGE != 0 {
            let message_type = r.read_u8()?;
            if message_type >= 0x80 {
                // Proprietary network messages are followed by a vendor id.
                r.read_be_u16()?;
            }
            Some(message_type)
        } else {
            None
        };

        Ok(Self {
            expecting_reply: control & CONTROL_EXPECTING_REPLY != 0,
            priority: control & CONTROL_PRIORITY_MASK,
            destination,
            source,
            hop_count,
            network_message,
        })
    }
}

fn encode_station(w: &mut Writer<'_>, station: &RemoteStation) -> Result<(), EncodeError> {
    if usize::from(station.mac_len) > MAX_MAC_LEN {
        return Err(EncodeError::ValueOutOfRange);
    }
    w.write_be_u16(station.network)?;
    w.write_u8(station.mac_len)?;
    w.write_all(station.mac())
}

fn decode_station(r: &mut Reader<'_>) -> Result<RemoteStation, DecodeError> {
    let network = r.read_be_u16()?;
    let mac_len = r.read_u8()?;
    if usize::from(mac_len) > MAX_MAC_LEN {
        return Err(DecodeError::InvalidLength);
    }
    let mut mac = [0u8; MAX_MAC_LEN];
    mac[..usize::from(mac_len)].copy_from_slice(r.read_exact(usize::from(mac_len))?);
    Ok(RemoteStation {
        network,
        mac,
        mac_len,
    })
}

#[cfg(test)]
mod tests {
    use super::{Npdu, RemoteStation};
    use crate::encoding::{reader::Reader, writer::Writer};

    #[test]
    fn local_request_header() {
        let mut buf = [0u8; 4];
        let mut w = Writer::new(&mut buf);
        Npdu::local(true).encode(&mut w).unwrap();
        assert_eq!(w.as_written(), &[0x01, 0x04]);
    }

    #[test]
    fn routed_reply_source_is_skipped() {
        // SNET 5, SLEN 1, SADR 0x0A, then the APDU.
        let frame = [0x01, 0x08, 0x00, 0x05, 0x01, 0x0A, 0x30];
        let mut r = Reader::new(&frame);
        let npdu = Npdu::decode(&mut r).unwrap();
        let src = npdu.source.unwrap();
        assert_eq!(src.network, 5);
        assert_eq!(src.mac(), &[0x0A]);
        assert_eq!(r.read_rest(), &[0x30]);
    }

    #[test]
    fn destination_roundtrip_writes_hop_count() {
        let mut p = Npdu::local(false);
        p.destination = Some(RemoteStation {
            network: 2,
            mac: [10, 0, 0, 5, 0xBA, 0xC0],
            mac_len: 6,
        });
        let mut buf = [0u8; 16];
        let mut w = Writer::new(&mut buf);
        p.encode(&mut w).unwrap();
        let mut r = Reader::new(w.as_written());
        let decoded = Npdu::decode(&mut r).unwrap();
        assert_eq!(decoded.destination, p.destination);
        assert_eq!(decoded.hop_count, Some(255));
    }

    #[test]
    fn network_layer_message_is_flagged() {
        let mut r = Reader::new(&[0x01, 0x80, 0x00, 0x00, 0x01]);
        let npdu = Npdu::decode(&mut r).unwrap();
        assert_eq!(npdu.network_message, Some(0x00));
    }
}
