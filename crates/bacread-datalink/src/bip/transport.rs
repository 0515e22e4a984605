use crate::bip::bvlc::{BvlcFunction, BvlcHeader, BVLC_HEADER_LEN};
use crate::{DataLink, DataLinkAddress, DataLinkError};
use bacread_core::encoding::{reader::Reader, writer::Writer};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::net::UdpSocket;

const MAX_BIP_FRAME_LEN: usize = 1600;
const FORWARDED_ORIGIN_LEN: usize = 6;

/// BACnet/IP over a single UDP socket.
#[derive(Debug)]
pub struct BacnetIpTransport {
    socket: UdpSocket,
}

impl BacnetIpTransport {
    pub async fn bind(bind_addr: SocketAddr) -> Result<Self, DataLinkError> {
        let socket = UdpSocket::bind(bind_addr).await?;
        socket.set_broadcast(true)?;
        log::debug!("bacnet/ip transport bound to {}", socket.local_addr()?);
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DataLinkError> {
        self.socket.local_addr().map_err(DataLinkError::Io)
    }

    fn is_broadcast(addr: SocketAddr) -> bool {
        match addr.ip() {
            IpAddr::V4(v4) => v4.is_broadcast(),
            IpAddr::V6(_) => false,
        }
    }
}

impl DataLink for BacnetIpTransport {
    async fn send(&self, address: DataLinkAddress, payload: &[u8]) -> Result<(), DataLinkError> {
        let addr = address.as_socket_addr();
        let function = if Self::is_broadcast(addr) {
            BvlcFunction::OriginalBroadcastNpdu
        } else {
            BvlcFunction::OriginalUnicastNpdu
        };

        let total_len = BVLC_HEADER_LEN
            .checked_add(payload.len())
            .filter(|len| *len <= MAX_BIP_FRAME_LEN)
            .ok_or(DataLinkError::FrameTooLarge)?;

        let mut frame = [0u8; MAX_BIP_FRAME_LEN];
        let mut w = Writer::new(&mut frame);
        BvlcHeader {
            function,
            length: total_len as u16,
        }
        .encode(&mut w)
        .map_err(|_| DataLinkError::InvalidFrame)?;
        w.write_all(payload)
            .map_err(|_| DataLinkError::FrameTooLarge)?;

        self.socket.send_to(w.as_written(), addr).await?;
        Ok(())
    }

    async fn recv(&self, buf: &mut [u8]) -> Result<(usize, DataLinkAddress), DataLinkError> {
        let mut frame = [0u8; MAX_BIP_FRAME_LEN];
        let (n, src) = self.socket.recv_from(&mut frame).await?;
        let mut r = Reader::new(&frame[..n]);
        let hdr = BvlcHeader::decode(&mut r).map_err(|_| DataLinkError::InvalidFrame)?;
        let body = r
            .read_exact(hdr.payload_len())
            .map_err(|_| DataLinkError::InvalidFrame)?;

        let (payload, origin) = match hdr.function {
            BvlcFunction::OriginalUnicastNpdu | BvlcFunction::OriginalBroadcastNpdu => (body, src),
            BvlcFunction::ForwardedNpdu => {
                if body.len() < FORWARDED_ORIGIN_LEN {
                    return Err(DataLinkError::InvalidFrame);
                }
                let ip = Ipv4Addr::new(body[0], body[1], body[2], body[3]);
                let port = u16::from_be_bytes([body[4], body[5]]);
                (
                    &body[FORWARDED_ORIGIN_LEN..],
                    SocketAddr::new(IpAddr::V4(ip), port),
                )
            }
            BvlcFunction::Unknown(v) => return Err(DataLinkError::UnsupportedBvlcFunction(v)),
            other => return Err(DataLinkError::UnsupportedBvlcFunction(other.to_u8())),
        };

        if payload.len() > buf.len() {
            return Err(DataLinkError::FrameTooLarge);
        }
        buf[..payload.len()].copy_from_slice(payload);
        Ok((payload.len(), DataLinkAddress::Ip(origin)))
    }
}
