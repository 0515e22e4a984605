use crate::DataLinkAddress;
use std::future::Future;
use thiserror::Error;

/// Errors that can occur at the data-link layer.
#[derive(Debug, Error)]
pub enum DataLinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame too large")]
    FrameTooLarge,
    #[error("invalid frame")]
    InvalidFrame,
    #[error("unsupported BVLC function 0x{0:02x}")]
    UnsupportedBvlcFunction(u8),
}

impl DataLinkError {
    /// Whether the error concerns a single bad frame rather than the link.
    pub fn is_frame_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

/// Sends and receives NPDUs over some BACnet data link.
///
/// [`BacnetIpTransport`](crate::BacnetIpTransport) is the UDP implementation;
/// tests substitute in-memory links. Implementations may use `async fn`; the
/// futures must be `Send` so a session can drive the link from a spawned task.
pub trait DataLink: Send + Sync {
    /// Sends `payload` (an NPDU) to the given data-link `address`.
    fn send(
        &self,
        address: DataLinkAddress,
        payload: &[u8],
    ) -> impl Future<Output = Result<(), DataLinkError>> + Send;

    /// Receives one NPDU into `buf`, returning `(bytes_read, source_address)`.
    fn recv(
        &self,
        buf: &mut [u8],
    ) -> impl Future<Output = Result<(usize, DataLinkAddress), DataLinkError>> + Send;
}
