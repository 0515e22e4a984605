use std::time::Duration;

/// Largest NPDU a BACnet/IP frame can carry.
const DEFAULT_RECEIVE_BUFFER: usize = 1497;

/// Tunables for a [`Session`](crate::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    response_timeout: Duration,
    receive_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            response_timeout: Duration::from_secs(3),
            receive_buffer: DEFAULT_RECEIVE_BUFFER,
        }
    }
}

impl SessionConfig {
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Size of the buffer each received NPDU is copied into.
    pub fn with_receive_buffer(mut self, len: usize) -> Self {
        self.receive_buffer = len.max(1);
        self
    }

    pub fn response_timeout(&self) -> Duration {
        self.response_timeout
    }

    pub fn receive_buffer(&self) -> usize {
        self.receive_buffer
    }
}
