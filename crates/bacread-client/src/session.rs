//! One BACnet/IP endpoint shared by every in-flight ReadProperty.
//!
//! A session owns the data link and a table of pending exchanges keyed by
//! invoke id. Callers [`submit`](Session::submit) a request and await the
//! returned [`PendingExchange`]; a single receive task classifies incoming
//! APDUs and completes the matching exchange, so responses may arrive in any
//! order. The same task answers Who-Is for the session's device and rejects
//! confirmed requests it does not serve.

use crate::{ClientError, DeviceIdentity, ReadPropertyRequest, SessionConfig};
use bacread_core::apdu::{
    AbortPdu, ApduType, ConfirmedRequestHeader, RejectPdu, UnconfirmedRequestHeader,
};
use bacread_core::encoding::{reader::Reader, writer::Writer};
use bacread_core::npdu::Npdu;
use bacread_core::services::i_am::IAmRequest;
use bacread_core::services::who_is::WhoIsRequest;
use bacread_core::services::SERVICE_WHO_IS;
use bacread_core::types::{AbortReason, RejectReason};
use bacread_core::EncodeError;
use bacread_datalink::{BacnetIpTransport, DataLink, DataLinkAddress, NetworkAddress};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// NPDU plus the largest APDU this session ever originates.
const MAX_OUTGOING_LEN: usize = 64;
const RECV_ERROR_BACKOFF: Duration = Duration::from_millis(50);
const COMPLEX_ACK_SEGMENTED: u8 = 0x08;
const ABORT_FROM_SERVER: u8 = 0x01;

/// A classified reply to a confirmed request, carrying the raw APDU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    ComplexAck(Vec<u8>),
    SimpleAck(Vec<u8>),
    Error(Vec<u8>),
    Reject(Vec<u8>),
    Abort(Vec<u8>),
    /// A segmented complex ack. Only its first segment is kept.
    Segmented(Vec<u8>),
}

impl Response {
    pub fn apdu(&self) -> &[u8] {
        match self {
            Self::ComplexAck(apdu)
            | Self::SimpleAck(apdu)
            | Self::Error(apdu)
            | Self::Reject(apdu)
            | Self::Abort(apdu)
            | Self::Segmented(apdu) => apdu,
        }
    }

    /// Splits out the invoke id. `None` for anything that cannot complete a
    /// client exchange.
    fn classify(apdu: &[u8]) -> Option<(u8, Self)> {
        let b0 = *apdu.first()?;
        let invoke_id = *apdu.get(1)?;
        let owned = apdu.to_vec();
        let response = match ApduType::of(apdu)? {
            ApduType::SimpleAck => Self::SimpleAck(owned),
            ApduType::ComplexAck if b0 & COMPLEX_ACK_SEGMENTED != 0 => Self::Segmented(owned),
            ApduType::ComplexAck => Self::ComplexAck(owned),
            ApduType::Error => Self::Error(owned),
            ApduType::Reject => Self::Reject(owned),
            ApduType::Abort if b0 & ABORT_FROM_SERVER != 0 => Self::Abort(owned),
            _ => return None,
        };
        Some((invoke_id, response))
    }
}

struct PendingEntry {
    token: u64,
    peer: DataLinkAddress,
    tx: oneshot::Sender<Response>,
}

#[derive(Default)]
struct PendingTable {
    entries: HashMap<u8, PendingEntry>,
    next_invoke_id: u8,
    next_token: u64,
    closed: bool,
}

impl PendingTable {
    fn insert(
        &mut self,
        peer: DataLinkAddress,
        tx: oneshot::Sender<Response>,
    ) -> Result<(u8, u64), ClientError> {
        if self.closed {
            return Err(ClientError::SessionClosed);
        }
        for _ in 0..=u8::MAX {
            let invoke_id = self.next_invoke_id;
            self.next_invoke_id = invoke_id.wrapping_add(1);
            if self.entries.contains_key(&invoke_id) {
                continue;
            }
            let token = self.next_token;
            self.next_token += 1;
            self.entries
                .insert(invoke_id, PendingEntry { token, peer, tx });
            return Ok((invoke_id, token));
        }
        Err(ClientError::InvokeIdsExhausted)
    }

    /// Hands `response` to the exchange waiting on (`invoke_id`, `source`).
    fn complete(&mut self, invoke_id: u8, source: DataLinkAddress, response: Response) -> bool {
        match self.entries.get(&invoke_id) {
            Some(entry) if entry.peer == source => {}
            _ => return false,
        }
        if let Some(entry) = self.entries.remove(&invoke_id) {
            // The waiter may already have timed out.
            let _ = entry.tx.send(response);
        }
        true
    }

    /// Removes the entry only if it still belongs to the exchange holding
    /// `token`; the id may have been reused since.
    fn remove(&mut self, invoke_id: u8, token: u64) {
        if matches!(self.entries.get(&invoke_id), Some(entry) if entry.token == token) {
            self.entries.remove(&invoke_id);
        }
    }

    fn close(&mut self) -> Vec<PendingEntry> {
        self.closed = true;
        self.entries.drain().map(|(_, entry)| entry).collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Unsolicited APDUs the receive task sends.
enum Reply {
    IAm(IAmRequest),
    Reject(RejectPdu),
    Abort(AbortPdu),
}

impl Reply {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        Npdu::local(false).encode(w)?;
        match self {
            Self::IAm(i_am) => i_am.encode(w),
            Self::Reject(reject) => reject.encode(w),
            Self::Abort(abort) => abort.encode(w),
        }
    }
}

struct Inner<D> {
    identity: DeviceIdentity,
    config: SessionConfig,
    link: Mutex<Option<Arc<D>>>,
    pending: Mutex<PendingTable>,
    write_lock: tokio::sync::Mutex<()>,
    receiver: Mutex<Option<JoinHandle<()>>>,
}

impl<D> Drop for Inner<D> {
    fn drop(&mut self) {
        let receiver = self
            .receiver
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = receiver.take() {
            task.abort();
        }
    }
}

impl<D: DataLink> Inner<D> {
    async fn send(
        &self,
        link: &D,
        destination: DataLinkAddress,
        npdu: &[u8],
    ) -> Result<(), ClientError> {
        let _guard = self.write_lock.lock().await;
        link.send(destination, npdu).await?;
        Ok(())
    }

    async fn reply(&self, link: &D, destination: DataLinkAddress, reply: Reply) {
        let mut buf = [0u8; MAX_OUTGOING_LEN];
        let mut w = Writer::new(&mut buf);
        if let Err(err) = reply.encode(&mut w) {
            log::warn!("failed to encode reply to {destination}: {err}");
            return;
        }
        if let Err(err) = self.send(link, destination, w.as_written()).await {
            log::warn!("failed to send reply to {destination}: {err}");
        }
    }

    async fn dispatch(&self, link: &D, npdu: &[u8], source: DataLinkAddress) {
        let mut r = Reader::new(npdu);
        let header = match Npdu::decode(&mut r) {
            Ok(header) => header,
            Err(err) => {
                log::debug!("dropping undecodable NPDU from {source}: {err}");
                return;
            }
        };
        if let Some(message) = header.network_message {
            log::debug!("ignoring network message 0x{message:02x} from {source}");
            return;
        }
        let apdu = r.read_rest();
        match ApduType::of(apdu) {
            Some(ApduType::ConfirmedRequest) => self.confirmed_request(link, apdu, source).await,
            Some(ApduType::UnconfirmedRequest) => {
                self.unconfirmed_request(link, apdu, source).await
            }
            Some(ApduType::SegmentAck) | None => {
                log::debug!("ignoring APDU {:02x?} from {source}", apdu.first());
            }
            Some(_) => self.response(link, apdu, source).await,
        }
    }

    async fn response(&self, link: &D, apdu: &[u8], source: DataLinkAddress) {
        let Some((invoke_id, response)) = Response::classify(apdu) else {
            log::debug!("ignoring client-side PDU {:02x?} from {source}", apdu.first());
            return;
        };
        let segmented = matches!(response, Response::Segmented(_));
        let matched = lock(&self.pending).complete(invoke_id, source, response);
        if !matched {
            log::debug!("no pending exchange for invoke id {invoke_id} from {source}");
            return;
        }
        log::debug!("completed invoke id {invoke_id} from {source}");
        if segmented {
            let abort = AbortPdu {
                server: false,
                invoke_id,
                reason: AbortReason::SegmentationNotSupported,
            };
            self.reply(link, source, Reply::Abort(abort)).await;
        }
    }

    async fn confirmed_request(&self, link: &D, apdu: &[u8], source: DataLinkAddress) {
        let header = match ConfirmedRequestHeader::decode(&mut Reader::new(apdu)) {
            Ok(header) => header,
            Err(err) => {
                log::debug!("dropping malformed confirmed request from {source}: {err}");
                return;
            }
        };
        if self.identity.services().contains(header.service_choice) {
            log::debug!(
                "no handler for confirmed service {} from {source}",
                header.service_choice
            );
            return;
        }
        log::debug!(
            "rejecting confirmed service {} from {source}",
            header.service_choice
        );
        let reject = RejectPdu {
            invoke_id: header.invoke_id,
            reason: RejectReason::UnrecognizedService,
        };
        self.reply(link, source, Reply::Reject(reject)).await;
    }

    async fn unconfirmed_request(&self, link: &D, apdu: &[u8], source: DataLinkAddress) {
        let mut r = Reader::new(apdu);
        let who_is = match UnconfirmedRequestHeader::decode(&mut r) {
            Ok(header) if header.service_choice == SERVICE_WHO_IS => {
                WhoIsRequest::decode_after_header(&mut r)
            }
            Ok(_) => return,
            Err(err) => Err(err),
        };
        match who_is {
            Ok(who_is) if who_is.matches(self.identity.device_id().instance()) => {
                log::debug!("answering who-is from {source}");
                self.reply(link, source, Reply::IAm(self.identity.i_am())).await;
            }
            Ok(_) => {}
            Err(err) => log::debug!("dropping malformed who-is from {source}: {err}"),
        }
    }
}

async fn receive_loop<D: DataLink>(link: Arc<D>, session: Weak<Inner<D>>, buffer_len: usize) {
    let mut buf = vec![0u8; buffer_len];
    loop {
        let (n, source) = match link.recv(&mut buf).await {
            Ok(received) => received,
            Err(err) if err.is_frame_error() => {
                log::debug!("dropping frame: {err}");
                continue;
            }
            Err(err) => {
                log::warn!("receive failed: {err}");
                tokio::time::sleep(RECV_ERROR_BACKOFF).await;
                continue;
            }
        };
        let Some(inner) = session.upgrade() else {
            break;
        };
        inner.dispatch(&link, &buf[..n], source).await;
    }
}

/// A shared BACnet endpoint. Clones refer to the same session.
pub struct Session<D> {
    inner: Arc<Inner<D>>,
}

impl<D> Clone for Session<D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Session<BacnetIpTransport> {
    /// Binds a UDP endpoint at `local_address` (`host[/prefix][:port]`) and
    /// starts serving it. Must be called within a tokio runtime.
    pub async fn open(
        identity: DeviceIdentity,
        local_address: &NetworkAddress,
        config: SessionConfig,
    ) -> Result<Self, ClientError> {
        let address = local_address.socket_addr()?;
        let transport = BacnetIpTransport::bind(address)
            .await
            .map_err(|source| ClientError::Bind { address, source })?;
        log::debug!(
            "opened session for {} at {}",
            identity.device_id(),
            transport.local_addr().unwrap_or(address)
        );
        Ok(Self::with_datalink(identity, transport, config))
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ClientError> {
        Ok(self.link()?.local_addr()?)
    }
}

impl<D: DataLink + 'static> Session<D> {
    /// Starts a session over an existing data link. Must be called within a
    /// tokio runtime.
    pub fn with_datalink(identity: DeviceIdentity, datalink: D, config: SessionConfig) -> Self {
        let link = Arc::new(datalink);
        let inner = Arc::new(Inner {
            identity,
            config,
            link: Mutex::new(Some(link.clone())),
            pending: Mutex::new(PendingTable::default()),
            write_lock: tokio::sync::Mutex::new(()),
            receiver: Mutex::new(None),
        });
        let task = tokio::spawn(receive_loop(
            link,
            Arc::downgrade(&inner),
            config.receive_buffer(),
        ));
        *lock(&inner.receiver) = Some(task);
        Self { inner }
    }

    /// Sends `request` and returns the exchange to await its response.
    pub async fn submit(
        &self,
        request: &ReadPropertyRequest,
    ) -> Result<PendingExchange<D>, ClientError> {
        let link = self.link()?;
        let (tx, rx) = oneshot::channel();
        let (invoke_id, token) = lock(&self.inner.pending).insert(request.destination, tx)?;
        // Dropping the exchange on any error below removes its entry.
        let exchange = PendingExchange {
            inner: self.inner.clone(),
            invoke_id,
            token,
            peer: request.destination,
            rx,
            deadline: Instant::now() + self.inner.config.response_timeout(),
        };

        let identity = &self.inner.identity;
        let mut buf = [0u8; MAX_OUTGOING_LEN];
        let mut w = Writer::new(&mut buf);
        Npdu::local(true).encode(&mut w)?;
        // Segments are never reassembled, so never ask for them.
        request
            .service
            .encode_request(&mut w, invoke_id, identity.max_apdu(), false)?;
        self.inner
            .send(&link, request.destination, w.as_written())
            .await?;
        log::debug!(
            "sent invoke id {invoke_id} to {}: {:02x?}",
            request.destination,
            w.as_written()
        );
        Ok(exchange)
    }
}

impl<D> Session<D> {
    pub fn identity(&self) -> &DeviceIdentity {
        &self.inner.identity
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.inner.link).is_none()
    }

    /// Number of exchanges awaiting a response.
    pub fn in_flight(&self) -> usize {
        lock(&self.inner.pending).entries.len()
    }

    fn link(&self) -> Result<Arc<D>, ClientError> {
        lock(&self.inner.link)
            .clone()
            .ok_or(ClientError::SessionClosed)
    }

    /// Stops the receive task, releases the link and fails every outstanding
    /// exchange with [`ClientError::SessionClosed`]. Idempotent.
    pub async fn close(&self) {
        let link = lock(&self.inner.link).take();
        if link.is_none() {
            return;
        }
        let receiver = lock(&self.inner.receiver).take();
        // Dropping the senders completes each waiter exactly once.
        let orphaned = lock(&self.inner.pending).close();
        log::debug!(
            "closing session with {} exchange(s) outstanding",
            orphaned.len()
        );
        drop(orphaned);
        if let Some(task) = receiver {
            task.abort();
            let _ = task.await;
        }
    }
}

/// An in-flight request. Dropping it abandons the exchange.
pub struct PendingExchange<D> {
    inner: Arc<Inner<D>>,
    invoke_id: u8,
    token: u64,
    peer: DataLinkAddress,
    rx: oneshot::Receiver<Response>,
    deadline: Instant,
}

impl<D> PendingExchange<D> {
    pub fn invoke_id(&self) -> u8 {
        self.invoke_id
    }

    pub fn peer(&self) -> DataLinkAddress {
        self.peer
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Waits for the response until the deadline set at submission.
    pub async fn wait(mut self) -> Result<Response, ClientError> {
        match tokio::time::timeout_at(self.deadline, &mut self.rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(ClientError::SessionClosed),
            Err(_) => match self.rx.try_recv() {
                Ok(response) => Ok(response),
                Err(_) => {
                    log::debug!(
                        "invoke id {} to {} timed out",
                        self.invoke_id,
                        self.peer
                    );
                    Err(ClientError::Timeout)
                }
            },
        }
    }
}

impl<D> Drop for PendingExchange<D> {
    fn drop(&mut self) {
        lock(&self.inner.pending).remove(self.invoke_id, self.token);
    }
}
