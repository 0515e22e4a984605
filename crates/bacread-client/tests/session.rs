use bacread_client::{
    ClientError, DatatypeRegistry, DeviceIdentity, ReadDescriptor, ReadPoint, RequestBuilder,
    Response, ResponseDecoder, ServicesSupported, Session, SessionConfig, Value,
};
use bacread_core::apdu::{RejectPdu, UnconfirmedRequestHeader};
use bacread_core::encoding::{reader::Reader, writer::Writer};
use bacread_core::npdu::Npdu;
use bacread_core::services::i_am::IAmRequest;
use bacread_core::services::read_property::{ReadProperty, ReadPropertyAck};
use bacread_core::services::who_is::WhoIsRequest;
use bacread_core::types::{
    DataValue, MaxApdu, ObjectId, ObjectType, PropertyId, RejectReason, Segmentation,
};
use bacread_core::EncodeError;
use bacread_datalink::{DataLink, DataLinkAddress, DataLinkError, NetworkAddress};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

type Frame = (DataLinkAddress, Vec<u8>);

struct MockDataLink {
    outbound: mpsc::UnboundedSender<Frame>,
    inbound: Mutex<mpsc::UnboundedReceiver<Frame>>,
}

/// The far side of a [`MockDataLink`].
struct Wire {
    sent: mpsc::UnboundedReceiver<Frame>,
    deliver: mpsc::UnboundedSender<Frame>,
}

impl Wire {
    async fn next_sent(&mut self) -> Frame {
        tokio::time::timeout(Duration::from_secs(2), self.sent.recv())
            .await
            .expect("nothing sent")
            .expect("link dropped")
    }

    fn deliver(&self, from: DataLinkAddress, npdu: Vec<u8>) {
        self.deliver.send((from, npdu)).unwrap();
    }
}

fn mock() -> (MockDataLink, Wire) {
    let (outbound, sent) = mpsc::unbounded_channel();
    let (deliver, inbound) = mpsc::unbounded_channel();
    (
        MockDataLink {
            outbound,
            inbound: Mutex::new(inbound),
        },
        Wire { sent, deliver },
    )
}

impl DataLink for MockDataLink {
    async fn send(&self, address: DataLinkAddress, payload: &[u8]) -> Result<(), DataLinkError> {
        self.outbound
            .send((address, payload.to_vec()))
            .map_err(|_| DataLinkError::InvalidFrame)
    }

    async fn recv(&self, buf: &mut [u8]) -> Result<(usize, DataLinkAddress), DataLinkError> {
        let Some((address, payload)) = self.inbound.lock().await.recv().await else {
            return std::future::pending().await;
        };
        if payload.len() > buf.len() {
            return Err(DataLinkError::FrameTooLarge);
        }
        buf[..payload.len()].copy_from_slice(&payload);
        Ok((payload.len(), address))
    }
}

const DEVICE_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 20);

fn device() -> DataLinkAddress {
    DataLinkAddress::Ip(SocketAddr::new(IpAddr::V4(DEVICE_IP), 47808))
}

fn identity() -> DeviceIdentity {
    DeviceIdentity::builder("reader", 599)
        .vendor_id(15)
        .build()
        .unwrap()
}

fn session(timeout: Duration) -> (Session<MockDataLink>, Wire) {
    let (link, wire) = mock();
    let config = SessionConfig::default().with_response_timeout(timeout);
    (Session::with_datalink(identity(), link, config), wire)
}

fn frame(
    expecting_reply: bool,
    apdu: impl FnOnce(&mut Writer<'_>) -> Result<(), EncodeError>,
) -> Vec<u8> {
    let mut buf = [0u8; 256];
    let mut w = Writer::new(&mut buf);
    Npdu::local(expecting_reply).encode(&mut w).unwrap();
    apdu(&mut w).unwrap();
    w.as_written().to_vec()
}

/// Splits a sent confirmed request into its invoke id and parameters.
fn parse_request(npdu: &[u8]) -> (u8, ReadProperty) {
    let mut r = Reader::new(npdu);
    assert!(Npdu::decode(&mut r).unwrap().expecting_reply);
    let header = bacread_core::apdu::ConfirmedRequestHeader::decode(&mut r).unwrap();
    assert_eq!(header.service_choice, 12);
    (header.invoke_id, ReadProperty::decode_params(&mut r).unwrap())
}

fn ack(invoke_id: u8, rp: ReadProperty, value: DataValue<'_>) -> Vec<u8> {
    frame(false, |w| {
        ReadPropertyAck {
            object_id: rp.object_id,
            property_id: rp.property_id,
            array_index: rp.array_index,
            values: vec![value],
        }
        .encode(w, invoke_id)
    })
}

fn present_value(instance: u32) -> ReadDescriptor {
    ReadDescriptor::new(
        NetworkAddress::new(IpAddr::V4(DEVICE_IP), ""),
        ObjectType::AnalogInput,
        instance,
        PropertyId::PresentValue,
    )
}

fn registry() -> Arc<DatatypeRegistry> {
    Arc::new(DatatypeRegistry::standard())
}

#[tokio::test]
async fn read_point_round_trip() {
    let (session, mut wire) = session(Duration::from_secs(2));
    let point = ReadPoint::new(session, registry(), present_value(3), 0).unwrap();

    let device_side = async {
        let (to, npdu) = wire.next_sent().await;
        assert_eq!(to, device());
        assert_eq!(&npdu[..2], &[0x01, 0x04]);
        let (invoke_id, rp) = parse_request(&npdu);
        assert_eq!(rp.object_id, ObjectId::new(ObjectType::AnalogInput, 3));
        wire.deliver(device(), ack(invoke_id, rp, DataValue::Real(72.5)));
    };
    let (decoded, ()) = tokio::join!(point.read(), device_side);
    assert_eq!(decoded.unwrap().value, Value::Real(72.5));
}

#[tokio::test]
async fn request_carries_identity_max_apdu() {
    let (link, mut wire) = mock();
    let identity = DeviceIdentity::builder("reader", 1)
        .max_apdu(MaxApdu::UpTo480)
        .segmentation(Segmentation::NoSegmentation)
        .build()
        .unwrap();
    let session = Session::with_datalink(identity, link, SessionConfig::default());
    let request = RequestBuilder::new(registry(), 0)
        .build(&present_value(3))
        .unwrap();

    let exchange = session.submit(&request).await.unwrap();
    let (_, npdu) = wire.next_sent().await;
    // Max APDU code 3 (480 octets).
    assert_eq!(npdu[2], 0x00);
    assert_eq!(npdu[3] & 0x0F, 0x03);
    assert_eq!(npdu[4], exchange.invoke_id());
}

#[tokio::test]
async fn segmented_responses_are_never_requested() {
    let (link, mut wire) = mock();
    let identity = DeviceIdentity::builder("reader", 1).build().unwrap();
    assert_eq!(identity.segmentation(), Segmentation::SegmentedBoth);
    let session = Session::with_datalink(identity, link, SessionConfig::default());
    let descriptor = ReadDescriptor::new(
        NetworkAddress::new(IpAddr::V4(DEVICE_IP), ""),
        ObjectType::Device,
        1,
        PropertyId::ObjectList,
    );
    let request = RequestBuilder::new(registry(), 0)
        .build(&descriptor)
        .unwrap();

    let _exchange = session.submit(&request).await.unwrap();
    let (_, npdu) = wire.next_sent().await;
    assert_eq!(npdu[2] & 0x02, 0, "segmented-response-accepted bit set");
    // The identity still advertises its capability in I-Am.
    assert_eq!(session.identity().i_am().segmentation, Segmentation::SegmentedBoth);
}

#[tokio::test]
async fn concurrent_callers_get_their_own_responses() {
    const CALLERS: u32 = 8;
    let (session, mut wire) = session(Duration::from_secs(2));
    let builder = RequestBuilder::new(registry(), 0);

    let mut callers = Vec::new();
    for instance in 1..=CALLERS {
        let request = builder.build(&present_value(instance)).unwrap();
        let session = session.clone();
        callers.push(tokio::spawn(async move {
            let exchange = session.submit(&request).await.unwrap();
            let response = exchange.wait().await.unwrap();
            let decoded = ResponseDecoder::new(registry()).decode(&response, 0).unwrap();
            (instance, decoded)
        }));
    }

    let mut requests = Vec::new();
    for _ in 0..CALLERS {
        let (_, npdu) = wire.next_sent().await;
        requests.push(parse_request(&npdu));
    }
    assert_eq!(session.in_flight(), CALLERS as usize);
    for (invoke_id, rp) in requests.into_iter().rev() {
        let value = rp.object_id.instance() as f32 * 10.0;
        wire.deliver(device(), ack(invoke_id, rp, DataValue::Real(value)));
    }

    for caller in callers {
        let (instance, decoded) = caller.await.unwrap();
        assert_eq!(decoded.object_id.instance(), instance);
        assert_eq!(decoded.value, Value::Real(instance as f32 * 10.0));
    }
    assert_eq!(session.in_flight(), 0);
}

#[tokio::test]
async fn response_from_another_peer_is_ignored() {
    let (session, mut wire) = session(Duration::from_secs(2));
    let request = RequestBuilder::new(registry(), 0)
        .build(&present_value(3))
        .unwrap();
    let exchange = session.submit(&request).await.unwrap();
    let (_, npdu) = wire.next_sent().await;
    let (invoke_id, rp) = parse_request(&npdu);

    let stranger = DataLinkAddress::Ip(SocketAddr::new(
        IpAddr::V4(Ipv4Addr::new(192, 168, 1, 99)),
        47808,
    ));
    wire.deliver(stranger, ack(invoke_id, rp, DataValue::Real(-1.0)));
    wire.deliver(device(), ack(invoke_id, rp, DataValue::Real(5.0)));

    let response = exchange.wait().await.unwrap();
    let decoded = ResponseDecoder::new(registry()).decode(&response, 0).unwrap();
    assert_eq!(decoded.value, Value::Real(5.0));
}

#[tokio::test]
async fn timeout_removes_the_exchange() {
    let (session, _wire) = session(Duration::from_millis(50));
    let request = RequestBuilder::new(registry(), 0)
        .build(&present_value(3))
        .unwrap();
    let exchange = session.submit(&request).await.unwrap();
    assert_eq!(session.in_flight(), 1);

    let err = exchange.wait().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout));
    assert_eq!(session.in_flight(), 0);
}

#[tokio::test]
async fn close_fails_outstanding_exchanges_once() {
    let (session, _wire) = session(Duration::from_secs(5));
    let request = RequestBuilder::new(registry(), 0)
        .build(&present_value(3))
        .unwrap();
    let first = session.submit(&request).await.unwrap();
    let second = session.submit(&request).await.unwrap();

    let (a, b, ()) = tokio::join!(first.wait(), second.wait(), session.close());
    assert!(matches!(a, Err(ClientError::SessionClosed)));
    assert!(matches!(b, Err(ClientError::SessionClosed)));
    assert!(session.is_closed());
    assert_eq!(session.in_flight(), 0);

    assert!(matches!(
        session.submit(&request).await,
        Err(ClientError::SessionClosed)
    ));
    // A second close is a no-op.
    session.close().await;
}

#[tokio::test]
async fn read_on_closed_session() {
    let (session, _wire) = session(Duration::from_secs(1));
    let point = ReadPoint::new(session.clone(), registry(), present_value(3), 0).unwrap();
    session.close().await;
    assert!(matches!(point.read().await, Err(ClientError::SessionClosed)));
}

#[tokio::test]
async fn who_is_in_range_gets_an_i_am() {
    let (_session, mut wire) = session(Duration::from_secs(1));
    let out_of_range = frame(false, |w| WhoIsRequest::range(1000, 2000).encode(w));
    let in_range = frame(false, |w| WhoIsRequest::range(500, 600).encode(w));
    wire.deliver(device(), out_of_range);
    wire.deliver(device(), in_range);

    let (to, npdu) = wire.next_sent().await;
    assert_eq!(to, device());
    let mut r = Reader::new(&npdu);
    assert!(!Npdu::decode(&mut r).unwrap().expecting_reply);
    assert_eq!(UnconfirmedRequestHeader::decode(&mut r).unwrap().service_choice, 0);
    let i_am = IAmRequest::decode_after_header(&mut r).unwrap();
    assert_eq!(i_am, identity().i_am());
    assert_eq!(i_am.device_id, ObjectId::new(ObjectType::Device, 599));
    assert_eq!(i_am.vendor_id, 15);
}

#[tokio::test]
async fn unsupported_confirmed_service_is_rejected() {
    let (_session, mut wire) = session(Duration::from_secs(1));
    let incoming = frame(true, |w| {
        ReadProperty {
            object_id: ObjectId::new(ObjectType::Device, 599),
            property_id: PropertyId::ObjectName,
            array_index: None,
        }
        .encode_request(w, 9, MaxApdu::UpTo1476, false)
    });
    wire.deliver(device(), incoming);

    let (to, npdu) = wire.next_sent().await;
    assert_eq!(to, device());
    let mut r = Reader::new(&npdu);
    Npdu::decode(&mut r).unwrap();
    assert_eq!(
        RejectPdu::decode(&mut r).unwrap(),
        RejectPdu {
            invoke_id: 9,
            reason: RejectReason::UnrecognizedService,
        }
    );
}

#[tokio::test]
async fn supported_service_is_not_rejected() {
    let (link, mut wire) = mock();
    let identity = DeviceIdentity::builder("reader", 599)
        .services(ServicesSupported::empty().with(12))
        .build()
        .unwrap();
    let _session = Session::with_datalink(identity, link, SessionConfig::default());
    let incoming = frame(true, |w| {
        ReadProperty {
            object_id: ObjectId::new(ObjectType::Device, 599),
            property_id: PropertyId::ObjectName,
            array_index: None,
        }
        .encode_request(w, 9, MaxApdu::UpTo1476, false)
    });
    wire.deliver(device(), incoming);
    wire.deliver(device(), frame(false, |w| WhoIsRequest::global().encode(w)));

    // The only reply is the I-Am.
    let (_, npdu) = wire.next_sent().await;
    assert_eq!(&npdu[2..4], &[0x10, 0x00]);
}

#[tokio::test]
async fn segmented_ack_is_aborted() {
    let (session, mut wire) = session(Duration::from_secs(2));
    let request = RequestBuilder::new(registry(), 0)
        .build(&present_value(3))
        .unwrap();
    let exchange = session.submit(&request).await.unwrap();
    let (_, npdu) = wire.next_sent().await;
    let (invoke_id, _) = parse_request(&npdu);

    wire.deliver(device(), vec![0x01, 0x00, 0x3C, invoke_id, 0, 4, 12, 0x0C]);
    let response = exchange.wait().await.unwrap();
    assert!(matches!(response, Response::Segmented(_)));

    let (to, npdu) = wire.next_sent().await;
    assert_eq!(to, device());
    assert_eq!(&npdu[2..], &[0x70, invoke_id, 4]);

    let err = ResponseDecoder::new(registry())
        .decode(&response, 0)
        .unwrap_err();
    assert!(matches!(err, ClientError::UnexpectedResponse { .. }));
}

#[tokio::test]
async fn read_each_reports_every_trigger() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (session, mut wire) = session(Duration::from_millis(100));
    let point = ReadPoint::new(session, registry(), present_value(3), 0).unwrap();

    let device_side = async {
        let (_, npdu) = wire.next_sent().await;
        let (invoke_id, rp) = parse_request(&npdu);
        wire.deliver(device(), ack(invoke_id, rp, DataValue::Real(21.0)));
        // The remaining requests go unanswered.
    };
    let (outcomes, ()) = tokio::join!(point.read_each(0..3), device_side);
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].as_ref().unwrap().value, Value::Real(21.0));
    assert!(matches!(outcomes[1], Err(ClientError::Timeout)));
    assert!(matches!(outcomes[2], Err(ClientError::Timeout)));
}

#[tokio::test]
async fn run_reads_once_per_trigger() {
    let (session, mut wire) = session(Duration::from_secs(2));
    let point = ReadPoint::new(session, registry(), present_value(7), 0).unwrap();
    let (trigger_tx, trigger_rx) = mpsc::channel(4);
    let (outcome_tx, mut outcome_rx) =
        mpsc::channel::<Result<bacread_client::DecodedValue, ClientError>>(4);

    let driver = async {
        for value in [1.0f32, 2.0] {
            trigger_tx.send(()).await.unwrap();
            let (_, npdu) = wire.next_sent().await;
            let (invoke_id, rp) = parse_request(&npdu);
            wire.deliver(device(), ack(invoke_id, rp, DataValue::Real(value)));
            let outcome = outcome_rx.recv().await.unwrap().unwrap();
            assert_eq!(outcome.value, Value::Real(value));
        }
        drop(trigger_tx);
    };
    tokio::join!(point.run(trigger_rx, outcome_tx), driver);
}
