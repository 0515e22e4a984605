use bacread_core::apdu::{AbortPdu, ApduType, RejectPdu};
use bacread_core::encoding::{reader::Reader, writer::Writer};
use bacread_core::npdu::Npdu;
use bacread_core::services::i_am::IAmRequest;
use bacread_core::services::read_property::{ReadProperty, ReadPropertyAck};
use bacread_core::services::who_is::WhoIsRequest;
use bacread_core::types::{
    AbortReason, DataValue, MaxApdu, ObjectId, ObjectType, PropertyId, RejectReason, Segmentation,
};

#[test]
fn read_property_frame_matches_fixture() {
    let mut buf = [0u8; 64];
    let mut w = Writer::new(&mut buf);
    Npdu::local(true).encode(&mut w).unwrap();
    ReadProperty {
        object_id: ObjectId::new(ObjectType::Device, 123),
        property_id: PropertyId::ObjectName,
        array_index: None,
    }
    .encode_request(&mut w, 1, MaxApdu::UpTo1476, true)
    .unwrap();

    assert_eq!(
        w.as_written(),
        &[0x01, 0x04, 0x02, 0x05, 0x01, 0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19, 0x4D]
    );
}

#[test]
fn present_value_request_matches_fixture() {
    let mut buf = [0u8; 64];
    let mut w = Writer::new(&mut buf);
    Npdu::local(true).encode(&mut w).unwrap();
    ReadProperty {
        object_id: ObjectId::new(ObjectType::AnalogInput, 3),
        property_id: PropertyId::PresentValue,
        array_index: None,
    }
    .encode_request(&mut w, 0x2A, MaxApdu::UpTo1024, false)
    .unwrap();

    assert_eq!(
        w.as_written(),
        &[0x01, 0x04, 0x00, 0x04, 0x2A, 0x0C, 0x0C, 0x00, 0x00, 0x00, 0x03, 0x19, 0x55]
    );
}

#[test]
fn who_is_global_frame_matches_fixture() {
    let mut buf = [0u8; 32];
    let mut w = Writer::new(&mut buf);
    Npdu::local(false).encode(&mut w).unwrap();
    WhoIsRequest::global().encode(&mut w).unwrap();

    assert_eq!(w.as_written(), &[0x01, 0x00, 0x10, 0x08]);
}

#[test]
fn i_am_frame_matches_fixture() {
    let mut buf = [0u8; 32];
    let mut w = Writer::new(&mut buf);
    Npdu::local(false).encode(&mut w).unwrap();
    IAmRequest {
        device_id: ObjectId::new(ObjectType::Device, 599),
        max_apdu: 1476,
        segmentation: Segmentation::NoSegmentation,
        vendor_id: 260,
    }
    .encode(&mut w)
    .unwrap();

    assert_eq!(
        w.as_written(),
        &[
            0x01, 0x00, 0x10, 0x00, 0xC4, 0x02, 0x00, 0x02, 0x57, 0x22, 0x05, 0xC4, 0x91, 0x03,
            0x22, 0x01, 0x04,
        ]
    );
}

#[test]
fn present_value_ack_fixture_decodes() {
    let frame = [
        0x01, 0x00, // NPDU
        0x30, 0x2A, 0x0C, // complex ack, invoke 42, ReadProperty
        0x0C, 0x00, 0x00, 0x00, 0x03, // analog-input 3
        0x19, 0x55, // present-value
        0x3E, 0x44, 0x42, 0x91, 0x00, 0x00, 0x3F, // 72.5
    ];
    let mut r = Reader::new(&frame);
    let npdu = Npdu::decode(&mut r).unwrap();
    assert!(!npdu.expecting_reply);

    let apdu = r.read_rest();
    assert_eq!(ApduType::of(apdu), Some(ApduType::ComplexAck));
    let ack = ReadPropertyAck::decode(apdu).unwrap();
    assert_eq!(ack.object_id, ObjectId::new(ObjectType::AnalogInput, 3));
    assert_eq!(ack.property_id, PropertyId::PresentValue);
    assert_eq!(ack.values, vec![DataValue::Real(72.5)]);
}

#[test]
fn reject_and_abort_fixtures_decode() {
    let reject = RejectPdu::decode(&mut Reader::new(&[0x60, 0x07, 0x09])).unwrap();
    assert_eq!(reject.invoke_id, 7);
    assert_eq!(reject.reason, RejectReason::UnrecognizedService);

    let abort = AbortPdu::decode(&mut Reader::new(&[0x71, 0x07, 0x04])).unwrap();
    assert!(abort.server);
    assert_eq!(abort.reason, AbortReason::SegmentationNotSupported);
}
