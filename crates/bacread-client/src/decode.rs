use crate::{ClientError, DecodedValue, Response, Value};
use bacread_core::apdu::{AbortPdu, ComplexAckHeader, ErrorPdu, RejectPdu};
use bacread_core::datatype::{Datatype, DatatypeRegistry, ResolvedDatatype};
use bacread_core::encoding::reader::Reader;
use bacread_core::services::read_property::ReadPropertyAck;
use bacread_core::services::SERVICE_READ_PROPERTY;
use bacread_core::types::DataValue;
use std::sync::Arc;

/// Turns ReadProperty responses into typed values.
#[derive(Debug, Clone)]
pub struct ResponseDecoder {
    registry: Arc<DatatypeRegistry>,
}

impl ResponseDecoder {
    pub fn new(registry: Arc<DatatypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &DatatypeRegistry {
        &self.registry
    }

    /// Decodes `response` against the datatype the registry gives for the
    /// acknowledged object and property as served by `vendor_id`.
    pub fn decode(&self, response: &Response, vendor_id: u16) -> Result<DecodedValue, ClientError> {
        let apdu = match response {
            Response::ComplexAck(apdu) => apdu,
            other => {
                let description = describe(other);
                log::warn!("not an ack: {description}");
                log::debug!("response pdu {:02x?}", other.apdu());
                return Err(unexpected(description, other.apdu()));
            }
        };

        let header = ComplexAckHeader::decode(&mut Reader::new(apdu))?;
        if header.service_choice != SERVICE_READ_PROPERTY {
            return Err(unexpected(
                format!("complex ack for service {}", header.service_choice),
                apdu,
            ));
        }
        let ack = ReadPropertyAck::decode(apdu)?;
        let object_type = ack.object_id.object_type();
        let resolved = self
            .registry
            .lookup(object_type, ack.property_id, vendor_id)
            .map_err(|_| ClientError::UnknownDatatype {
                object_type,
                property: ack.property_id,
            })?;

        let (datatype, value) = match (resolved, ack.array_index) {
            (ResolvedDatatype::Array(_), Some(0)) => (
                ResolvedDatatype::Scalar(Datatype::Unsigned),
                single(&ack.values, Datatype::Unsigned)?,
            ),
            (ResolvedDatatype::Array(element), Some(_)) => (
                ResolvedDatatype::Scalar(element),
                single(&ack.values, element)?,
            ),
            (ResolvedDatatype::Array(element) | ResolvedDatatype::List(element), _) => {
                (resolved, sequence(&ack.values, element)?)
            }
            (ResolvedDatatype::Scalar(datatype), _) => (resolved, single(&ack.values, datatype)?),
        };

        let decoded = DecodedValue {
            object_id: ack.object_id,
            property_id: ack.property_id,
            array_index: ack.array_index,
            datatype,
            value,
        };
        log::info!(
            "{} {}{} = {} ({})",
            decoded.object_id,
            decoded.property_id,
            decoded
                .array_index
                .map(|i| format!("[{i}]"))
                .unwrap_or_default(),
            decoded.value,
            decoded.datatype
        );
        Ok(decoded)
    }
}

fn unexpected(description: String, apdu: &[u8]) -> ClientError {
    ClientError::UnexpectedResponse {
        description,
        pdu: apdu.to_vec(),
    }
}

fn describe(response: &Response) -> String {
    let mut r = Reader::new(response.apdu());
    match response {
        Response::SimpleAck(_) => "simple ack".to_string(),
        Response::Error(_) => match ErrorPdu::decode(&mut r) {
            Ok(ErrorPdu {
                error_class: Some(class),
                error_code: Some(code),
                ..
            }) => format!("error class {class}, code {code}"),
            Ok(_) => "error without class or code".to_string(),
            Err(err) => format!("malformed error pdu: {err}"),
        },
        Response::Reject(_) => match RejectPdu::decode(&mut r) {
            Ok(reject) => format!("reject: {}", reject.reason),
            Err(err) => format!("malformed reject pdu: {err}"),
        },
        Response::Abort(_) => match AbortPdu::decode(&mut r) {
            Ok(abort) => format!("abort: {}", abort.reason),
            Err(err) => format!("malformed abort pdu: {err}"),
        },
        Response::Segmented(_) => "segmented complex ack (segmentation not supported)".to_string(),
        Response::ComplexAck(_) => "complex ack".to_string(),
    }
}

fn cast(value: &DataValue<'_>, datatype: Datatype) -> Result<Value, ClientError> {
    if !datatype.accepts(value) {
        return Err(ClientError::ValueMismatch {
            expected: datatype,
            found: value.kind(),
        });
    }
    Ok(Value::from(value))
}

/// Exactly one value of `datatype`. An `any`-typed property may carry several
/// tagged values; those come back as a sequence.
fn single(values: &[DataValue<'_>], datatype: Datatype) -> Result<Value, ClientError> {
    match values {
        [value] => cast(value, datatype),
        _ if datatype == Datatype::Any => sequence(values, datatype),
        [] => Err(ClientError::ValueMismatch {
            expected: datatype,
            found: "no value",
        }),
        _ => Err(ClientError::ValueMismatch {
            expected: datatype,
            found: "several values",
        }),
    }
}

fn sequence(values: &[DataValue<'_>], element: Datatype) -> Result<Value, ClientError> {
    values
        .iter()
        .map(|value| cast(value, element))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Sequence)
}
