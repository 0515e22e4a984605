use bacread_core::datatype::{Datatype, LookupError};
use bacread_core::types::{ObjectType, PropertyId};
use bacread_datalink::{AddressError, DataLinkError};
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("address resolution failed: {0}")]
    Resolution(#[from] AddressError),
    #[error("unknown object type '{0}'")]
    UnknownObjectType(String),
    #[error("unknown property '{property}' for object type {object_type}")]
    UnknownProperty {
        object_type: ObjectType,
        property: String,
    },
    #[error("no datatype known for {object_type} {property}")]
    UnknownDatatype {
        object_type: ObjectType,
        property: PropertyId,
    },
    #[error("object identifier out of range: type {object_type}, instance {instance}")]
    InvalidInstance {
        object_type: ObjectType,
        instance: u32,
    },
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: DataLinkError,
    },
    #[error("request timed out")]
    Timeout,
    #[error("unexpected response: {description}")]
    UnexpectedResponse { description: String, pdu: Vec<u8> },
    #[error("session closed")]
    SessionClosed,
    #[error("all invoke ids are in flight")]
    InvokeIdsExhausted,
    #[error("expected {expected}, found {found}")]
    ValueMismatch {
        expected: Datatype,
        found: &'static str,
    },
    #[error("datalink error: {0}")]
    DataLink(#[from] DataLinkError),
    #[error("encode error: {0}")]
    Encode(#[from] bacread_core::EncodeError),
    #[error("decode error: {0}")]
    Decode(#[from] bacread_core::DecodeError),
}

impl ClientError {
    /// Errors a caller may reasonably retry with the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::UnexpectedResponse { .. })
    }
}

impl From<LookupError> for ClientError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::UnknownObjectType(name) => Self::UnknownObjectType(name),
            LookupError::UnknownProperty {
                object_type,
                property,
            } => Self::UnknownProperty {
                object_type,
                property,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClientError;
    use bacread_core::datatype::LookupError;
    use bacread_core::types::ObjectType;

    #[test]
    fn lookup_errors_map_to_matching_variants() {
        let err = ClientError::from(LookupError::UnknownObjectType("gizmo".into()));
        assert!(matches!(err, ClientError::UnknownObjectType(ref n) if n == "gizmo"));

        let err = ClientError::from(LookupError::UnknownProperty {
            object_type: ObjectType::AnalogInput,
            property: "flux".into(),
        });
        assert_eq!(
            err.to_string(),
            "unknown property 'flux' for object type analogInput"
        );
    }

    #[test]
    fn only_timeouts_and_unexpected_responses_are_retryable() {
        assert!(ClientError::Timeout.is_retryable());
        assert!(ClientError::UnexpectedResponse {
            description: "abort: other".into(),
            pdu: vec![0x71, 1, 0],
        }
        .is_retryable());
        assert!(!ClientError::SessionClosed.is_retryable());
        assert!(!ClientError::InvokeIdsExhausted.is_retryable());
    }
}
