//! Turning a caller's read description into a wire-ready request.

use crate::ClientError;
use bacread_core::datatype::{DatatypeRegistry, ObjectTypeRef, PropertyRef};
use bacread_core::services::read_property::ReadProperty;
use bacread_core::types::ObjectId;
use bacread_datalink::{DataLinkAddress, NetworkAddress};
use std::sync::Arc;

/// What to read and from where, as the caller spelled it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadDescriptor {
    pub destination: NetworkAddress,
    pub object_type: ObjectTypeRef,
    pub instance: u32,
    pub property: PropertyRef,
    pub array_index: Option<u32>,
}

impl ReadDescriptor {
    pub fn new(
        destination: NetworkAddress,
        object_type: impl Into<ObjectTypeRef>,
        instance: u32,
        property: impl Into<PropertyRef>,
    ) -> Self {
        Self {
            destination,
            object_type: object_type.into(),
            instance,
            property: property.into(),
            array_index: None,
        }
    }

    pub fn with_array_index(mut self, index: u32) -> Self {
        self.array_index = Some(index);
        self
    }
}

/// A validated ReadProperty ready to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadPropertyRequest {
    pub destination: DataLinkAddress,
    pub service: ReadProperty,
}

/// Validates descriptors against a datatype registry.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    registry: Arc<DatatypeRegistry>,
    vendor_id: u16,
}

impl RequestBuilder {
    pub fn new(registry: Arc<DatatypeRegistry>, vendor_id: u16) -> Self {
        Self {
            registry,
            vendor_id,
        }
    }

    pub fn build(&self, descriptor: &ReadDescriptor) -> Result<ReadPropertyRequest, ClientError> {
        let object_type = self
            .registry
            .object_type(&descriptor.object_type, self.vendor_id)?;
        let property_id =
            self.registry
                .property(object_type, &descriptor.property, self.vendor_id)?;

        // The decoder re-resolves from the ack; this only rejects reads that
        // could never be decoded.
        self.registry
            .lookup(object_type, property_id, self.vendor_id)?;

        let object_id = ObjectId::try_new(object_type, descriptor.instance).ok_or(
            ClientError::InvalidInstance {
                object_type,
                instance: descriptor.instance,
            },
        )?;
        let destination = descriptor.destination.data_link()?;

        let request = ReadPropertyRequest {
            destination,
            service: ReadProperty {
                object_id,
                property_id,
                array_index: descriptor.array_index,
            },
        };
        log::debug!(
            "read property {} {} {}{} -> {}",
            descriptor.destination,
            object_id,
            property_id,
            descriptor
                .array_index
                .map(|i| format!("[{i}]"))
                .unwrap_or_default(),
            destination
        );
        Ok(request)
    }
}
