//! The local device a session presents to the network.

use crate::ClientError;
use bacread_core::services::i_am::IAmRequest;
use bacread_core::types::{MaxApdu, ObjectId, ObjectType, Segmentation};

/// Bitmask over confirmed service choices (bit `n` = service choice `n`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServicesSupported(u64);

impl ServicesSupported {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Adds a confirmed service choice. Choices above 63 do not exist.
    pub const fn with(self, service_choice: u8) -> Self {
        if service_choice < 64 {
            Self(self.0 | (1 << service_choice))
        } else {
            self
        }
    }

    pub const fn contains(self, service_choice: u8) -> bool {
        service_choice < 64 && self.0 & (1 << service_choice) != 0
    }

    pub const fn bits(self) -> u64 {
        self.0
    }
}

/// Device object registered for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceIdentity {
    object_name: String,
    device_id: ObjectId,
    max_apdu: MaxApdu,
    segmentation: Segmentation,
    vendor_id: u16,
    services: ServicesSupported,
}

impl DeviceIdentity {
    pub fn builder(object_name: impl Into<String>, instance: u32) -> DeviceIdentityBuilder {
        DeviceIdentityBuilder {
            object_name: object_name.into(),
            instance,
            max_apdu: MaxApdu::UpTo1024,
            segmentation: Segmentation::SegmentedBoth,
            vendor_id: 0,
            services: ServicesSupported::empty(),
        }
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn device_id(&self) -> ObjectId {
        self.device_id
    }

    pub fn max_apdu(&self) -> MaxApdu {
        self.max_apdu
    }

    pub fn segmentation(&self) -> Segmentation {
        self.segmentation
    }

    pub fn vendor_id(&self) -> u16 {
        self.vendor_id
    }

    pub fn services(&self) -> ServicesSupported {
        self.services
    }

    /// The I-Am this device answers matching Who-Is requests with.
    pub fn i_am(&self) -> IAmRequest {
        IAmRequest {
            device_id: self.device_id,
            max_apdu: u32::from(self.max_apdu.octets()),
            segmentation: self.segmentation,
            vendor_id: self.vendor_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeviceIdentityBuilder {
    object_name: String,
    instance: u32,
    max_apdu: MaxApdu,
    segmentation: Segmentation,
    vendor_id: u16,
    services: ServicesSupported,
}

impl DeviceIdentityBuilder {
    pub fn max_apdu(mut self, max_apdu: MaxApdu) -> Self {
        self.max_apdu = max_apdu;
        self
    }

    pub fn segmentation(mut self, segmentation: Segmentation) -> Self {
        self.segmentation = segmentation;
        self
    }

    pub fn vendor_id(mut self, vendor_id: u16) -> Self {
        self.vendor_id = vendor_id;
        self
    }

    pub fn services(mut self, services: ServicesSupported) -> Self {
        self.services = services;
        self
    }

    pub fn build(self) -> Result<DeviceIdentity, ClientError> {
        let device_id = ObjectId::try_new(ObjectType::Device, self.instance).ok_or(
            ClientError::InvalidInstance {
                object_type: ObjectType::Device,
                instance: self.instance,
            },
        )?;
        Ok(DeviceIdentity {
            object_name: self.object_name,
            device_id,
            max_apdu: self.max_apdu,
            segmentation: self.segmentation,
            vendor_id: self.vendor_id,
            services: self.services,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DeviceIdentity, ServicesSupported};
    use crate::ClientError;
    use bacread_core::types::{MaxApdu, ObjectType, Segmentation};

    #[test]
    fn defaults() {
        let identity = DeviceIdentity::builder("reader", 599).build().unwrap();
        assert_eq!(identity.object_name(), "reader");
        assert_eq!(identity.device_id().object_type(), ObjectType::Device);
        assert_eq!(identity.device_id().instance(), 599);
        assert_eq!(identity.max_apdu(), MaxApdu::UpTo1024);
        assert_eq!(identity.segmentation(), Segmentation::SegmentedBoth);
        assert_eq!(identity.services(), ServicesSupported::empty());
    }

    #[test]
    fn i_am_reflects_identity() {
        let identity = DeviceIdentity::builder("reader", 10)
            .max_apdu(MaxApdu::UpTo480)
            .segmentation(Segmentation::NoSegmentation)
            .vendor_id(15)
            .build()
            .unwrap();
        let i_am = identity.i_am();
        assert_eq!(i_am.device_id, identity.device_id());
        assert_eq!(i_am.max_apdu, 480);
        assert_eq!(i_am.segmentation, Segmentation::NoSegmentation);
        assert_eq!(i_am.vendor_id, 15);
    }

    #[test]
    fn instance_beyond_22_bits_is_rejected() {
        let err = DeviceIdentity::builder("reader", 0x40_0000)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::InvalidInstance {
                instance: 0x40_0000,
                ..
            }
        ));
    }

    #[test]
    fn services_bitmask() {
        let services = ServicesSupported::empty().with(12).with(70);
        assert!(services.contains(12));
        assert!(!services.contains(15));
        assert!(!services.contains(70));
        assert_eq!(services.bits(), 1 << 12);
    }
}
