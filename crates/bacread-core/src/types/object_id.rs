use crate::types::ObjectType;
use core::fmt;

/// A packed BACnet object identifier: 10-bit object type, 22-bit instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(u32);

impl ObjectId {
    /// Largest instance number the 22-bit field can hold.
    pub const MAX_INSTANCE: u32 = 0x3F_FFFF;

    /// Packs a type and instance; out-of-range parts are masked off.
    pub const fn new(object_type: ObjectType, instance: u32) -> Self {
        Self((((object_type.to_u16() as u32) & 0x03FF) << 22) | (instance & Self::MAX_INSTANCE))
    }

    /// Like [`new`](Self::new) but refuses values that would not survive packing.
    pub const fn try_new(object_type: ObjectType, instance: u32) -> Option<Self> {
        if instance > Self::MAX_INSTANCE || object_type.to_u16() > ObjectType::MAX_CODE {
            return None;
        }
        Some(Self::new(object_type, instance))
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn object_type(self) -> ObjectType {
        ObjectType::from_u16(((self.0 >> 22) & 0x03FF) as u16)
    }

    pub const fn instance(self) -> u32 {
        self.0 & Self::MAX_INSTANCE
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type(), self.instance())
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectId;
    use crate::types::ObjectType;

    #[test]
    fn packs_type_and_instance() {
        let id = ObjectId::new(ObjectType::Device, 123);
        assert_eq!(id.raw(), 0x0200_007B);
        assert_eq!(id.object_type(), ObjectType::Device);
        assert_eq!(id.instance(), 123);
        assert_eq!(id.to_string(), "device:123");
    }

    #[test]
    fn try_new_rejects_wide_instance() {
        assert!(ObjectId::try_new(ObjectType::AnalogInput, ObjectId::MAX_INSTANCE).is_some());
        assert!(ObjectId::try_new(ObjectType::AnalogInput, ObjectId::MAX_INSTANCE + 1).is_none());
        assert!(ObjectId::try_new(ObjectType::Proprietary(1024), 1).is_none());
    }
}
