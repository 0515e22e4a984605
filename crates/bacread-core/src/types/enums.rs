use crate::types::bacnet_enum;
use core::fmt;

/// Segmentation capability a device advertises in I-Am.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Segmentation {
    SegmentedBoth,
    SegmentedTransmit,
    SegmentedReceive,
    NoSegmentation,
}

impl Segmentation {
    pub const fn to_u32(self) -> u32 {
        match self {
            Self::SegmentedBoth => 0,
            Self::SegmentedTransmit => 1,
            Self::SegmentedReceive => 2,
            Self::NoSegmentation => 3,
        }
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::SegmentedBoth),
            1 => Some(Self::SegmentedTransmit),
            2 => Some(Self::SegmentedReceive),
            3 => Some(Self::NoSegmentation),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::SegmentedBoth => "segmentedBoth",
            Self::SegmentedTransmit => "segmentedTransmit",
            Self::SegmentedReceive => "segmentedReceive",
            Self::NoSegmentation => "noSegmentation",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match crate::types::camel_case(name).as_str() {
            "segmentedBoth" => Some(Self::SegmentedBoth),
            "segmentedTransmit" => Some(Self::SegmentedTransmit),
            "segmentedReceive" => Some(Self::SegmentedReceive),
            "noSegmentation" => Some(Self::NoSegmentation),
            _ => None,
        }
    }
}

impl fmt::Display for Segmentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maximum APDU size as carried in the confirmed-request header nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaxApdu {
    UpTo50,
    UpTo128,
    UpTo206,
    UpTo480,
    UpTo1024,
    UpTo1476,
}

impl MaxApdu {
    const ALL: [Self; 6] = [
        Self::UpTo50,
        Self::UpTo128,
        Self::UpTo206,
        Self::UpTo480,
        Self::UpTo1024,
        Self::UpTo1476,
    ];

    pub const fn to_u8(self) -> u8 {
        match self {
            Self::UpTo50 => 0,
            Self::UpTo128 => 1,
            Self::UpTo206 => 2,
            Self::UpTo480 => 3,
            Self::UpTo1024 => 4,
            Self::UpTo1476 => 5,
        }
    }

    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::UpTo50),
            1 => Some(Self::UpTo128),
            2 => Some(Self::UpTo206),
            3 => Some(Self::UpTo480),
            4 => Some(Self::UpTo1024),
            5 => Some(Self::UpTo1476),
            _ => None,
        }
    }

    pub const fn octets(self) -> u16 {
        match self {
            Self::UpTo50 => 50,
            Self::UpTo128 => 128,
            Self::UpTo206 => 206,
            Self::UpTo480 => 480,
            Self::UpTo1024 => 1024,
            Self::UpTo1476 => 1476,
        }
    }

    /// Largest step not exceeding `octets`; below 50 there is none.
    pub fn from_octets(octets: u16) -> Option<Self> {
        Self::ALL.iter().rev().copied().find(|m| m.octets() <= octets)
    }
}

bacnet_enum! {
    /// Reason carried in a Reject-PDU.
    RejectReason(u8, to_u8, from_u8) {
        Other = 0 => "other",
        BufferOverflow = 1 => "bufferOverflow",
        InconsistentParameters = 2 => "inconsistentParameters",
        InvalidParameterDataType = 3 => "invalidParameterDataType",
        InvalidTag = 4 => "invalidTag",
        MissingRequiredParameter = 5 => "missingRequiredParameter",
        ParameterOutOfRange = 6 => "parameterOutOfRange",
        TooManyArguments = 7 => "tooManyArguments",
        UndefinedEnumeration = 8 => "undefinedEnumeration",
        UnrecognizedService = 9 => "unrecognizedService",
    }
}

bacnet_enum! {
    /// Reason carried in an Abort-PDU.
    AbortReason(u8, to_u8, from_u8) {
        Other = 0 => "other",
        BufferOverflow = 1 => "bufferOverflow",
        InvalidApduInThisState = 2 => "invalidApduInThisState",
        PreemptedByHigherPriorityTask = 3 => "preemptedByHigherPriorityTask",
        SegmentationNotSupported = 4 => "segmentationNotSupported",
        SecurityError = 5 => "securityError",
        InsufficientSecurity = 6 => "insufficientSecurity",
        WindowSizeOutOfRange = 7 => "windowSizeOutOfRange",
        ApplicationExceededReplyTime = 8 => "applicationExceededReplyTime",
        OutOfResources = 9 => "outOfResources",
        TsmTimeout = 10 => "tsmTimeout",
        ApduTooLong = 11 => "apduTooLong",
    }
}

bacnet_enum! {
    /// Error class in an Error-PDU.
    ErrorClass(u32, to_u32, from_u32) {
        Device = 0 => "device",
        Object = 1 => "object",
        Property = 2 => "property",
        Resources = 3 => "resources",
        Security = 4 => "security",
        Services = 5 => "services",
        Vt = 6 => "vt",
        Communication = 7 => "communication",
    }
}

bacnet_enum! {
    /// Error code in an Error-PDU. Only the codes a ReadProperty peer
    /// commonly returns are named.
    ErrorCode(u32, to_u32, from_u32) {
        Other = 0 => "other",
        ConfigurationInProgress = 2 => "configurationInProgress",
        DeviceBusy = 3 => "deviceBusy",
        InconsistentParameters = 7 => "inconsistentParameters",
        InvalidDataType = 9 => "invalidDataType",
        MissingRequiredParameter = 16 => "missingRequiredParameter",
        ReadAccessDenied = 27 => "readAccessDenied",
        ServiceRequestDenied = 29 => "serviceRequestDenied",
        Timeout = 30 => "timeout",
        UnknownObject = 31 => "unknownObject",
        UnknownProperty = 32 => "unknownProperty",
        UnsupportedObjectType = 36 => "unsupportedObjectType",
        ValueOutOfRange = 37 => "valueOutOfRange",
        WriteAccessDenied = 40 => "writeAccessDenied",
        InvalidArrayIndex = 42 => "invalidArrayIndex",
        PropertyIsNotAnArray = 50 => "propertyIsNotAnArray",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_apdu_rounds_down() {
        assert_eq!(MaxApdu::from_octets(1024), Some(MaxApdu::UpTo1024));
        assert_eq!(MaxApdu::from_octets(1400), Some(MaxApdu::UpTo1024));
        assert_eq!(MaxApdu::from_octets(9000), Some(MaxApdu::UpTo1476));
        assert_eq!(MaxApdu::from_octets(49), None);
        assert_eq!(MaxApdu::UpTo1476.to_u8(), 5);
    }

    #[test]
    fn segmentation_names() {
        assert_eq!(Segmentation::from_name("segmented-both"), Some(Segmentation::SegmentedBoth));
        assert_eq!(Segmentation::NoSegmentation.to_u32(), 3);
    }

    #[test]
    fn reasons_display_names() {
        assert_eq!(RejectReason::UnrecognizedService.to_string(), "unrecognizedService");
        assert_eq!(AbortReason::from_u8(4), AbortReason::SegmentationNotSupported);
        assert_eq!(ErrorCode::from_u32(32).to_string(), "unknownProperty");
    }
}
