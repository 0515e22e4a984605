use crate::types::bacnet_enum;

bacnet_enum! {
    /// BACnet object types (ASHRAE 135 clause 21, `BACnetObjectType`).
    ///
    /// Codes 128 and above are reserved for vendors and always land in
    /// [`Proprietary`](Self::Proprietary).
    ObjectType(u16, to_u16, from_u16) {
        AnalogInput = 0 => "analogInput",
        AnalogOutput = 1 => "analogOutput",
        AnalogValue = 2 => "analogValue",
        BinaryInput = 3 => "binaryInput",
        BinaryOutput = 4 => "binaryOutput",
        BinaryValue = 5 => "binaryValue",
        Calendar = 6 => "calendar",
        Command = 7 => "command",
        Device = 8 => "device",
        EventEnrollment = 9 => "eventEnrollment",
        File = 10 => "file",
        Group = 11 => "group",
        Loop = 12 => "loop",
        MultiStateInput = 13 => "multiStateInput",
        MultiStateOutput = 14 => "multiStateOutput",
        NotificationClass = 15 => "notificationClass",
        Program = 16 => "program",
        Schedule = 17 => "schedule",
        Averaging = 18 => "averaging",
        MultiStateValue = 19 => "multiStateValue",
        TrendLog = 20 => "trendLog",
        LifeSafetyPoint = 21 => "lifeSafetyPoint",
        LifeSafetyZone = 22 => "lifeSafetyZone",
        Accumulator = 23 => "accumulator",
        PulseConverter = 24 => "pulseConverter",
        EventLog = 25 => "eventLog",
        GlobalGroup = 26 => "globalGroup",
        TrendLogMultiple = 27 => "trendLogMultiple",
        LoadControl = 28 => "loadControl",
        StructuredView = 29 => "structuredView",
        AccessDoor = 30 => "accessDoor",
        Timer = 31 => "timer",
        AccessCredential = 32 => "accessCredential",
        AccessPoint = 33 => "accessPoint",
        AccessRights = 34 => "accessRights",
        AccessUser = 35 => "accessUser",
        AccessZone = 36 => "accessZone",
        CredentialDataInput = 37 => "credentialDataInput",
        NetworkSecurity = 38 => "networkSecurity",
        BitStringValue = 39 => "bitstringValue",
        CharacterStringValue = 40 => "characterstringValue",
        DatePatternValue = 41 => "datePatternValue",
        DateValue = 42 => "dateValue",
        DateTimePatternValue = 43 => "datetimePatternValue",
        DateTimeValue = 44 => "datetimeValue",
        IntegerValue = 45 => "integerValue",
        LargeAnalogValue = 46 => "largeAnalogValue",
        OctetStringValue = 47 => "octetstringValue",
        PositiveIntegerValue = 48 => "positiveIntegerValue",
        TimePatternValue = 49 => "timePatternValue",
        TimeValue = 50 => "timeValue",
        NotificationForwarder = 51 => "notificationForwarder",
        AlertEnrollment = 52 => "alertEnrollment",
        Channel = 53 => "channel",
        LightingOutput = 54 => "lightingOutput",
        BinaryLightingOutput = 55 => "binaryLightingOutput",
        NetworkPort = 56 => "networkPort",
    }
}

impl ObjectType {
    /// Highest code the 10-bit object-type field can carry.
    pub const MAX_CODE: u16 = 0x03FF;

    pub const fn is_proprietary(self) -> bool {
        matches!(self, Self::Proprietary(_))
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectType;

    #[test]
    fn names_and_codes_agree() {
        assert_eq!(ObjectType::from_name("analogInput"), Some(ObjectType::AnalogInput));
        assert_eq!(ObjectType::from_name("multi-state-value"), Some(ObjectType::MultiStateValue));
        assert_eq!(ObjectType::from_u16(8), ObjectType::Device);
        assert_eq!(ObjectType::Device.to_u16(), 8);
        assert_eq!(ObjectType::from_name("thermostat"), None);
    }

    #[test]
    fn vendor_codes_are_proprietary() {
        let t = ObjectType::from_u16(130);
        assert!(t.is_proprietary());
        assert_eq!(t.to_u16(), 130);
        assert_eq!(t.to_string(), "130");
        assert_eq!(ObjectType::AnalogValue.to_string(), "analogValue");
    }
}
