use crate::types::bacnet_enum;

bacnet_enum! {
    /// BACnet property identifiers (`BACnetPropertyIdentifier`).
    PropertyId(u32, to_u32, from_u32) {
        AckedTransitions = 0 => "ackedTransitions",
        AckRequired = 1 => "ackRequired",
        Action = 2 => "action",
        ActionText = 3 => "actionText",
        ActiveText = 4 => "activeText",
        ActiveVtSessions = 5 => "activeVtSessions",
        AlarmValue = 6 => "alarmValue",
        AlarmValues = 7 => "alarmValues",
        All = 8 => "all",
        AllWritesSuccessful = 9 => "allWritesSuccessful",
        ApduSegmentTimeout = 10 => "apduSegmentTimeout",
        ApduTimeout = 11 => "apduTimeout",
        ApplicationSoftwareVersion = 12 => "applicationSoftwareVersion",
        Archive = 13 => "archive",
        Bias = 14 => "bias",
        ChangeOfStateCount = 15 => "changeOfStateCount",
        ChangeOfStateTime = 16 => "changeOfStateTime",
        NotificationClass = 17 => "notificationClass",
        ControlledVariableReference = 19 => "controlledVariableReference",
        ControlledVariableUnits = 20 => "controlledVariableUnits",
        ControlledVariableValue = 21 => "controlledVariableValue",
        CovIncrement = 22 => "covIncrement",
        DateList = 23 => "dateList",
        DaylightSavingsStatus = 24 => "daylightSavingsStatus",
        Deadband = 25 => "deadband",
        DerivativeConstant = 26 => "derivativeConstant",
        DerivativeConstantUnits = 27 => "derivativeConstantUnits",
        Description = 28 => "description",
        DescriptionOfHalt = 29 => "descriptionOfHalt",
        DeviceAddressBinding = 30 => "deviceAddressBinding",
        DeviceType = 31 => "deviceType",
        EffectivePeriod = 32 => "effectivePeriod",
        ElapsedActiveTime = 33 => "elapsedActiveTime",
        ErrorLimit = 34 => "errorLimit",
        EventEnable = 35 => "eventEnable",
        EventState = 36 => "eventState",
        EventType = 37 => "eventType",
        ExceptionSchedule = 38 => "exceptionSchedule",
        FaultValues = 39 => "faultValues",
        FeedbackValue = 40 => "feedbackValue",
        FileAccessMethod = 41 => "fileAccessMethod",
        FileSize = 42 => "fileSize",
        FileType = 43 => "fileType",
        FirmwareRevision = 44 => "firmwareRevision",
        HighLimit = 45 => "highLimit",
        InactiveText = 46 => "inactiveText",
        InProcess = 47 => "inProcess",
        InstanceOf = 48 => "instanceOf",
        IntegralConstant = 49 => "integralConstant",
        IntegralConstantUnits = 50 => "integralConstantUnits",
        LimitEnable = 52 => "limitEnable",
        ListOfGroupMembers = 53 => "listOfGroupMembers",
        ListOfObjectPropertyReferences = 54 => "listOfObjectPropertyReferences",
        LocalDate = 56 => "localDate",
        LocalTime = 57 => "localTime",
        Location = 58 => "location",
        LowLimit = 59 => "lowLimit",
        ManipulatedVariableReference = 60 => "manipulatedVariableReference",
        MaximumOutput = 61 => "maximumOutput",
        MaxApduLengthAccepted = 62 => "maxApduLengthAccepted",
        MaxInfoFrames = 63 => "maxInfoFrames",
        MaxMaster = 64 => "maxMaster",
        MaxPresValue = 65 => "maxPresValue",
        MinimumOffTime = 66 => "minimumOffTime",
        MinimumOnTime = 67 => "minimumOnTime",
        MinimumOutput = 68 => "minimumOutput",
        MinPresValue = 69 => "minPresValue",
        ModelName = 70 => "modelName",
        ModificationDate = 71 => "modificationDate",
        NotifyType = 72 => "notifyType",
        NumberOfApduRetries = 73 => "numberOfApduRetries",
        NumberOfStates = 74 => "numberOfStates",
        ObjectIdentifier = 75 => "objectIdentifier",
        ObjectList = 76 => "objectList",
        ObjectName = 77 => "objectName",
        ObjectPropertyReference = 78 => "objectPropertyReference",
        ObjectType = 79 => "objectType",
        Optional = 80 => "optional",
        OutOfService = 81 => "outOfService",
        OutputUnits = 82 => "outputUnits",
        EventParameters = 83 => "eventParameters",
        Polarity = 84 => "polarity",
        PresentValue = 85 => "presentValue",
        Priority = 86 => "priority",
        PriorityArray = 87 => "priorityArray",
        PriorityForWriting = 88 => "priorityForWriting",
        ProcessIdentifier = 89 => "processIdentifier",
        ProgramChange = 90 => "programChange",
        ProgramLocation = 91 => "programLocation",
        ProgramState = 92 => "programState",
        ProportionalConstant = 93 => "proportionalConstant",
        ProportionalConstantUnits = 94 => "proportionalConstantUnits",
        ProtocolObjectTypesSupported = 96 => "protocolObjectTypesSupported",
        ProtocolServicesSupported = 97 => "protocolServicesSupported",
        ProtocolVersion = 98 => "protocolVersion",
        ReadOnly = 99 => "readOnly",
        ReasonForHalt = 100 => "reasonForHalt",
        RecipientList = 102 => "recipientList",
        Reliability = 103 => "reliability",
        RelinquishDefault = 104 => "relinquishDefault",
        Required = 105 => "required",
        Resolution = 106 => "resolution",
        SegmentationSupported = 107 => "segmentationSupported",
        Setpoint = 108 => "setpoint",
        SetpointReference = 109 => "setpointReference",
        StateText = 110 => "stateText",
        StatusFlags = 111 => "statusFlags",
        SystemStatus = 112 => "systemStatus",
        TimeDelay = 113 => "timeDelay",
        TimeOfActiveTimeReset = 114 => "timeOfActiveTimeReset",
        TimeOfStateCountReset = 115 => "timeOfStateCountReset",
        TimeSynchronizationRecipients = 116 => "timeSynchronizationRecipients",
        Units = 117 => "units",
        UpdateInterval = 118 => "updateInterval",
        UtcOffset = 119 => "utcOffset",
        VendorIdentifier = 120 => "vendorIdentifier",
        VendorName = 121 => "vendorName",
        VtClassesSupported = 122 => "vtClassesSupported",
        WeeklySchedule = 123 => "weeklySchedule",
        AttemptedSamples = 124 => "attemptedSamples",
        AverageValue = 125 => "averageValue",
        BufferSize = 126 => "bufferSize",
        ClientCovIncrement = 127 => "clientCovIncrement",
        CovResubscriptionInterval = 128 => "covResubscriptionInterval",
        EventTimeStamps = 130 => "eventTimeStamps",
        LogBuffer = 131 => "logBuffer",
        LogDeviceObjectProperty = 132 => "logDeviceObjectProperty",
        Enable = 133 => "enable",
        LogInterval = 134 => "logInterval",
        MaximumValue = 135 => "maximumValue",
        MinimumValue = 136 => "minimumValue",
        NotificationThreshold = 137 => "notificationThreshold",
        ProtocolRevision = 139 => "protocolRevision",
        RecordsSinceNotification = 140 => "recordsSinceNotification",
        RecordCount = 141 => "recordCount",
        StartTime = 142 => "startTime",
        StopTime = 143 => "stopTime",
        StopWhenFull = 144 => "stopWhenFull",
        TotalRecordCount = 145 => "totalRecordCount",
        ValidSamples = 146 => "validSamples",
        WindowInterval = 147 => "windowInterval",
        WindowSamples = 148 => "windowSamples",
        MaximumValueTimestamp = 149 => "maximumValueTimestamp",
        MinimumValueTimestamp = 150 => "minimumValueTimestamp",
        VarianceValue = 151 => "varianceValue",
        ActiveCovSubscriptions = 152 => "activeCovSubscriptions",
        BackupFailureTimeout = 153 => "backupFailureTimeout",
        ConfigurationFiles = 154 => "configurationFiles",
        DatabaseRevision = 155 => "databaseRevision",
        DirectReading = 156 => "directReading",
        LastRestoreTime = 157 => "lastRestoreTime",
        MaintenanceRequired = 158 => "maintenanceRequired",
        MemberOf = 159 => "memberOf",
        Mode = 160 => "mode",
        OperationExpected = 161 => "operationExpected",
        Setting = 162 => "setting",
        Silenced = 163 => "silenced",
        TrackingValue = 164 => "trackingValue",
        ZoneMembers = 165 => "zoneMembers",
        LifeSafetyAlarmValues = 166 => "lifeSafetyAlarmValues",
        MaxSegmentsAccepted = 167 => "maxSegmentsAccepted",
        ProfileName = 168 => "profileName",
        LastNotifyRecord = 173 => "lastNotifyRecord",
        ScheduleDefault = 174 => "scheduleDefault",
        Prescale = 185 => "prescale",
        PulseRate = 186 => "pulseRate",
        Scale = 187 => "scale",
        ValueBeforeChange = 190 => "valueBeforeChange",
        ValueSet = 191 => "valueSet",
        ValueChangeTime = 192 => "valueChangeTime",
        AlignIntervals = 193 => "alignIntervals",
        IntervalOffset = 195 => "intervalOffset",
        LoggingType = 197 => "loggingType",
        Trigger = 205 => "trigger",
        NodeSubtype = 207 => "nodeSubtype",
        NodeType = 208 => "nodeType",
        StructuredObjectList = 209 => "structuredObjectList",
        SubordinateAnnotations = 210 => "subordinateAnnotations",
        SubordinateList = 211 => "subordinateList",
        EventMessageTexts = 351 => "eventMessageTexts",
        EventDetectionEnable = 353 => "eventDetectionEnable",
        PropertyList = 371 => "propertyList",
    }
}

#[cfg(test)]
mod tests {
    use super::PropertyId;

    #[test]
    fn present_value_is_85() {
        assert_eq!(PropertyId::PresentValue.to_u32(), 85);
        assert_eq!(PropertyId::from_u32(77), PropertyId::ObjectName);
        assert_eq!(PropertyId::from_name("present-value"), Some(PropertyId::PresentValue));
    }

    #[test]
    fn unnamed_codes_round_trip() {
        let p = PropertyId::from_u32(5123);
        assert_eq!(p, PropertyId::Proprietary(5123));
        assert_eq!(p.name(), None);
        assert_eq!(p.to_u32(), 5123);
    }
}
