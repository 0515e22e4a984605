//! Maps an (object type, property, vendor) triple to the shape of the value a
//! ReadProperty-ACK carries for it.
//!
//! The standard table is compiled in. Vendors extend it through
//! [`DatatypeRegistryBuilder`]; a vendor registration shadows the standard
//! entry for that vendor id only. A built registry is immutable, so lookups
//! are pure and the registry can be shared freely.

use crate::types::{DataValue, ObjectType, PropertyId};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::fmt;

/// The primitive (or wildcard) type of a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Datatype {
    Null,
    Boolean,
    Unsigned,
    Signed,
    Real,
    Double,
    OctetString,
    CharacterString,
    BitString,
    Enumerated,
    Date,
    Time,
    ObjectIdentifier,
    /// Constructed or CHOICE productions; any tagged content is accepted.
    Any,
}

impl Datatype {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Unsigned => "unsigned",
            Self::Signed => "signed",
            Self::Real => "real",
            Self::Double => "double",
            Self::OctetString => "octetString",
            Self::CharacterString => "characterString",
            Self::BitString => "bitString",
            Self::Enumerated => "enumerated",
            Self::Date => "date",
            Self::Time => "time",
            Self::ObjectIdentifier => "objectIdentifier",
            Self::Any => "any",
        }
    }

    /// Whether a decoded wire value carries this type's application tag.
    pub fn accepts(self, value: &DataValue<'_>) -> bool {
        matches!(
            (self, value),
            (Self::Any, _)
                | (Self::Null, DataValue::Null)
                | (Self::Boolean, DataValue::Boolean(_))
                | (Self::Unsigned, DataValue::Unsigned(_))
                | (Self::Signed, DataValue::Signed(_))
                | (Self::Real, DataValue::Real(_))
                | (Self::Double, DataValue::Double(_))
                | (Self::OctetString, DataValue::OctetString(_))
                | (Self::CharacterString, DataValue::CharacterString(_))
                | (Self::BitString, DataValue::BitString(_))
                | (Self::Enumerated, DataValue::Enumerated(_))
                | (Self::Date, DataValue::Date(_))
                | (Self::Time, DataValue::Time(_))
                | (Self::ObjectIdentifier, DataValue::ObjectId(_))
        )
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A property's value shape: one value, a BACnetARRAY or a BACnetLIST.
///
/// Arrays are indexable (index 0 is the length); lists are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ResolvedDatatype {
    Scalar(Datatype),
    Array(Datatype),
    List(Datatype),
}

impl ResolvedDatatype {
    /// Element type of an array or list.
    pub const fn subtype(self) -> Option<Datatype> {
        match self {
            Self::Scalar(_) => None,
            Self::Array(element) | Self::List(element) => Some(element),
        }
    }

    pub const fn is_array(self) -> bool {
        matches!(self, Self::Array(_))
    }
}

impl fmt::Display for ResolvedDatatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(d) => write!(f, "{d}"),
            Self::Array(d) => write!(f, "array of {d}"),
            Self::List(d) => write!(f, "list of {d}"),
        }
    }
}

/// An object type as a caller spelled it: a numeric code or a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectTypeRef {
    Code(u16),
    Name(String),
}

impl ObjectTypeRef {
    /// All-digit input is a code; anything else is a name.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match all_digits(input).then(|| input.parse::<u16>()) {
            Some(Ok(code)) => Self::Code(code),
            _ => Self::Name(input.to_string()),
        }
    }
}

impl From<ObjectType> for ObjectTypeRef {
    fn from(value: ObjectType) -> Self {
        Self::Code(value.to_u16())
    }
}

impl fmt::Display for ObjectTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// A property as a caller spelled it: a numeric code or a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyRef {
    Code(u32),
    Name(String),
}

impl PropertyRef {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match all_digits(input).then(|| input.parse::<u32>()) {
            Some(Ok(code)) => Self::Code(code),
            _ => Self::Name(input.to_string()),
        }
    }
}

impl From<PropertyId> for PropertyRef {
    fn from(value: PropertyId) -> Self {
        Self::Code(value.to_u32())
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Why a registry lookup failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    UnknownObjectType(String),
    UnknownProperty {
        object_type: ObjectType,
        property: String,
    },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownObjectType(name) => write!(f, "unknown object type '{name}'"),
            Self::UnknownProperty {
                object_type,
                property,
            } => write!(f, "unknown property '{property}' for object type {object_type}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LookupError {}

type VendorKey = (u16, u16, u32);

/// Immutable (object type, property, vendor) → datatype table.
#[derive(Debug, Clone, Default)]
pub struct DatatypeRegistry {
    vendor: BTreeMap<VendorKey, ResolvedDatatype>,
    object_type_names: BTreeMap<(u16, String), u16>,
    property_names: BTreeMap<(u16, String), u32>,
}

impl DatatypeRegistry {
    /// The compiled-in standard table with no vendor extensions.
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn builder() -> DatatypeRegistryBuilder {
        DatatypeRegistryBuilder::default()
    }

    /// Looks up the value shape of `property` on `object_type` as served by a
    /// device of `vendor_id`.
    pub fn lookup(
        &self,
        object_type: ObjectType,
        property: PropertyId,
        vendor_id: u16,
    ) -> Result<ResolvedDatatype, LookupError> {
        let key = (vendor_id, object_type.to_u16(), property.to_u32());
        self.vendor
            .get(&key)
            .copied()
            .or_else(|| standard_datatype(object_type, property))
            .ok_or_else(|| LookupError::UnknownProperty {
                object_type,
                property: property.to_string(),
            })
    }

    /// Normalizes an object-type reference. Codes are taken as-is; names
    /// are looked up in the vendor's registrations, then the standard table.
    pub fn object_type(
        &self,
        reference: &ObjectTypeRef,
        vendor_id: u16,
    ) -> Result<ObjectType, LookupError> {
        match reference {
            ObjectTypeRef::Code(code) => Ok(ObjectType::from_u16(*code)),
            ObjectTypeRef::Name(name) => self
                .object_type_names
                .get(&(vendor_id, crate::types::camel_case(name)))
                .map(|code| ObjectType::from_u16(*code))
                .or_else(|| ObjectType::from_name(name))
                .ok_or_else(|| LookupError::UnknownObjectType(name.clone())),
        }
    }

    pub fn property(
        &self,
        object_type: ObjectType,
        reference: &PropertyRef,
        vendor_id: u16,
    ) -> Result<PropertyId, LookupError> {
        match reference {
            PropertyRef::Code(code) => Ok(PropertyId::from_u32(*code)),
            PropertyRef::Name(name) => self
                .property_names
                .get(&(vendor_id, crate::types::camel_case(name)))
                .map(|code| PropertyId::from_u32(*code))
                .or_else(|| PropertyId::from_name(name))
                .ok_or_else(|| LookupError::UnknownProperty {
                    object_type,
                    property: name.clone(),
                }),
        }
    }
}

/// Collects vendor registrations before freezing them into a
/// [`DatatypeRegistry`].
#[derive(Debug, Clone, Default)]
pub struct DatatypeRegistryBuilder {
    registry: DatatypeRegistry,
}

impl DatatypeRegistryBuilder {
    /// Registers the datatype a vendor's devices report for a property.
    pub fn register(
        mut self,
        vendor_id: u16,
        object_type: ObjectType,
        property: PropertyId,
        datatype: ResolvedDatatype,
    ) -> Self {
        self.registry
            .vendor
            .insert((vendor_id, object_type.to_u16(), property.to_u32()), datatype);
        self
    }

    /// Gives a vendor-proprietary object type a name usable in [`ObjectTypeRef`].
    pub fn object_type_name(mut self, vendor_id: u16, name: &str, code: u16) -> Self {
        self.registry
            .object_type_names
            .insert((vendor_id, crate::types::camel_case(name)), code);
        self
    }

    /// Gives a vendor-proprietary property a name usable in [`PropertyRef`].
    pub fn property_name(mut self, vendor_id: u16, name: &str, code: u32) -> Self {
        self.registry
            .property_names
            .insert((vendor_id, crate::types::camel_case(name)), code);
        self
    }

    pub fn build(self) -> DatatypeRegistry {
        self.registry
    }
}

use Datatype as D;
use ResolvedDatatype::{Array, List, Scalar};

fn standard_datatype(object_type: ObjectType, property: PropertyId) -> Option<ResolvedDatatype> {
    use ObjectType as O;

    let specific = match object_type {
        O::Proprietary(_) => return None,
        O::AnalogInput | O::AnalogOutput | O::AnalogValue => analog(object_type, property),
        O::BinaryInput | O::BinaryOutput | O::BinaryValue => binary(object_type, property),
        O::MultiStateInput | O::MultiStateOutput | O::MultiStateValue => {
            multi_state(object_type, property)
        }
        O::Device => device(property),
        O::Calendar => calendar(property),
        O::Schedule => schedule(property),
        O::NotificationClass => notification_class(property),
        O::File => file(property),
        O::Loop => control_loop(property),
        O::TrendLog => trend_log(property),
        O::Accumulator => accumulator(property),
        O::StructuredView => structured_view(property),
        O::BitStringValue
        | O::CharacterStringValue
        | O::DateValue
        | O::IntegerValue
        | O::LargeAnalogValue
        | O::OctetStringValue
        | O::PositiveIntegerValue
        | O::TimeValue => value_object(object_type, property),
        _ => None,
    };
    specific.or_else(|| common(object_type, property))
}

/// Properties every object carries, plus the status group most carry.
fn common(object_type: ObjectType, property: PropertyId) -> Option<ResolvedDatatype> {
    use ObjectType as O;
    use PropertyId as P;

    let identity = match property {
        P::ObjectIdentifier => Some(Scalar(D::ObjectIdentifier)),
        P::ObjectName | P::Description | P::ProfileName => Some(Scalar(D::CharacterString)),
        P::ObjectType => Some(Scalar(D::Enumerated)),
        P::PropertyList => Some(Array(D::Enumerated)),
        _ => None,
    };
    if identity.is_some() {
        return identity;
    }
    if matches!(
        object_type,
        O::Device | O::File | O::NotificationClass | O::StructuredView
    ) {
        return None;
    }
    match property {
        P::StatusFlags => Some(Scalar(D::BitString)),
        P::EventState | P::Reliability => Some(Scalar(D::Enumerated)),
        P::OutOfService => Some(Scalar(D::Boolean)),
        _ => None,
    }
}

/// Intrinsic-reporting properties.
fn reporting(property: PropertyId) -> Option<ResolvedDatatype> {
    use PropertyId as P;

    match property {
        P::NotificationClass | P::TimeDelay => Some(Scalar(D::Unsigned)),
        P::EventEnable | P::AckedTransitions => Some(Scalar(D::BitString)),
        P::NotifyType => Some(Scalar(D::Enumerated)),
        P::EventDetectionEnable => Some(Scalar(D::Boolean)),
        P::EventTimeStamps => Some(Array(D::Any)),
        P::EventMessageTexts => Some(Array(D::CharacterString)),
        _ => None,
    }
}

/// Priority array and relinquish default of a commandable object whose
/// present value has type `value`.
fn commandable(property: PropertyId, value: Datatype) -> Option<ResolvedDatatype> {
    match property {
        PropertyId::PriorityArray => Some(Array(D::Any)),
        PropertyId::RelinquishDefault => Some(Scalar(value)),
        _ => None,
    }
}

fn analog(object_type: ObjectType, property: PropertyId) -> Option<ResolvedDatatype> {
    use ObjectType as O;
    use PropertyId as P;

    let found = match property {
        P::PresentValue
        | P::MinPresValue
        | P::MaxPresValue
        | P::Resolution
        | P::CovIncrement
        | P::HighLimit
        | P::LowLimit
        | P::Deadband => Some(Scalar(D::Real)),
        P::Units => Some(Scalar(D::Enumerated)),
        P::LimitEnable => Some(Scalar(D::BitString)),
        P::DeviceType if object_type != O::AnalogValue => Some(Scalar(D::CharacterString)),
        _ => None,
    };
    found.or_else(|| reporting(property)).or_else(|| {
        (object_type != O::AnalogInput)
            .then(|| commandable(property, D::Real))
            .flatten()
    })
}

fn binary(object_type: ObjectType, property: PropertyId) -> Option<ResolvedDatatype> {
    use ObjectType as O;
    use PropertyId as P;

    let found = match property {
        P::PresentValue => Some(Scalar(D::Enumerated)),
        P::ActiveText | P::InactiveText => Some(Scalar(D::CharacterString)),
        P::ChangeOfStateTime | P::TimeOfStateCountReset | P::TimeOfActiveTimeReset => {
            Some(Scalar(D::Any))
        }
        P::ChangeOfStateCount | P::ElapsedActiveTime => Some(Scalar(D::Unsigned)),
        P::Polarity if object_type != O::BinaryValue => Some(Scalar(D::Enumerated)),
        P::DeviceType if object_type != O::BinaryValue => Some(Scalar(D::CharacterString)),
        P::AlarmValue if object_type != O::BinaryOutput => Some(Scalar(D::Enumerated)),
        P::FeedbackValue if object_type == O::BinaryOutput => Some(Scalar(D::Enumerated)),
        P::MinimumOffTime | P::MinimumOnTime if object_type != O::BinaryInput => {
            Some(Scalar(D::Unsigned))
        }
        _ => None,
    };
    found.or_else(|| reporting(property)).or_else(|| {
        (object_type != O::BinaryInput)
            .then(|| commandable(property, D::Enumerated))
            .flatten()
    })
}

fn multi_state(object_type: ObjectType, property: PropertyId) -> Option<ResolvedDatatype> {
    use ObjectType as O;
    use PropertyId as P;

    let found = match property {
        P::PresentValue | P::NumberOfStates => Some(Scalar(D::Unsigned)),
        P::StateText => Some(Array(D::CharacterString)),
        P::FaultValues => Some(List(D::Unsigned)),
        P::AlarmValues if object_type != O::MultiStateOutput => Some(List(D::Unsigned)),
        P::FeedbackValue if object_type == O::MultiStateOutput => Some(Scalar(D::Unsigned)),
        P::DeviceType if object_type != O::MultiStateValue => Some(Scalar(D::CharacterString)),
        _ => None,
    };
    found.or_else(|| reporting(property)).or_else(|| {
        (object_type != O::MultiStateInput)
            .then(|| commandable(property, D::Unsigned))
            .flatten()
    })
}

fn value_object(object_type: ObjectType, property: PropertyId) -> Option<ResolvedDatatype> {
    use ObjectType as O;
    use PropertyId as P;

    let value = match object_type {
        O::BitStringValue => D::BitString,
        O::CharacterStringValue => D::CharacterString,
        O::DateValue => D::Date,
        O::IntegerValue => D::Signed,
        O::LargeAnalogValue => D::Double,
        O::OctetStringValue => D::OctetString,
        O::PositiveIntegerValue => D::Unsigned,
        O::TimeValue => D::Time,
        _ => return None,
    };
    let numeric = matches!(
        object_type,
        O::IntegerValue | O::LargeAnalogValue | O::PositiveIntegerValue
    );
    match property {
        P::PresentValue => Some(Scalar(value)),
        P::Units if numeric => Some(Scalar(D::Enumerated)),
        P::CovIncrement | P::MinPresValue | P::MaxPresValue | P::Resolution if numeric => {
            Some(Scalar(value))
        }
        _ => reporting(property).or_else(|| commandable(property, value)),
    }
}

fn device(property: PropertyId) -> Option<ResolvedDatatype> {
    use PropertyId as P;

    match property {
        P::SystemStatus | P::SegmentationSupported => Some(Scalar(D::Enumerated)),
        P::VendorName
        | P::ModelName
        | P::FirmwareRevision
        | P::ApplicationSoftwareVersion
        | P::Location => Some(Scalar(D::CharacterString)),
        P::VendorIdentifier
        | P::ProtocolVersion
        | P::ProtocolRevision
        | P::MaxApduLengthAccepted
        | P::MaxSegmentsAccepted
        | P::ApduTimeout
        | P::ApduSegmentTimeout
        | P::NumberOfApduRetries
        | P::DatabaseRevision
        | P::MaxMaster
        | P::MaxInfoFrames
        | P::BackupFailureTimeout => Some(Scalar(D::Unsigned)),
        P::ProtocolServicesSupported | P::ProtocolObjectTypesSupported => {
            Some(Scalar(D::BitString))
        }
        P::ObjectList | P::StructuredObjectList | P::ConfigurationFiles => {
            Some(Array(D::ObjectIdentifier))
        }
        P::DeviceAddressBinding | P::ActiveCovSubscriptions | P::TimeSynchronizationRecipients => {
            Some(List(D::Any))
        }
        P::LocalDate => Some(Scalar(D::Date)),
        P::LocalTime => Some(Scalar(D::Time)),
        P::UtcOffset => Some(Scalar(D::Signed)),
        P::DaylightSavingsStatus => Some(Scalar(D::Boolean)),
        P::LastRestoreTime => Some(Scalar(D::Any)),
        _ => None,
    }
}

fn calendar(property: PropertyId) -> Option<ResolvedDatatype> {
    match property {
        PropertyId::PresentValue => Some(Scalar(D::Boolean)),
        PropertyId::DateList => Some(List(D::Any)),
        _ => None,
    }
}

fn schedule(property: PropertyId) -> Option<ResolvedDatatype> {
    use PropertyId as P;

    match property {
        P::PresentValue | P::EffectivePeriod | P::ScheduleDefault => Some(Scalar(D::Any)),
        P::WeeklySchedule | P::ExceptionSchedule => Some(Array(D::Any)),
        P::ListOfObjectPropertyReferences => Some(List(D::Any)),
        P::PriorityForWriting => Some(Scalar(D::Unsigned)),
        _ => reporting(property),
    }
}

fn notification_class(property: PropertyId) -> Option<ResolvedDatatype> {
    use PropertyId as P;

    match property {
        P::NotificationClass => Some(Scalar(D::Unsigned)),
        P::Priority => Some(Array(D::Unsigned)),
        P::AckRequired => Some(Scalar(D::BitString)),
        P::RecipientList => Some(List(D::Any)),
        _ => None,
    }
}

fn file(property: PropertyId) -> Option<ResolvedDatatype> {
    use PropertyId as P;

    match property {
        P::FileType => Some(Scalar(D::CharacterString)),
        P::FileSize | P::RecordCount => Some(Scalar(D::Unsigned)),
        P::ModificationDate => Some(Scalar(D::Any)),
        P::Archive | P::ReadOnly => Some(Scalar(D::Boolean)),
        P::FileAccessMethod => Some(Scalar(D::Enumerated)),
        _ => None,
    }
}

fn control_loop(property: PropertyId) -> Option<ResolvedDatatype> {
    use PropertyId as P;

    match property {
        P::PresentValue
        | P::ControlledVariableValue
        | P::Setpoint
        | P::ProportionalConstant
        | P::IntegralConstant
        | P::DerivativeConstant
        | P::Bias
        | P::MaximumOutput
        | P::MinimumOutput
        | P::CovIncrement
        | P::ErrorLimit => Some(Scalar(D::Real)),
        P::OutputUnits
        | P::ControlledVariableUnits
        | P::Action
        | P::ProportionalConstantUnits
        | P::IntegralConstantUnits
        | P::DerivativeConstantUnits => Some(Scalar(D::Enumerated)),
        P::ManipulatedVariableReference | P::ControlledVariableReference | P::SetpointReference => {
            Some(Scalar(D::Any))
        }
        P::PriorityForWriting | P::UpdateInterval => Some(Scalar(D::Unsigned)),
        _ => reporting(property),
    }
}

fn trend_log(property: PropertyId) -> Option<ResolvedDatatype> {
    use PropertyId as P;

    match property {
        P::Enable | P::StopWhenFull | P::AlignIntervals | P::Trigger => Some(Scalar(D::Boolean)),
        P::StartTime | P::StopTime | P::LogDeviceObjectProperty | P::ClientCovIncrement => {
            Some(Scalar(D::Any))
        }
        P::LogInterval
        | P::CovResubscriptionInterval
        | P::BufferSize
        | P::RecordCount
        | P::TotalRecordCount
        | P::NotificationThreshold
        | P::RecordsSinceNotification
        | P::LastNotifyRecord
        | P::IntervalOffset => Some(Scalar(D::Unsigned)),
        P::LogBuffer => Some(List(D::Any)),
        P::LoggingType => Some(Scalar(D::Enumerated)),
        _ => reporting(property),
    }
}

fn accumulator(property: PropertyId) -> Option<ResolvedDatatype> {
    use PropertyId as P;

    match property {
        P::PresentValue | P::MaxPresValue | P::ValueBeforeChange | P::ValueSet | P::PulseRate => {
            Some(Scalar(D::Unsigned))
        }
        P::Scale | P::Prescale | P::ValueChangeTime => Some(Scalar(D::Any)),
        P::Units => Some(Scalar(D::Enumerated)),
        _ => reporting(property),
    }
}

fn structured_view(property: PropertyId) -> Option<ResolvedDatatype> {
    use PropertyId as P;

    match property {
        P::NodeType => Some(Scalar(D::Enumerated)),
        P::NodeSubtype => Some(Scalar(D::CharacterString)),
        P::SubordinateList => Some(Array(D::Any)),
        P::SubordinateAnnotations => Some(Array(D::CharacterString)),
        _ => None,
    }
}
