use bacread_client::{
    DatatypeRegistry, DeviceIdentity, ObjectTypeRef, PropertyRef, ReadDescriptor, ReadPoint,
    Session, SessionConfig,
};
use bacread_core::types::MaxApdu;
use bacread_datalink::SystemLookup;
use bacread_tools::{render, resolve_endpoints, SegmentationArg};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "bacnet-read")]
struct Args {
    /// Device address, `host[/prefix][:port]`.
    #[arg(long)]
    address: String,
    /// Object type name (`analogInput`, `analog-input`) or numeric code.
    #[arg(long, default_value = "analogInput")]
    object_type: String,
    #[arg(long)]
    instance: u32,
    /// Property name or numeric identifier.
    #[arg(long, default_value = "presentValue")]
    property: String,
    #[arg(long)]
    array_index: Option<u32>,
    #[arg(long, default_value_t = 0)]
    vendor_id: u16,
    /// Local bind address, `host[/prefix][:port]`.
    #[arg(long, default_value = "0.0.0.0:47808")]
    local: String,
    #[arg(long, default_value = "bacnet-read")]
    device_name: String,
    #[arg(long, default_value_t = 599)]
    device_id: u32,
    /// Maximum APDU length accepted, in octets.
    #[arg(long, default_value_t = 1024)]
    max_apdu: u16,
    #[arg(long, value_enum, default_value = "segmented-both")]
    segmentation: SegmentationArg,
    #[arg(long, default_value_t = 3000)]
    timeout_ms: u64,
    /// Number of reads to perform.
    #[arg(long, default_value_t = 1)]
    count: u32,
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let (destination, local) =
        resolve_endpoints(&args.address, &args.local, &SystemLookup).await?;
    let max_apdu = MaxApdu::from_octets(args.max_apdu).ok_or("max APDU must be at least 50")?;
    let identity = DeviceIdentity::builder(args.device_name, args.device_id)
        .max_apdu(max_apdu)
        .segmentation(args.segmentation.into_segmentation())
        .vendor_id(args.vendor_id)
        .build()?;
    let config =
        SessionConfig::default().with_response_timeout(Duration::from_millis(args.timeout_ms));
    let session = Session::open(identity, &local, config).await?;

    let mut descriptor = ReadDescriptor::new(
        destination,
        ObjectTypeRef::parse(&args.object_type),
        args.instance,
        PropertyRef::parse(&args.property),
    );
    descriptor.array_index = args.array_index;
    let point = ReadPoint::new(
        session.clone(),
        Arc::new(DatatypeRegistry::standard()),
        descriptor,
        args.vendor_id,
    )?;

    let outcomes = point.read_each(0..args.count).await;
    session.close().await;

    let mut failed = false;
    for outcome in &outcomes {
        println!("{}", render(outcome, args.json)?);
        failed |= outcome.is_err();
    }
    if failed {
        std::process::exit(1);
    }
    Ok(())
}
