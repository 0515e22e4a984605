use bacread_client::{ClientError, DecodedValue, NetworkAddress};
use bacread_core::types::Segmentation;
use bacread_datalink::{resolve_with, AddressError, HostLookup};
use clap::ValueEnum;

/// CLI spelling of [`Segmentation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SegmentationArg {
    SegmentedBoth,
    SegmentedTransmit,
    SegmentedReceive,
    NoSegmentation,
}

impl SegmentationArg {
    pub const fn into_segmentation(self) -> Segmentation {
        match self {
            Self::SegmentedBoth => Segmentation::SegmentedBoth,
            Self::SegmentedTransmit => Segmentation::SegmentedTransmit,
            Self::SegmentedReceive => Segmentation::SegmentedReceive,
            Self::NoSegmentation => Segmentation::NoSegmentation,
        }
    }
}

/// Resolves the device specifier and the local binding specifier.
///
/// Both go through host lookup, so either may name a host.
pub async fn resolve_endpoints<L: HostLookup>(
    address: &str,
    local: &str,
    lookup: &L,
) -> Result<(NetworkAddress, NetworkAddress), AddressError> {
    let destination = resolve_with(address, lookup).await?;
    let local = resolve_with(local, lookup).await?;
    log::debug!("reading from {destination}, binding {local}");
    Ok((destination, local))
}

/// One line of output for a read outcome.
pub fn render(
    outcome: &Result<DecodedValue, ClientError>,
    json: bool,
) -> Result<String, serde_json::Error> {
    match (outcome, json) {
        (Ok(decoded), true) => serde_json::to_string(decoded),
        (Ok(decoded), false) => Ok(format!(
            "{} {}{}: {}",
            decoded.object_id,
            decoded.property_id,
            decoded
                .array_index
                .map(|i| format!("[{i}]"))
                .unwrap_or_default(),
            decoded.value
        )),
        (Err(err), true) => serde_json::to_string(&serde_json::json!({ "error": err.to_string() })),
        (Err(err), false) => Ok(format!("error: {err}")),
    }
}
