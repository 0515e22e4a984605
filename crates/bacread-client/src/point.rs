use crate::{
    ClientError, DecodedValue, ReadDescriptor, RequestBuilder, ResponseDecoder, Session,
};
use bacread_core::datatype::DatatypeRegistry;
use bacread_datalink::DataLink;
use std::sync::Arc;
use tokio::sync::mpsc;

/// A single property read over a session, repeated on demand.
///
/// The descriptor is validated once, when the point is created; each
/// [`read`](Self::read) then builds, submits, waits and decodes.
pub struct ReadPoint<D> {
    session: Session<D>,
    builder: RequestBuilder,
    decoder: ResponseDecoder,
    descriptor: ReadDescriptor,
    vendor_id: u16,
}

impl<D: DataLink + 'static> ReadPoint<D> {
    pub fn new(
        session: Session<D>,
        registry: Arc<DatatypeRegistry>,
        descriptor: ReadDescriptor,
        vendor_id: u16,
    ) -> Result<Self, ClientError> {
        let builder = RequestBuilder::new(registry.clone(), vendor_id);
        builder.build(&descriptor)?;
        Ok(Self {
            session,
            builder,
            decoder: ResponseDecoder::new(registry),
            descriptor,
            vendor_id,
        })
    }

    pub fn descriptor(&self) -> &ReadDescriptor {
        &self.descriptor
    }

    pub fn session(&self) -> &Session<D> {
        &self.session
    }

    pub async fn read(&self) -> Result<DecodedValue, ClientError> {
        if self.session.is_closed() {
            log::error!("session is closed");
            return Err(ClientError::SessionClosed);
        }
        let request = self.builder.build(&self.descriptor)?;
        let response = self.session.submit(&request).await?.wait().await?;
        self.decoder.decode(&response, self.vendor_id)
    }

    /// One read per trigger, in order. A failed read is logged and reported
    /// in its slot; later triggers still run.
    pub async fn read_each<T>(
        &self,
        triggers: impl IntoIterator<Item = T>,
    ) -> Vec<Result<DecodedValue, ClientError>> {
        let mut outcomes = Vec::new();
        for _ in triggers {
            outcomes.push(self.read_logged().await);
        }
        outcomes
    }

    /// Reads once per trigger received until either channel closes.
    pub async fn run<T>(
        &self,
        mut triggers: mpsc::Receiver<T>,
        outcomes: mpsc::Sender<Result<DecodedValue, ClientError>>,
    ) {
        while triggers.recv().await.is_some() {
            if outcomes.send(self.read_logged().await).await.is_err() {
                break;
            }
        }
    }

    async fn read_logged(&self) -> Result<DecodedValue, ClientError> {
        let outcome = self.read().await;
        if let Err(err) = &outcome {
            log::warn!(
                "read of {} {} {} from {} failed: {err}",
                self.descriptor.object_type,
                self.descriptor.instance,
                self.descriptor.property,
                self.descriptor.destination
            );
        }
        outcome
    }
}
