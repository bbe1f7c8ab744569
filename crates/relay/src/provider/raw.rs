use async_trait::async_trait;
use encoding_rs::Encoding;
use tracing::debug;

use crate::body::RelayBody;
use crate::error::RelayError;
use crate::provider::{BodyProvider, single_body};
use crate::request::RelayRequest;

/// Relays the body as the exact bytes of the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawBodyProvider;

#[async_trait]
impl BodyProvider for RawBodyProvider {
    async fn body(&self, request: &RelayRequest) -> Result<RelayBody, RelayError> {
        let bytes = single_body(request)?;
        debug!(length = bytes.len(), "extracted raw body");
        Ok(RelayBody::Bytes(bytes.clone()))
    }

    fn encoding(&self, request: &RelayRequest) -> Result<&'static Encoding, RelayError> {
        single_body(request)?;
        Ok(request.encoding())
    }
}
