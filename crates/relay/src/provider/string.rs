use async_trait::async_trait;
use encoding_rs::Encoding;
use tracing::debug;

use crate::body::RelayBody;
use crate::error::RelayError;
use crate::provider::{BodyProvider, single_body};
use crate::request::RelayRequest;

/// Relays the body as text decoded with the request encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringBodyProvider;

#[async_trait]
impl BodyProvider for StringBodyProvider {
    async fn body(&self, request: &RelayRequest) -> Result<RelayBody, RelayError> {
        let bytes = single_body(request)?;
        let encoding = request.encoding();

        let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) else {
            return Err(RelayError::invalid_body(format!("request body is not valid {}", encoding.name())));
        };

        debug!(charset = encoding.name(), length = bytes.len(), "extracted string body");
        Ok(RelayBody::Text(text.into_owned()))
    }

    fn encoding(&self, request: &RelayRequest) -> Result<&'static Encoding, RelayError> {
        single_body(request)?;
        Ok(request.encoding())
    }
}
