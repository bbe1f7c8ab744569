use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use futures::future::try_join_all;
use tracing::{debug, trace, warn};

use crate::body::RelayBody;
use crate::error::RelayError;
use crate::message::MultipartMessage;
use crate::provider::BodyProvider;
use crate::request::{MULTIPART, Part, RelayRequest, RequestBody};

/// Relays a multipart request as a JSON array of [`MultipartMessage`]s.
///
/// All parts are read concurrently on the calling task, the array keeps the order of the
/// parts in the request no matter which read finishes first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultipartBodyProvider;

#[async_trait]
impl BodyProvider for MultipartBodyProvider {
    async fn body(&self, request: &RelayRequest) -> Result<RelayBody, RelayError> {
        let RequestBody::Multipart(parts) = request.body() else {
            let actual = request.body().shape();
            warn!(expected = MULTIPART, actual, "request shape does not match body provider");
            return Err(RelayError::invalid_request_shape(MULTIPART, actual));
        };

        let messages = try_join_all(parts.iter().enumerate().map(|(index, part)| read_part(index, part))).await?;
        let json = MultipartMessage::encode_all(&messages)?;

        debug!(parts = messages.len(), length = json.len(), "extracted multipart body");
        Ok(RelayBody::Text(json))
    }

    /// The relayed body is a JSON document, whatever the encodings of the parts are.
    fn encoding(&self, _request: &RelayRequest) -> Result<&'static Encoding, RelayError> {
        Ok(UTF_8)
    }
}

async fn read_part(index: usize, part: &Part) -> Result<MultipartMessage, RelayError> {
    let bytes = part.finalize().await?;
    trace!(index, name = part.name(), length = bytes.len(), "read multipart part");
    MultipartMessage::from_bytes(part.name(), bytes, Some(part.content_type().clone()))
}
