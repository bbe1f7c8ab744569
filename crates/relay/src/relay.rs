//! Entry point tying request conversion, provider selection and body extraction together.

use encoding_rs::Encoding;
use http::Request;
use mime::Mime;
use serde::Serialize;
use tracing::debug;

use crate::body::RelayBody;
use crate::charset::CharsetRegistry;
use crate::error::RelayError;
use crate::message::MultipartMessage;
use crate::provider::{self, BodyProvider, BodyProviderKind};
use crate::request::{RelayRequest, RequestBody};

/// Extracts request bodies for relaying, configured through [`BodyRelay::builder`].
#[derive(Debug, Clone)]
pub struct BodyRelay {
    charsets: CharsetRegistry,
}

/// What [`BodyRelay::extract`] produced for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedBody {
    pub provider: BodyProviderKind,
    pub body: RelayBody,
    pub encoding: &'static Encoding,
}

impl BodyRelay {
    /// Creates a builder starting from the standard charsets.
    pub fn builder() -> BodyRelayBuilder {
        BodyRelayBuilder { charsets: CharsetRegistry::standard() }
    }

    pub fn charsets(&self) -> &CharsetRegistry {
        &self.charsets
    }

    /// Converts an `http::Request`, resolving its body encoding with the configured charsets.
    pub fn request(&self, request: Request<RequestBody>) -> Result<RelayRequest, RelayError> {
        RelayRequest::from_http(request, &self.charsets)
    }

    /// Selects the provider for the request content type and reads the body with it.
    pub async fn extract(&self, request: &RelayRequest) -> Result<ExtractedBody, RelayError> {
        let provider = provider::for_request(request)?;
        let body = provider.body(request).await?;
        let encoding = provider.encoding(request)?;

        debug!(
            method = %request.method(),
            uri = %request.uri(),
            provider = provider.name(),
            charset = encoding.name(),
            length = body.len(),
            "extracted request body"
        );
        Ok(ExtractedBody { provider, body, encoding })
    }

    /// [`MultipartMessage::from_string`] with the configured charsets.
    pub fn message_from_string(
        &self,
        name: impl Into<String>,
        value: &str,
        content_type: Option<Mime>,
    ) -> Result<MultipartMessage, RelayError> {
        MultipartMessage::from_string(name, value, content_type, &self.charsets)
    }

    /// [`MultipartMessage::from_json`] with the configured charsets.
    pub fn message_from_json<T>(
        &self,
        name: impl Into<String>,
        value: &T,
        content_type: Option<Mime>,
    ) -> Result<MultipartMessage, RelayError>
    where
        T: Serialize + ?Sized,
    {
        MultipartMessage::from_json(name, value, content_type, &self.charsets)
    }
}

impl Default for BodyRelay {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug)]
pub struct BodyRelayBuilder {
    charsets: CharsetRegistry,
}

impl BodyRelayBuilder {
    /// Replaces the whole charset registry.
    #[must_use]
    pub fn charsets(mut self, charsets: CharsetRegistry) -> Self {
        self.charsets = charsets;
        self
    }

    /// Registers one more charset label.
    #[must_use]
    pub fn charset(mut self, label: impl AsRef<str>, encoding: &'static Encoding) -> Self {
        self.charsets.register(label, encoding);
        self
    }

    pub fn build(self) -> BodyRelay {
        BodyRelay { charsets: self.charsets }
    }
}
