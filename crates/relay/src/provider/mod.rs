//! Body providers turn a [`RelayRequest`] into the body relayed in its place.
//!
//! [`build`] picks the provider for a content type:
//!
//! | content type                  | provider                  |
//! |-------------------------------|---------------------------|
//! | `audio/*`, `video/*`, `image/*` | [`RawBodyProvider`]     |
//! | `multipart/*`                 | [`MultipartBodyProvider`] |
//! | `application/json`            | [`StringBodyProvider`]    |
//! | other `application/*`         | [`RawBodyProvider`]       |
//! | `text/*`                      | [`StringBodyProvider`]    |
//!
//! Any other primary type is rejected with [`RelayError::UnsupportedContentType`].

mod multipart;
mod raw;
mod string;

pub use multipart::MultipartBodyProvider;
pub use raw::RawBodyProvider;
pub use string::StringBodyProvider;

use async_trait::async_trait;
use bytes::Bytes;
use encoding_rs::Encoding;
use mime::Mime;
use tracing::{debug, warn};

use crate::body::RelayBody;
use crate::error::RelayError;
use crate::request::{RelayRequest, RequestBody, SINGLE_BODY};

#[async_trait]
pub trait BodyProvider {
    /// Reads the whole body of `request`.
    async fn body(&self, request: &RelayRequest) -> Result<RelayBody, RelayError>;

    /// The text encoding the relayed body should be interpreted with.
    fn encoding(&self, request: &RelayRequest) -> Result<&'static Encoding, RelayError>;
}

/// The provider selected for a content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyProviderKind {
    Raw(RawBodyProvider),
    String(StringBodyProvider),
    Multipart(MultipartBodyProvider),
}

impl BodyProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            BodyProviderKind::Raw(_) => "raw",
            BodyProviderKind::String(_) => "string",
            BodyProviderKind::Multipart(_) => "multipart",
        }
    }
}

#[async_trait]
impl BodyProvider for BodyProviderKind {
    async fn body(&self, request: &RelayRequest) -> Result<RelayBody, RelayError> {
        match self {
            BodyProviderKind::Raw(provider) => provider.body(request).await,
            BodyProviderKind::String(provider) => provider.body(request).await,
            BodyProviderKind::Multipart(provider) => provider.body(request).await,
        }
    }

    fn encoding(&self, request: &RelayRequest) -> Result<&'static Encoding, RelayError> {
        match self {
            BodyProviderKind::Raw(provider) => provider.encoding(request),
            BodyProviderKind::String(provider) => provider.encoding(request),
            BodyProviderKind::Multipart(provider) => provider.encoding(request),
        }
    }
}

/// Selects the body provider for `content_type`.
pub fn build(content_type: &Mime) -> Result<BodyProviderKind, RelayError> {
    let provider = match content_type.type_().as_str() {
        "audio" | "video" | "image" => BodyProviderKind::Raw(RawBodyProvider),
        "multipart" => BodyProviderKind::Multipart(MultipartBodyProvider),
        "application" if content_type.subtype() == mime::JSON => BodyProviderKind::String(StringBodyProvider),
        "application" => BodyProviderKind::Raw(RawBodyProvider),
        "text" => BodyProviderKind::String(StringBodyProvider),
        _ => {
            warn!(content_type = %content_type, "no body provider for content type");
            return Err(RelayError::unsupported_content_type(content_type));
        }
    };

    debug!(content_type = %content_type, provider = provider.name(), "selected body provider");
    Ok(provider)
}

/// Selects the body provider for the declared content type of `request`.
pub fn for_request(request: &RelayRequest) -> Result<BodyProviderKind, RelayError> {
    build(&request.content_type()?)
}

/// The materialized body of a single-body request.
fn single_body(request: &RelayRequest) -> Result<&Bytes, RelayError> {
    match request.body() {
        RequestBody::Full(bytes) => Ok(bytes),
        other => {
            warn!(expected = SINGLE_BODY, actual = other.shape(), "request shape does not match body provider");
            Err(RelayError::invalid_request_shape(SINGLE_BODY, other.shape()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BodyProviderKind, MultipartBodyProvider, RawBodyProvider, StringBodyProvider, build, for_request};
    use crate::error::RelayError;
    use crate::request::{RelayRequest, RequestBody};
    use http::HeaderValue;
    use http::header::CONTENT_TYPE;
    use mime::Mime;

    fn provider_for(content_type: &str) -> Result<BodyProviderKind, RelayError> {
        let content_type: Mime = content_type.parse().unwrap();
        build(&content_type)
    }

    #[test]
    fn test_media_types_are_raw() {
        for content_type in ["audio/mpeg", "video/mp4", "image/png", "image/svg+xml"] {
            assert_eq!(provider_for(content_type).unwrap(), BodyProviderKind::Raw(RawBodyProvider));
        }
    }

    #[test]
    fn test_multipart_any_subtype() {
        for content_type in ["multipart/form-data; boundary=abc", "multipart/mixed", "multipart/related"] {
            assert_eq!(provider_for(content_type).unwrap(), BodyProviderKind::Multipart(MultipartBodyProvider));
        }
    }

    #[test]
    fn test_application_types() {
        assert_eq!(provider_for("application/json").unwrap(), BodyProviderKind::String(StringBodyProvider));
        assert_eq!(
            provider_for("application/json; charset=utf-8").unwrap(),
            BodyProviderKind::String(StringBodyProvider)
        );
        assert_eq!(provider_for("application/octet-stream").unwrap(), BodyProviderKind::Raw(RawBodyProvider));
        assert_eq!(provider_for("application/unknown-binary").unwrap(), BodyProviderKind::Raw(RawBodyProvider));
        assert_eq!(provider_for("application/xml").unwrap(), BodyProviderKind::Raw(RawBodyProvider));
    }

    #[test]
    fn test_text_any_subtype() {
        for content_type in ["text/plain", "text/html; charset=utf-8", "text/csv"] {
            assert_eq!(provider_for(content_type).unwrap(), BodyProviderKind::String(StringBodyProvider));
        }
    }

    #[test]
    fn test_unsupported_content_type() {
        for content_type in ["font/ttf", "model/gltf+json", "message/rfc822"] {
            let err = provider_for(content_type).unwrap_err();
            assert!(matches!(err, RelayError::UnsupportedContentType { .. }));
            assert!(err.to_string().contains("multipart/form-data, application/json, text/plain"));
        }
    }

    #[test]
    fn test_for_request_uses_header() {
        let request = RelayRequest::new(RequestBody::from("hello"))
            .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert_eq!(for_request(&request).unwrap().name(), "string");

        let request = RelayRequest::new(RequestBody::from("hello"));
        assert_eq!(for_request(&request).unwrap().name(), "raw");
    }
}
