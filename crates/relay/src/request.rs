//! The outgoing request as seen by the body providers.
//!
//! A [`RelayRequest`] carries the request head, the text encoding declared for its body and
//! one of three body shapes: a single materialized body, a single-shot stream, or an ordered
//! list of multipart [`Part`]s.

use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Method, Request, Uri};
use http_body::Body as HttpBody;
use mime::Mime;

use crate::body::OnceBody;
use crate::charset::CharsetRegistry;
use crate::error::{BoxError, RelayError};

pub(crate) const SINGLE_BODY: &str = "single-body";
pub(crate) const STREAMING: &str = "streaming";
pub(crate) const MULTIPART: &str = "multipart";

#[derive(Debug)]
pub struct RelayRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    encoding: &'static Encoding,
    body: RequestBody,
}

impl RelayRequest {
    /// Creates a `GET /` request with no headers and a UTF-8 encoding.
    pub fn new(body: RequestBody) -> Self {
        Self { method: Method::GET, uri: Uri::default(), headers: HeaderMap::new(), encoding: UTF_8, body }
    }

    /// Converts an `http::Request`, resolving the body encoding from the `charset` parameter
    /// of its `Content-Type` header. Requests without a charset are UTF-8.
    pub fn from_http(request: Request<RequestBody>, charsets: &CharsetRegistry) -> Result<Self, RelayError> {
        let (parts, body) = request.into_parts();
        let mut relay_request =
            Self { method: parts.method, uri: parts.uri, headers: parts.headers, encoding: UTF_8, body };

        let content_type = relay_request.content_type()?;
        relay_request.encoding = charsets.for_content_type(&content_type, UTF_8)?;
        Ok(relay_request)
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// The declared content type, `application/octet-stream` when the header is absent.
    pub fn content_type(&self) -> Result<Mime, RelayError> {
        let Some(value) = self.headers.get(CONTENT_TYPE) else {
            return Ok(mime::APPLICATION_OCTET_STREAM);
        };

        let value = value.to_str().map_err(RelayError::invalid_content_type)?;
        value.parse::<Mime>().map_err(RelayError::invalid_content_type)
    }
}

#[derive(Debug)]
pub enum RequestBody {
    /// A fully materialized body.
    Full(Bytes),
    /// A streaming body, readable once.
    Stream(OnceBody),
    /// Named parts in their original order.
    Multipart(Vec<Part>),
}

impl RequestBody {
    pub fn empty() -> Self {
        RequestBody::Full(Bytes::new())
    }

    pub fn stream<B>(body: B) -> Self
    where
        B: HttpBody<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        RequestBody::Stream(OnceBody::new(body))
    }

    pub fn multipart(parts: impl IntoIterator<Item = Part>) -> Self {
        RequestBody::Multipart(parts.into_iter().collect())
    }

    pub(crate) fn shape(&self) -> &'static str {
        match self {
            RequestBody::Full(_) => SINGLE_BODY,
            RequestBody::Stream(_) => STREAMING,
            RequestBody::Multipart(_) => MULTIPART,
        }
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        RequestBody::Full(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Full(Bytes::from(bytes))
    }
}

impl From<String> for RequestBody {
    fn from(value: String) -> Self {
        RequestBody::Full(Bytes::from(value))
    }
}

impl From<&'static str> for RequestBody {
    fn from(value: &'static str) -> Self {
        RequestBody::Full(Bytes::from_static(value.as_bytes()))
    }
}

impl From<Vec<Part>> for RequestBody {
    fn from(parts: Vec<Part>) -> Self {
        RequestBody::Multipart(parts)
    }
}

/// One named field or file of a multipart request.
#[derive(Debug)]
pub struct Part {
    name: String,
    filename: Option<String>,
    content_type: Mime,
    body: PartBody,
}

impl Part {
    fn new(name: impl Into<String>, content_type: Mime, body: PartBody) -> Self {
        Self { name: name.into(), filename: None, content_type, body }
    }

    /// A binary part, typed `application/octet-stream` until told otherwise.
    pub fn bytes(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self::new(name, mime::APPLICATION_OCTET_STREAM, PartBody::Full(bytes.into()))
    }

    /// A UTF-8 text field typed `text/plain; charset=utf-8`.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, mime::TEXT_PLAIN_UTF_8, PartBody::Full(Bytes::from(value.into())))
    }

    /// A part whose content is streamed, it is collected when the request body is serialized.
    pub fn stream<B>(name: impl Into<String>, body: B) -> Self
    where
        B: HttpBody<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        Self::new(name, mime::APPLICATION_OCTET_STREAM, PartBody::Stream(OnceBody::new(body)))
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: Mime) -> Self {
        self.content_type = content_type;
        self
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn content_type(&self) -> &Mime {
        &self.content_type
    }

    pub fn body(&self) -> &PartBody {
        &self.body
    }

    /// Reads the whole content of this part.
    pub async fn finalize(&self) -> Result<Bytes, RelayError> {
        match &self.body {
            PartBody::Full(bytes) => Ok(bytes.clone()),
            PartBody::Stream(body) => body.collect().await,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PartBody {
    Full(Bytes),
    Stream(OnceBody),
}
