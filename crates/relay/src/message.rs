//! One field or file of a multipart body, prepared for relaying.
//!
//! Every constructor ends in [`MultipartMessage::from_bytes`], and the length is always read
//! from the payload itself, so the serialized `length` can never disagree with `data`.
//!
//! The wire shape of a message is
//!
//! ```json
//! {"name": "file", "length": 4, "contentType": "image/png", "data": [137, 80, 78, 71]}
//! ```

use bytes::Bytes;
use encoding_rs::UTF_8;
use mime::Mime;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use tracing::trace;

use crate::charset::CharsetRegistry;
use crate::error::{BoxError, RelayError};
use crate::utils::ensure;

/// Turns a value into the bytes of a message.
#[cfg_attr(test, mockall::automock(type Value = String;))]
pub trait BytesCodec {
    type Value;

    fn encode(&self, value: &Self::Value) -> Result<Bytes, BoxError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "WireMessage")]
pub struct MultipartMessage {
    name: String,
    content_type: Mime,
    data: Bytes,
}

impl MultipartMessage {
    /// Creates a message from raw bytes, typed `application/octet-stream` by default.
    pub fn from_bytes(
        name: impl Into<String>,
        data: impl Into<Bytes>,
        content_type: Option<Mime>,
    ) -> Result<Self, RelayError> {
        let name = name.into();
        ensure!(!name.is_empty(), RelayError::invalid_message("name must not be empty"));

        Ok(Self { name, content_type: content_type.unwrap_or(mime::APPLICATION_OCTET_STREAM), data: data.into() })
    }

    /// Creates a message from text, encoded with the charset of `content_type`.
    ///
    /// The content type defaults to `text/plain`. Without a `charset` parameter the text is
    /// encoded as UTF-8 and `charset=utf-8` is added to the stored content type.
    pub fn from_string(
        name: impl Into<String>,
        value: &str,
        content_type: Option<Mime>,
        charsets: &CharsetRegistry,
    ) -> Result<Self, RelayError> {
        let content_type = content_type.unwrap_or(mime::TEXT_PLAIN);
        let charset = content_type.get_param(mime::CHARSET).map(|charset| charset.as_str().to_owned());

        let (content_type, encoding) = match charset {
            Some(charset) => {
                let encoding = charsets.lookup(&charset)?;
                (content_type, encoding)
            }
            None => (with_utf8_charset(&content_type)?, UTF_8),
        };

        // encoding_rs falls back to utf-8 for charsets it can only decode (utf-16, replacement)
        ensure!(encoding.output_encoding() == encoding, RelayError::Unencodable { charset: encoding.name() });

        let (bytes, _, had_errors) = encoding.encode(value);
        ensure!(!had_errors, RelayError::Unencodable { charset: encoding.name() });

        trace!(charset = encoding.name(), length = bytes.len(), "encoded string message");
        Self::from_bytes(name, bytes.into_owned(), Some(content_type))
    }

    /// Creates a message holding the JSON text of `value`, typed `application/json; charset=utf-8`
    /// unless another content type is given.
    pub fn from_json<T>(
        name: impl Into<String>,
        value: &T,
        content_type: Option<Mime>,
        charsets: &CharsetRegistry,
    ) -> Result<Self, RelayError>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string(value)?;
        Self::from_string(name, &json, Some(content_type.unwrap_or(mime::APPLICATION_JSON)), charsets)
    }

    /// Creates a message from any value the given codec can turn into bytes.
    pub fn from_value<C>(
        name: impl Into<String>,
        value: &C::Value,
        codec: &C,
        content_type: Option<Mime>,
    ) -> Result<Self, RelayError>
    where
        C: BytesCodec,
    {
        let bytes = codec.encode(value).map_err(RelayError::codec)?;
        Self::from_bytes(name, bytes, content_type)
    }

    /// Serializes messages into the JSON array relayed in place of a multipart body.
    pub fn encode_all(messages: &[MultipartMessage]) -> Result<String, RelayError> {
        Ok(serde_json::to_string(messages)?)
    }

    /// Parses a JSON array produced by [`MultipartMessage::encode_all`].
    pub fn decode_all(json: &str) -> Result<Vec<MultipartMessage>, RelayError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &Mime {
        &self.content_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// The byte length of the payload.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn set_data(&mut self, data: impl Into<Bytes>) {
        self.data = data.into();
    }

    pub fn into_data(self) -> Bytes {
        self.data
    }
}

impl Serialize for MultipartMessage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("MultipartMessage", 4)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("length", &self.len())?;
        state.serialize_field("contentType", &self.content_type.to_string())?;
        state.serialize_field::<[u8]>("data", self.data.as_ref())?;
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMessage {
    name: String,
    length: usize,
    content_type: String,
    data: Vec<u8>,
}

impl TryFrom<WireMessage> for MultipartMessage {
    type Error = RelayError;

    fn try_from(wire: WireMessage) -> Result<Self, Self::Error> {
        ensure!(
            wire.length == wire.data.len(),
            RelayError::invalid_message(format!("length {} does not match data length {}", wire.length, wire.data.len()))
        );

        let content_type = wire.content_type.parse::<Mime>().map_err(RelayError::invalid_content_type)?;
        MultipartMessage::from_bytes(wire.name, wire.data, Some(content_type))
    }
}

fn with_utf8_charset(content_type: &Mime) -> Result<Mime, RelayError> {
    format!("{content_type}; charset=utf-8").parse::<Mime>().map_err(RelayError::invalid_content_type)
}
