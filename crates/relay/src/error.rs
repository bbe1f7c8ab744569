use std::error::Error as StdError;
use thiserror::Error;

/// Boxed error produced by streaming bodies and byte codecs.
pub type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error(
        "unsupported content type {content_type}, expected multipart/form-data, application/json, \
         text/plain, application/octet-stream, or any audio/video/image type"
    )]
    UnsupportedContentType { content_type: String },

    #[error("invalid request shape: expected {expected} request, got {actual} request")]
    InvalidRequestShape { expected: &'static str, actual: &'static str },

    #[error("charset {charset} is not registered")]
    CharsetNotRegistered { charset: String },

    #[error("invalid content type: {reason}")]
    InvalidContentType { reason: String },

    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("body has been consumed")]
    BodyConsumed,

    #[error("failed to read body: {source}")]
    BodyRead { source: BoxError },

    #[error("text can not be encoded as {charset}")]
    Unencodable { charset: &'static str },

    #[error("invalid multipart message: {reason}")]
    InvalidMessage { reason: String },

    #[error("codec error: {source}")]
    Codec { source: BoxError },

    #[error("json error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl RelayError {
    pub fn unsupported_content_type<S: ToString>(content_type: S) -> Self {
        Self::UnsupportedContentType { content_type: content_type.to_string() }
    }

    pub fn invalid_request_shape(expected: &'static str, actual: &'static str) -> Self {
        Self::InvalidRequestShape { expected, actual }
    }

    pub fn charset_not_registered<S: ToString>(charset: S) -> Self {
        Self::CharsetNotRegistered { charset: charset.to_string() }
    }

    pub fn invalid_content_type<S: ToString>(str: S) -> Self {
        Self::InvalidContentType { reason: str.to_string() }
    }

    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn invalid_message<S: ToString>(str: S) -> Self {
        Self::InvalidMessage { reason: str.to_string() }
    }

    pub fn body_read<E: Into<BoxError>>(e: E) -> Self {
        Self::BodyRead { source: e.into() }
    }

    pub fn codec<E: Into<BoxError>>(e: E) -> Self {
        Self::Codec { source: e.into() }
    }
}
