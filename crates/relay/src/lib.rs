//! Content-type driven request body extraction for relaying HTTP traffic
//!
//! When an outgoing request has to travel through an intermediary channel instead of a
//! plain socket, its body must first be turned into a self-contained payload. This crate
//! picks the right strategy for the request's content type and produces that payload:
//! raw bytes, decoded text, or a JSON array describing every part of a multipart form.
//!
//! # Example
//!
//! ```no_run
//! use http::Request;
//! use http::header::CONTENT_TYPE;
//! use micro_relay::{BodyRelay, Part, RequestBody};
//!
//! # async fn relay() -> Result<(), micro_relay::RelayError> {
//! let relay = BodyRelay::default();
//!
//! let parts = vec![
//!     Part::text("title", "holiday"),
//!     Part::bytes("photo", vec![0x89u8, 0x50, 0x4E, 0x47]).with_content_type(mime::IMAGE_PNG),
//! ];
//! let request = Request::builder()
//!     .method("POST")
//!     .uri("https://example.com/upload")
//!     .header(CONTENT_TYPE, "multipart/form-data; boundary=relay")
//!     .body(RequestBody::from(parts))
//!     .expect("valid request");
//!
//! let request = relay.request(request)?;
//! let extracted = relay.extract(&request).await?;
//!
//! // [{"name":"title","length":7,"contentType":"text/plain; charset=utf-8","data":[...]}, ...]
//! println!("{}", extracted.body.as_text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`provider`]: the [`BodyProvider`] strategies and the [`provider::build`] factory
//! - [`MultipartMessage`]: one multipart part ready for re-serialization
//! - [`CharsetRegistry`]: the explicit charset label to encoder table
//! - [`RelayRequest`]: the request shapes providers work on
//! - [`BodyRelay`]: configured entry point running factory and provider in one call
//!
//! # Provider selection
//!
//! | primary type                | provider                                     |
//! |-----------------------------|----------------------------------------------|
//! | `audio`, `video`, `image`   | raw bytes                                    |
//! | `multipart`                 | JSON array of [`MultipartMessage`]           |
//! | `application`               | text for `json`, raw bytes for anything else |
//! | `text`                      | text                                         |
//!
//! Other primary types fail with [`RelayError::UnsupportedContentType`].
//!
//! # Error Handling
//!
//! Every operation returns [`RelayError`]. Errors are never recovered internally and no
//! partial result is produced, retrying is left to the transport using this crate.

mod body;
mod charset;
mod error;
mod message;
mod relay;
mod request;

pub mod provider;

mod utils;

pub use body::{BoxBody, OnceBody, RelayBody};
pub use charset::CharsetRegistry;
pub use error::{BoxError, RelayError};
pub use message::{BytesCodec, MultipartMessage};
pub use provider::{BodyProvider, BodyProviderKind};
pub use relay::{BodyRelay, BodyRelayBuilder, ExtractedBody};
pub use request::{Part, PartBody, RelayRequest, RequestBody};
