use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http_body::Body as HttpBody;
use http_body_util::BodyExt;
use http_body_util::combinators::UnsyncBoxBody;
use tokio::sync::Mutex;

use crate::error::{BoxError, RelayError};

pub type BoxBody = UnsyncBoxBody<Bytes, BoxError>;

/// A streaming body that can be collected exactly once.
///
/// Clones share the same slot, whoever collects first takes the stream and later attempts
/// fail with [`RelayError::BodyConsumed`].
#[derive(Clone)]
pub struct OnceBody {
    inner: Arc<Mutex<Option<BoxBody>>>,
}

impl OnceBody {
    pub fn new<B>(body: B) -> Self
    where
        B: HttpBody<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let body = body.map_err(Into::<BoxError>::into).boxed_unsync();
        OnceBody { inner: Arc::new(Mutex::new(Some(body))) }
    }

    pub async fn can_consume(&self) -> bool {
        let guard = self.inner.lock().await;
        guard.is_some()
    }

    /// Takes the stream out of the slot and reads it to the end.
    pub async fn collect(&self) -> Result<Bytes, RelayError> {
        let body = {
            let mut guard = self.inner.lock().await;
            guard.take().ok_or(RelayError::BodyConsumed)?
        };

        body.collect().await.map(|collected| collected.to_bytes()).map_err(RelayError::body_read)
    }
}

impl fmt::Debug for OnceBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnceBody").finish_non_exhaustive()
    }
}

/// The body handed back by a provider, ready to be relayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayBody {
    Bytes(Bytes),
    Text(String),
}

impl RelayBody {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RelayBody::Bytes(bytes) => bytes,
            RelayBody::Text(text) => text.as_bytes(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RelayBody::Bytes(_) => None,
            RelayBody::Text(text) => Some(text),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_bytes(self) -> Bytes {
        match self {
            RelayBody::Bytes(bytes) => bytes,
            RelayBody::Text(text) => Bytes::from(text),
        }
    }
}

impl From<Bytes> for RelayBody {
    fn from(bytes: Bytes) -> Self {
        RelayBody::Bytes(bytes)
    }
}

impl From<String> for RelayBody {
    fn from(text: String) -> Self {
        RelayBody::Text(text)
    }
}
