//! Charset name to text encoder lookup.
//!
//! Text bodies and string multipart messages are encoded with the charset named by their
//! content type. Names are resolved through an explicit [`CharsetRegistry`] instead of a
//! global open-ended lookup, so a missing encoder is a typed [`RelayError::CharsetNotRegistered`].

use std::collections::HashMap;

use encoding_rs::{
    BIG5, EUC_JP, EUC_KR, Encoding, GB18030, GBK, ISO_8859_2, ISO_8859_15, KOI8_R, SHIFT_JIS, UTF_8, WINDOWS_1252,
};
use mime::Mime;
use once_cell::sync::Lazy;

use crate::error::RelayError;

static STANDARD: Lazy<CharsetRegistry> = Lazy::new(CharsetRegistry::standard);

/// Maps lowercase charset labels to their encoders.
#[derive(Debug, Clone, Default)]
pub struct CharsetRegistry {
    encodings: HashMap<String, &'static Encoding>,
}

impl CharsetRegistry {
    /// Creates a registry without any charset.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry holding the commonly used charsets.
    ///
    /// `iso-8859-1` and `latin1` resolve to windows-1252, the superset browsers use for them.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry
            .register("utf-8", UTF_8)
            .register("utf8", UTF_8)
            .register("iso-8859-1", WINDOWS_1252)
            .register("latin1", WINDOWS_1252)
            .register("windows-1252", WINDOWS_1252)
            .register("iso-8859-2", ISO_8859_2)
            .register("iso-8859-15", ISO_8859_15)
            .register("shift_jis", SHIFT_JIS)
            .register("euc-jp", EUC_JP)
            .register("euc-kr", EUC_KR)
            .register("gbk", GBK)
            .register("gb18030", GB18030)
            .register("big5", BIG5)
            .register("koi8-r", KOI8_R);
        registry
    }

    /// The process wide standard registry, created on first use.
    pub fn global() -> &'static CharsetRegistry {
        &STANDARD
    }

    pub fn register(&mut self, label: impl AsRef<str>, encoding: &'static Encoding) -> &mut Self {
        self.encodings.insert(normalize(label.as_ref()), encoding);
        self
    }

    pub fn contains(&self, label: &str) -> bool {
        self.encodings.contains_key(&normalize(label))
    }

    /// Looks up the encoder registered for `label`, ignoring case and surrounding whitespace.
    pub fn lookup(&self, label: &str) -> Result<&'static Encoding, RelayError> {
        self.encodings.get(&normalize(label)).copied().ok_or_else(|| RelayError::charset_not_registered(label))
    }

    /// Resolves the `charset` parameter of `content_type`, falling back to `default` when absent.
    pub fn for_content_type(
        &self,
        content_type: &Mime,
        default: &'static Encoding,
    ) -> Result<&'static Encoding, RelayError> {
        match content_type.get_param(mime::CHARSET) {
            Some(charset) => self.lookup(charset.as_str()),
            None => Ok(default),
        }
    }
}

fn normalize(label: &str) -> String {
    label.trim().to_ascii_lowercase()
}
