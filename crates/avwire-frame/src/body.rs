//! The body capability and the method-to-decoder tables.
//!
//! The envelope never names a concrete payload kind. It writes any
//! [`Body`], and on the way back in it hands the body bytes to a
//! [`BodyTable`] chosen by the application, keyed by the message method.

use std::collections::HashMap;
use std::fmt;

use avwire_prims::ParseError;
use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Anything the envelope can write as a message body.
///
/// An empty encoding is indistinguishable on the wire from "no body".
pub trait Body {
    /// Append the body bytes to `dst`.
    fn encode(&self, dst: &mut BytesMut);

    /// Encode into a fresh buffer.
    fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.freeze()
    }
}

/// A payload kind that can also parse itself back from body bytes.
pub trait Serializable: Body + Sized {
    fn decode(src: &[u8]) -> std::result::Result<Self, ParseError>;
}

/// Resolves body bytes into a body value for a given method.
pub trait BodyTable {
    type Body;

    /// Decode a non-empty body that arrived with `method`.
    fn decode_body(&self, method: &str, bytes: &[u8]) -> Result<Self::Body>;
}

impl<T: BodyTable + ?Sized> BodyTable for &T {
    type Body = T::Body;

    fn decode_body(&self, method: &str, bytes: &[u8]) -> Result<Self::Body> {
        (**self).decode_body(method, bytes)
    }
}

type DecodeFn<B> = Box<dyn Fn(&[u8]) -> std::result::Result<B, ParseError> + Send + Sync>;

/// A method → decoder map supplied by the application layer.
///
/// Methods registered with [`DecoderTable::register_empty`] are known but
/// must not carry a body.
pub struct DecoderTable<B> {
    decoders: HashMap<String, Option<DecodeFn<B>>>,
}

impl<B> DecoderTable<B> {
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register a payload kind for `method`, wrapping decoded values with `into`.
    pub fn register<K>(&mut self, method: impl Into<String>, into: fn(K) -> B) -> &mut Self
    where
        K: Serializable + 'static,
        B: 'static,
    {
        let decode: DecodeFn<B> = Box::new(move |bytes| K::decode(bytes).map(into));
        self.decoders.insert(method.into(), Some(decode));
        self
    }

    /// Register an arbitrary decode function for `method`.
    pub fn register_fn<F>(&mut self, method: impl Into<String>, decode: F) -> &mut Self
    where
        F: Fn(&[u8]) -> std::result::Result<B, ParseError> + Send + Sync + 'static,
    {
        self.decoders.insert(method.into(), Some(Box::new(decode)));
        self
    }

    /// Register a method that never carries a body.
    pub fn register_empty(&mut self, method: impl Into<String>) -> &mut Self {
        self.decoders.insert(method.into(), None);
        self
    }

    /// Returns true if `method` has an entry, with or without a decoder.
    pub fn contains(&self, method: &str) -> bool {
        self.decoders.contains_key(method)
    }

    /// Registered methods in sorted order.
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl<B> Default for DecoderTable<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> fmt::Debug for DecoderTable<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderTable")
            .field("methods", &self.methods())
            .finish()
    }
}

impl<B> BodyTable for DecoderTable<B> {
    type Body = B;

    fn decode_body(&self, method: &str, bytes: &[u8]) -> Result<B> {
        match self.decoders.get(method) {
            Some(Some(decode)) => decode(bytes).map_err(FrameError::from),
            Some(None) => Err(FrameError::Parse(ParseError::Malformed(format!(
                "method {method:?} carries no body but {} bytes were sent",
                bytes.len()
            )))),
            None => Err(FrameError::UnknownMethod(method.to_string())),
        }
    }
}

/// Undecoded body bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawBody(pub Bytes);

impl Body for RawBody {
    fn encode(&self, dst: &mut BytesMut) {
        dst.put_slice(&self.0);
    }

    fn to_bytes(&self) -> Bytes {
        self.0.clone()
    }
}

impl Serializable for RawBody {
    fn decode(src: &[u8]) -> std::result::Result<Self, ParseError> {
        Ok(Self(Bytes::copy_from_slice(src)))
    }
}

impl From<Vec<u8>> for RawBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for RawBody {
    fn from(bytes: &'static [u8]) -> Self {
        Self(Bytes::from_static(bytes))
    }
}

/// A table that accepts every method and keeps the body bytes as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTable;

impl BodyTable for RawTable {
    type Body = RawBody;

    fn decode_body(&self, _method: &str, bytes: &[u8]) -> Result<RawBody> {
        Ok(RawBody(Bytes::copy_from_slice(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use avwire_prims::ByteReader;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Counter(u32);

    impl Body for Counter {
        fn encode(&self, dst: &mut BytesMut) {
            dst.put_u32(self.0);
        }
    }

    impl Serializable for Counter {
        fn decode(src: &[u8]) -> std::result::Result<Self, ParseError> {
            let mut reader = ByteReader::new(src);
            let value = reader.read_u32()?;
            reader.finish()?;
            Ok(Self(value))
        }
    }

    #[derive(Debug, PartialEq)]
    enum Payload {
        Counter(Counter),
        Text(String),
    }

    fn table() -> DecoderTable<Payload> {
        let mut table = DecoderTable::new();
        table
            .register("Count", Payload::Counter)
            .register_fn("Echo", |bytes| {
                std::str::from_utf8(bytes)
                    .map(|text| Payload::Text(text.to_string()))
                    .map_err(|err| ParseError::Malformed(err.to_string()))
            })
            .register_empty("Ping");
        table
    }

    #[test]
    fn dispatches_by_method() {
        let table = table();
        assert_eq!(
            table.decode_body("Count", &[0, 0, 0, 7]).unwrap(),
            Payload::Counter(Counter(7))
        );
        assert_eq!(
            table.decode_body("Echo", b"hi").unwrap(),
            Payload::Text("hi".into())
        );
    }

    #[test]
    fn unknown_method_is_reported() {
        let err = table().decode_body("Nope", b"x").unwrap_err();
        assert!(matches!(err, FrameError::UnknownMethod(m) if m == "Nope"));
    }

    #[test]
    fn bodyless_method_rejects_bytes() {
        let err = table().decode_body("Ping", b"x").unwrap_err();
        assert!(matches!(err, FrameError::Parse(ParseError::Malformed(_))));
    }

    #[test]
    fn decoder_errors_propagate() {
        let err = table().decode_body("Count", &[0, 0]).unwrap_err();
        assert!(matches!(
            err,
            FrameError::Parse(ParseError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn methods_are_sorted() {
        let table = table();
        assert_eq!(table.methods(), vec!["Count", "Echo", "Ping"]);
        assert!(table.contains("Ping"));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn raw_table_keeps_bytes() {
        let body = RawTable.decode_body("Anything", b"\x00\x01").unwrap();
        assert_eq!(body.0.as_ref(), b"\x00\x01");
        assert_eq!(body.to_bytes().as_ref(), b"\x00\x01");
    }

    #[test]
    fn table_by_reference() {
        let table = table();
        let by_ref = &table;
        assert!(by_ref.decode_body("Count", &[0, 0, 0, 1]).is_ok());
    }
}
