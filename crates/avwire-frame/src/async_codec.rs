//! `tokio_util::codec` adapter for framed async streams.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::body::{Body, BodyTable};
use crate::codec::{decode_frame, encode_message_bounded, FrameConfig};
use crate::error::FrameError;
use crate::message::Message;

/// Decodes messages through a body table and encodes any [`Body`] message.
#[derive(Debug, Clone)]
pub struct MessageCodec<D> {
    table: D,
    config: FrameConfig,
}

impl<D> MessageCodec<D> {
    pub fn new(table: D) -> Self {
        Self::with_config(table, FrameConfig::default())
    }

    pub fn with_config(table: D, config: FrameConfig) -> Self {
        Self { table, config }
    }

    pub fn table(&self) -> &D {
        &self.table
    }
}

impl<D: BodyTable> Decoder for MessageCodec<D> {
    type Item = Message<D::Body>;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        decode_frame(src, &self.table, self.config.max_body_size)
    }
}

impl<D, B: Body> Encoder<Message<B>> for MessageCodec<D> {
    type Error = FrameError;

    fn encode(&mut self, item: Message<B>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_message_bounded(&item, self.config.max_body_size, dst)
    }
}
