use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::body::Body;
use crate::codec::{encode_message_bounded, FrameConfig};
use crate::error::{FrameError, Result};
use crate::message::Message;

const WRITE_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete messages to any `Write` stream.
pub struct MessageWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Write> MessageWriter<T> {
    /// Create a new message writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new message writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(WRITE_BUFFER_CAPACITY),
            config,
        }
    }

    /// Encode and write a complete message, then flush (blocking).
    ///
    /// Nothing reaches the stream if the message exceeds the body limit.
    pub fn write_message<B: Body>(&mut self, message: &Message<B>) -> Result<()> {
        self.buf.clear();
        encode_message_bounded(message, self.config.max_body_size, &mut self.buf)?;

        let mut written = 0;
        while written < self.buf.len() {
            let pending = &self.buf[written..];
            match retry_transient(|| self.inner.write(pending))? {
                0 => return Err(FrameError::ConnectionClosed),
                n => written += n,
            }
        }

        tracing::debug!(
            method = message.method(),
            uuid = %message.uuid(),
            status = message.status(),
            frame_len = written,
            "sent message"
        );
        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        retry_transient(|| self.inner.flush())
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Applies to messages written after the call.
    pub fn set_max_body_size(&mut self, max_body_size: usize) {
        self.config.max_body_size = max_body_size;
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

/// Repeat `op` while the stream reports an interrupted or not-ready call.
fn retry_transient<R>(mut op: impl FnMut() -> std::io::Result<R>) -> Result<R> {
    loop {
        match op() {
            Err(err) if matches!(err.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => {}
            other => return other.map_err(FrameError::Io),
        }
    }
}
