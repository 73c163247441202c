use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::body::BodyTable;
use crate::codec::{decode_frame, FrameConfig};
use crate::error::{FrameError, Result};
use crate::message::Message;

// Read granularity; the buffer grows past this for large bodies.
const CHUNK: usize = 8 * 1024;

/// Reads complete messages from any `Read` stream.
///
/// Handles partial reads internally; callers always get whole messages.
/// A message whose body fails to decode is reported as an error and
/// skipped, so the next call continues with the following frame.
pub struct MessageReader<T, D> {
    inner: T,
    table: D,
    buf: BytesMut,
    config: FrameConfig,
    closed: bool,
}

impl<T: Read, D: BodyTable> MessageReader<T, D> {
    /// Create a new message reader with default configuration.
    pub fn new(inner: T, table: D) -> Self {
        Self::with_config(inner, table, FrameConfig::default())
    }

    /// Create a new message reader with explicit configuration.
    pub fn with_config(inner: T, table: D, config: FrameConfig) -> Self {
        Self {
            inner,
            table,
            buf: BytesMut::with_capacity(CHUNK),
            config,
            closed: false,
        }
    }

    /// Read the next complete message (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached, and
    /// on every call after a frame header could not be read.
    pub fn read_message(&mut self) -> Result<Message<D::Body>> {
        loop {
            if self.closed {
                return Err(FrameError::ConnectionClosed);
            }

            let before = self.buf.len();
            match decode_frame(&mut self.buf, &self.table, self.config.max_body_size) {
                Ok(Some(message)) => return Ok(message),
                Ok(None) => {}
                Err(err) => {
                    // Nothing consumed: the stream cannot be resynchronized.
                    if self.buf.len() == before {
                        self.closed = true;
                    }
                    return Err(err);
                }
            }

            if self.fill()? == 0 {
                self.closed = true;
                if !self.buf.is_empty() {
                    tracing::debug!(buffered = self.buf.len(), "stream closed mid-frame");
                }
                return Err(FrameError::ConnectionClosed);
            }
        }
    }

    /// Append one read's worth of bytes, retrying interrupted reads.
    fn fill(&mut self) -> Result<usize> {
        let mut chunk = [0u8; CHUNK];
        loop {
            match self.inner.read(&mut chunk) {
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    return Ok(n);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Bytes received but not yet decoded.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Any bytes still buffered are dropped.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Applies from the next frame header on.
    pub fn set_max_body_size(&mut self, max_body_size: usize) {
        self.config.max_body_size = max_body_size;
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl<T: Read, D: BodyTable> Iterator for MessageReader<T, D> {
    type Item = Result<Message<D::Body>>;

    /// Yields messages until the stream closes or becomes unreadable.
    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        match self.read_message() {
            Err(FrameError::ConnectionClosed) if self.buf.is_empty() => None,
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io::Cursor;

    use avwire_prims::ParseError;
    use bytes::BufMut;

    use super::*;
    use crate::body::{DecoderTable, RawBody, RawTable};
    use crate::codec::{encode_message, FIXED_HEADER_SIZE};
    use crate::message::generate_message;

    const ID: &str = "9b2e7c1a-0d4f-4e6b-8a3c-5f7e9d1b2c4a";

    fn wire(frames: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        for (method, body) in frames {
            let body = (!body.is_empty()).then(|| RawBody::from(body.as_bytes().to_vec()));
            let message = generate_message(method, ID, 0, body).unwrap();
            encode_message(&message, &mut buf).unwrap();
        }
        buf.to_vec()
    }

    #[test]
    fn read_single_message() {
        let mut reader = MessageReader::new(Cursor::new(wire(&[("StartScan", "/home")])), RawTable);
        let message = reader.read_message().unwrap();

        assert_eq!(message.method(), "StartScan");
        assert_eq!(message.body().unwrap().0.as_ref(), b"/home");
    }

    #[test]
    fn read_multiple_messages() {
        let bytes = wire(&[("One", "1"), ("Two", ""), ("Three", "333")]);
        let reader = MessageReader::new(Cursor::new(bytes), RawTable);

        let methods: Vec<String> = reader
            .map(|message| message.unwrap().method().to_string())
            .collect();
        assert_eq!(methods, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn read_message_with_large_body() {
        let body = vec![0xAB; 64 * 1024];
        let message = generate_message("Bulk", ID, 0, Some(RawBody::from(body.clone()))).unwrap();
        let mut bytes = BytesMut::new();
        encode_message(&message, &mut bytes).unwrap();

        let mut reader = MessageReader::new(Cursor::new(bytes.to_vec()), RawTable);
        let message = reader.read_message().unwrap();

        assert_eq!(message.body().unwrap().0.as_ref(), body.as_slice());
    }

    #[test]
    fn one_byte_reads_assemble_a_frame() {
        let bytes = wire(&[("Slow", "drip")]);
        let steps = bytes.iter().map(|&byte| Step::Data(vec![byte])).collect();
        let mut reader = MessageReader::new(Scripted::new(steps), RawTable);

        let message = reader.read_message().unwrap();
        assert_eq!(message.method(), "Slow");
        assert_eq!(message.body().unwrap().0.as_ref(), b"drip");
    }

    #[test]
    fn connection_closed_cleanly() {
        let mut reader = MessageReader::new(Cursor::new(Vec::<u8>::new()), RawTable);
        let err = reader.read_message().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn connection_closed_mid_frame() {
        let mut bytes = wire(&[("StartScan", "/partial/path")]);
        bytes.truncate(bytes.len() - 3);

        let mut reader = MessageReader::new(Cursor::new(bytes), RawTable);
        let err = reader.read_message().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
        assert!(!reader.buffered().is_empty());
    }

    #[test]
    fn iterator_reports_mid_frame_close() {
        let mut bytes = wire(&[("Ping", "")]);
        bytes.truncate(5);

        let mut reader = MessageReader::new(Cursor::new(bytes), RawTable);
        assert!(matches!(reader.next(), Some(Err(FrameError::ConnectionClosed))));
    }

    #[test]
    fn oversized_body_in_stream() {
        let mut bytes = BytesMut::new();
        bytes.put_u8(4);
        bytes.put_slice(b"Scan");
        bytes.put_bytes(0, FIXED_HEADER_SIZE - 4);
        bytes.put_u32(1024);

        let cfg = FrameConfig { max_body_size: 16 };
        let mut reader = MessageReader::with_config(Cursor::new(bytes.to_vec()), RawTable, cfg);
        let err = reader.read_message().unwrap_err();
        assert!(matches!(err, FrameError::BodyTooLarge { .. }));
    }

    #[test]
    fn undecodable_body_is_skipped() {
        let mut table: DecoderTable<RawBody> = DecoderTable::new();
        table.register_empty("Ping");

        let bytes = wire(&[("Ping", "junk"), ("Ping", "")]);
        let mut reader = MessageReader::new(Cursor::new(bytes), table);

        let err = reader.read_message().unwrap_err();
        assert!(matches!(err, FrameError::Parse(ParseError::Malformed(_))));
        assert_eq!(reader.read_message().unwrap().method(), "Ping");
    }

    #[test]
    fn roundtrip_over_socket_pair() {
        let (left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut writer = crate::writer::MessageWriter::new(left);
        let mut reader = MessageReader::new(right, RawTable);

        let request = generate_message("IsProtectionEnabled", ID, 0, None::<RawBody>).unwrap();
        writer.write_message(&request).unwrap();
        let received = reader.read_message().unwrap();

        assert_eq!(received, request);
    }

    #[test]
    fn concurrent_reader_writer_threads() {
        let (left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut writer = crate::writer::MessageWriter::new(left);
        let mut reader = MessageReader::new(right, RawTable);

        let reader_thread = std::thread::spawn(move || {
            for expected in 0..64i8 {
                let message = reader.read_message().unwrap();
                assert_eq!(message.status(), expected);
                assert_eq!(
                    message.body().unwrap().0.as_ref(),
                    format!("msg-{expected}").as_bytes()
                );
            }
        });

        for i in 0..64i8 {
            let body = RawBody::from(format!("msg-{i}").into_bytes());
            let message = generate_message("Progress", ID, i, Some(body)).unwrap();
            writer.write_message(&message).unwrap();
        }

        reader_thread.join().unwrap();
    }

    #[test]
    fn max_body_can_change_between_frames() {
        let bytes = wire(&[("StartScan", "/a"), ("StartScan", "/abc")]);
        let mut reader = MessageReader::new(Cursor::new(bytes), RawTable);

        reader.read_message().unwrap();
        reader.set_max_body_size(2);
        assert_eq!(reader.config().max_body_size, 2);
        assert!(matches!(
            reader.read_message(),
            Err(FrameError::BodyTooLarge { size: 4, max: 2 })
        ));
        assert_eq!(reader.get_ref().position() as usize, reader.get_mut().get_ref().len());
    }

    #[test]
    fn would_block_surfaces_as_io_error() {
        let steps = vec![Step::Fail(ErrorKind::WouldBlock), Step::Data(wire(&[("Ok", "")]))];
        let mut reader = MessageReader::new(Scripted::new(steps), RawTable);

        let err = reader.read_message().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WouldBlock));
        // The stream is still usable afterwards.
        assert_eq!(reader.read_message().unwrap().method(), "Ok");
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let steps = vec![
            Step::Fail(ErrorKind::Interrupted),
            Step::Data(wire(&[("Ok", "yes")])),
        ];
        let mut reader = MessageReader::new(Scripted::new(steps), RawTable);
        let message = reader.read_message().unwrap();

        assert_eq!(message.method(), "Ok");
        assert_eq!(message.body().unwrap().0.as_ref(), b"yes");
        assert!(reader.into_inner().steps.is_empty());
    }

    enum Step {
        Data(Vec<u8>),
        Fail(ErrorKind),
    }

    /// Replays a fixed sequence of read results, then reports EOF.
    struct Scripted {
        steps: VecDeque<Step>,
    }

    impl Scripted {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: steps.into(),
            }
        }
    }

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.steps.pop_front() {
                None => Ok(0),
                Some(Step::Fail(kind)) => Err(std::io::Error::from(kind)),
                Some(Step::Data(mut data)) => {
                    let n = data.len().min(buf.len());
                    buf[..n].copy_from_slice(&data[..n]);
                    if n < data.len() {
                        self.steps.push_front(Step::Data(data.split_off(n)));
                    }
                    Ok(n)
                }
            }
        }
    }
}
