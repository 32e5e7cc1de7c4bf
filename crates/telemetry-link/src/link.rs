//! Serial link halves and line framing

use crate::wire;
use crate::LinkError;
use risk_eval::RiskLevel;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::Instant;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info};

/// Read chunk size; status lines are tens of bytes
const READ_CHUNK: usize = 256;

/// Open the serial device and split it into reader and writer halves.
///
/// Ownership of the halves is the concurrency contract: the reader goes to
/// the telemetry worker, the writer is shared (behind a lock) between the
/// vision worker's heartbeats and the shutdown fail-safe.
pub fn open_serial(device: &str, baud_rate: u32) -> Result<(LinkReader, LinkWriter), LinkError> {
    info!("opening telemetry link on {} at {} baud", device, baud_rate);

    let port = tokio_serial::new(device, baud_rate)
        .open_native_async()
        .map_err(|e| LinkError::Serial(e.to_string()))?;

    let (reader, writer) = tokio::io::split(port);
    Ok((LinkReader::new(reader), LinkWriter::new(writer)))
}

/// Inbound half of the link.
///
/// Buffers partial input across calls and only ever yields complete,
/// newline-terminated lines.
pub struct LinkReader {
    io: Box<dyn AsyncRead + Send + Unpin>,
    buf: Vec<u8>,
}

impl LinkReader {
    /// Wrap any byte source (serial half, in-memory pipe)
    pub fn new(io: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self {
            io: Box::new(io),
            buf: Vec::with_capacity(READ_CHUNK),
        }
    }

    /// Wait up to `timeout` for one complete line.
    ///
    /// Returns `Ok(None)` on timeout (non-fatal), the line with its
    /// terminator stripped otherwise. EOF means the device went away.
    pub async fn read_line(&mut self, timeout: Duration) -> Result<Option<String>, LinkError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(line) = self.take_buffered_line() {
                return Ok(Some(line));
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }

            let mut chunk = [0u8; READ_CHUNK];
            match tokio::time::timeout(remaining, self.io.read(&mut chunk)).await {
                Err(_) => return Ok(None),
                Ok(Ok(0)) => return Err(LinkError::Disconnected),
                Ok(Ok(n)) => self.buf.extend_from_slice(&chunk[..n]),
                Ok(Err(e)) => return Err(LinkError::Serial(e.to_string())),
            }
        }
    }

    /// Pop the first complete line from the buffer, if any
    fn take_buffered_line(&mut self) -> Option<String> {
        let pos = self.buf.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

/// Outbound half of the link
pub struct LinkWriter {
    io: Box<dyn AsyncWrite + Send + Unpin>,
}

impl LinkWriter {
    /// Wrap any byte sink (serial half, in-memory pipe)
    pub fn new(io: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        Self { io: Box::new(io) }
    }

    /// Write one newline-terminated risk token.
    ///
    /// Write failures surface as `LinkError`; the channel layer never
    /// retries on its own.
    pub async fn send_risk(&mut self, level: RiskLevel) -> Result<(), LinkError> {
        let line = wire::encode_risk(level);
        debug!("sending risk heartbeat: {}", level);

        self.io
            .write_all(line.as_bytes())
            .await
            .map_err(|e| LinkError::Write(e.to_string()))?;
        self.io
            .flush()
            .await
            .map_err(|e| LinkError::Write(e.to_string()))
    }

    /// Flush any buffered outbound bytes
    pub async fn flush(&mut self) -> Result<(), LinkError> {
        self.io
            .flush()
            .await
            .map_err(|e| LinkError::Write(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_line_waits_for_terminator() {
        let (mut tx, rx) = tokio::io::duplex(64);
        let mut reader = LinkReader::new(rx);

        tx.write_all(b"RISK:LOW,DIS").await.unwrap();
        // Partial line: times out, stays buffered
        let got = reader.read_line(Duration::from_millis(20)).await.unwrap();
        assert_eq!(got, None);

        tx.write_all(b"TANCE:42,STATUS:OK\nRISK:HI").await.unwrap();
        let got = reader.read_line(Duration::from_millis(100)).await.unwrap();
        assert_eq!(got.as_deref(), Some("RISK:LOW,DISTANCE:42,STATUS:OK"));

        // Second line still incomplete
        let got = reader.read_line(Duration::from_millis(20)).await.unwrap();
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn test_read_line_strips_crlf() {
        let (mut tx, rx) = tokio::io::duplex(64);
        let mut reader = LinkReader::new(rx);

        tx.write_all(b"STATUS LINE\r\n").await.unwrap();
        let got = reader.read_line(Duration::from_millis(100)).await.unwrap();
        assert_eq!(got.as_deref(), Some("STATUS LINE"));
    }

    #[tokio::test]
    async fn test_two_lines_in_one_chunk() {
        let (mut tx, rx) = tokio::io::duplex(64);
        let mut reader = LinkReader::new(rx);

        tx.write_all(b"first\nsecond\n").await.unwrap();
        let first = reader.read_line(Duration::from_millis(100)).await.unwrap();
        let second = reader.read_line(Duration::from_millis(100)).await.unwrap();
        assert_eq!(first.as_deref(), Some("first"));
        assert_eq!(second.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_disconnect_is_an_error() {
        let (tx, rx) = tokio::io::duplex(64);
        let mut reader = LinkReader::new(rx);
        drop(tx);

        let err = reader
            .read_line(Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, LinkError::Disconnected));
    }

    #[tokio::test]
    async fn test_send_risk_writes_token_line() {
        let (tx, mut rx) = tokio::io::duplex(64);
        let mut writer = LinkWriter::new(tx);

        writer.send_risk(RiskLevel::High).await.unwrap();
        writer.send_risk(RiskLevel::None).await.unwrap();

        let mut buf = [0u8; 16];
        let n = rx.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"HIGH\nNONE\n");
    }

    #[tokio::test]
    async fn test_send_risk_fails_when_peer_gone() {
        let (tx, rx) = tokio::io::duplex(64);
        let mut writer = LinkWriter::new(tx);
        drop(rx);

        let err = writer.send_risk(RiskLevel::Low).await.unwrap_err();
        assert!(matches!(err, LinkError::Write(_)));
    }
}
