//! Line-delimited JSON transport.
//!
//! Lets the backend run headless, with the UI process on the other end of a
//! pipe: every stdin line is one `{"event": ..., "payload": ...}` request and
//! every reply is one JSON line on stdout.

use anyhow::Result;
use shared::{InboundEnvelope, OutboundMessage};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::events::{InboundMessage, SourceEvent};
use crate::shell::WindowHandle;

/// Sender label for requests read from the pipe
pub const STDIO_SENDER: &str = "stdio";

/// Read requests from `reader` into `inbound` until end of input.
///
/// Blank lines are skipped and malformed lines are logged and skipped.
/// Returns the number of requests forwarded.
pub async fn read_inbound<R>(mut reader: R, inbound: mpsc::Sender<InboundMessage>) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut forwarded = 0;
    let mut line_number = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        line_number += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim_end_matches(['\n', '\r']),
            Err(e) => {
                warn!("Skipping request on line {}: not valid UTF-8 ({})", line_number, e);
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let envelope: InboundEnvelope = match serde_json::from_str(line) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("Skipping malformed request on line {}: {}", line_number, e);
                continue;
            }
        };

        let message = InboundMessage {
            channel: envelope.event,
            source: SourceEvent::new(format!("{}:{}", STDIO_SENDER, line_number)),
            payload: envelope.payload,
        };
        if inbound.send(message).await.is_err() {
            debug!("Event bus stopped, no longer reading requests");
            break;
        }
        forwarded += 1;
    }

    Ok(forwarded)
}

/// `Write` end of a pipe whose bytes are copied to an async writer by a
/// background task. Writes never block; they fail with `BrokenPipe` once the
/// copying task has stopped.
pub struct PipeWriter {
    chunks: mpsc::UnboundedSender<Vec<u8>>,
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.chunks
            .send(buf.to_vec())
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::BrokenPipe, "output writer stopped"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Spawn a task copying everything written to the returned [`PipeWriter`]
/// into `output`. The task ends, handing `output` back, once every writer is
/// dropped or a write to `output` fails.
pub fn pipe<W>(output: W) -> (PipeWriter, JoinHandle<W>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (chunks, mut pending) = mpsc::unbounded_channel::<Vec<u8>>();
    let task = tokio::spawn(async move {
        let mut output = output;
        while let Some(chunk) = pending.recv().await {
            let written = match output.write_all(&chunk).await {
                Ok(()) if chunk.ends_with(b"\n") => output.flush().await,
                other => other,
            };
            if let Err(e) = written {
                warn!("Output closed: {}", e);
                return output;
            }
        }
        if let Err(e) = output.flush().await {
            debug!("Final flush failed: {}", e);
        }
        output
    });
    (PipeWriter { chunks }, task)
}

/// A window whose transport is a byte stream of JSON lines.
///
/// The window counts as destroyed once a write fails (the reader went away)
/// or it has been closed explicitly. `send` holds a lock for the duration of
/// the write, so the writer should not block; [`JsonLineWindow::stdout`]
/// hands stdout to a background task for that reason.
pub struct JsonLineWindow<W: Write + Send> {
    writer: Mutex<W>,
    destroyed: AtomicBool,
}

impl JsonLineWindow<PipeWriter> {
    /// Window writing to stdout, plus the task doing the writes. The task
    /// finishes after the window is dropped and pending lines are flushed.
    pub fn stdout() -> (Self, JoinHandle<tokio::io::Stdout>) {
        let (writer, task) = pipe(tokio::io::stdout());
        (Self::new(writer), task)
    }
}

impl<W: Write + Send> JsonLineWindow<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            destroyed: AtomicBool::new(false),
        }
    }

    pub fn close(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|p| p.into_inner())
    }
}

impl<W: Write + Send> WindowHandle for JsonLineWindow<W> {
    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    fn send(&self, message: OutboundMessage) -> Result<()> {
        let line = serde_json::to_string(&message)?;
        let mut writer = self.writer.lock().unwrap_or_else(|p| p.into_inner());

        let written = writeln!(writer, "{}", line).and_then(|_| writer.flush());
        if let Err(e) = written {
            self.close();
            return Err(e.into());
        }
        Ok(())
    }
}
