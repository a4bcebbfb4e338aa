// vitrina/storefront/src/sagas/request_body.rs

//! Lazily read request bodies. The HTTP payload stays on the socket until a
//! saga step asks for it, so the authenticate step always runs first.

use bytes::{Bytes, BytesMut};
use futures_util::{stream, Stream, StreamExt};
use std::fmt::Display;
use std::io;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::errors::{AppError, Result as AppResult};

/// Chunks kept in flight between the socket reader and the consuming step.
const CHANNEL_DEPTH: usize = 4;

/// Consumer side, carried on the saga context.
pub struct RequestBody {
  start: Option<oneshot::Sender<()>>,
  chunks: mpsc::Receiver<io::Result<Bytes>>,
}

/// Producer side, driven by the HTTP handler next to the saga run.
pub struct BodyFeeder {
  start: oneshot::Receiver<()>,
  chunks: mpsc::Sender<io::Result<Bytes>>,
}

impl RequestBody {
  /// A body fed from the request payload through `BodyFeeder::forward`.
  pub fn channel() -> (RequestBody, BodyFeeder) {
    let (start_tx, start_rx) = oneshot::channel();
    let (chunk_tx, chunk_rx) = mpsc::channel(CHANNEL_DEPTH);
    (
      RequestBody {
        start: Some(start_tx),
        chunks: chunk_rx,
      },
      BodyFeeder {
        start: start_rx,
        chunks: chunk_tx,
      },
    )
  }

  /// A body that is already in memory.
  pub fn from_bytes(bytes: impl Into<Bytes>) -> RequestBody {
    let (chunk_tx, chunk_rx) = mpsc::channel(1);
    // A fresh channel with capacity 1 always accepts the first item.
    let _ = chunk_tx.try_send(Ok(bytes.into()));
    RequestBody {
      start: None,
      chunks: chunk_rx,
    }
  }

  /// Starts the feeder and yields chunks as they arrive from the socket.
  pub fn into_stream(mut self) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static {
    if let Some(start) = self.start.take() {
      let _ = start.send(());
    }
    stream::unfold(self.chunks, |mut chunks| async move {
      chunks.recv().await.map(|item| (item, chunks))
    })
  }

  /// Reads the whole body, failing once it grows past `limit` bytes.
  pub async fn collect(self, limit: usize) -> AppResult<Bytes> {
    let mut body = Box::pin(self.into_stream());
    let mut buffer = BytesMut::new();
    while let Some(chunk) = body.next().await {
      let chunk = chunk.map_err(|e| AppError::BadRequest(format!("Error al leer el cuerpo de la solicitud: {}", e)))?;
      if buffer.len() + chunk.len() > limit {
        return Err(body_too_large(limit as u64));
      }
      buffer.extend_from_slice(&chunk);
    }
    Ok(buffer.freeze())
  }
}

pub fn body_too_large(limit: u64) -> AppError {
  AppError::BadRequest(format!(
    "El cuerpo de la solicitud excede el límite de {} bytes.",
    limit
  ))
}

impl BodyFeeder {
  /// Copies `payload` into the channel once the consumer starts reading.
  /// Returns without touching `payload` if the consumer is dropped first, and
  /// stops as soon as the consumer goes away.
  pub async fn forward<S, E>(self, mut payload: S)
  where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
  {
    if self.start.await.is_err() {
      debug!("Request body was never read.");
      return;
    }
    while let Some(chunk) = payload.next().await {
      let item = chunk.map_err(|e| io::Error::other(e.to_string()));
      let failed = item.is_err();
      if self.chunks.send(item).await.is_err() || failed {
        break;
      }
    }
  }
}
