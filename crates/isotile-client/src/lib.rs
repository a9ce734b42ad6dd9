// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! HTTP tile source: fetches chunks from a tile server on a tokio runtime
//! and hands completions back through a channel drained once per frame.

use std::sync::mpsc::{self, Sender};

use isotile_codec::decode_chunk;
use isotile_port::{Chunk, OuterBounds, RequestSeq, SourceError, SourceResponse, TileSource};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{debug, info};

pub mod channel;

pub use channel::ChannelSource;

/// Failures setting up the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The background runtime could not be built.
    #[error("tokio runtime: {0}")]
    Runtime(#[from] std::io::Error),
    /// The HTTP client could not be built.
    #[error("http client: {0}")]
    Http(#[from] reqwest::Error),
}

/// `{base}/tiles/{min_x,min_y,max_x,max_y}`.
pub fn tile_url(base: &str, bounds: OuterBounds) -> String {
    format!(
        "{}/tiles/{}",
        base.trim_end_matches('/'),
        bounds.to_path_segment()
    )
}

/// Fetch and decode one chunk.
///
/// Anything but `200 OK` is a failure; the body is not inspected then.
pub async fn fetch_chunk<C: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<Chunk<C>, SourceError> {
    let response = client
        .get(url)
        .header(CONTENT_TYPE, "application/json")
        .send()
        .await
        .map_err(|e| SourceError::Transport(e.to_string()))?;
    let status = response.status();
    if status != StatusCode::OK {
        return Err(SourceError::Status(status.as_u16()));
    }
    let body = response
        .bytes()
        .await
        .map_err(|e| SourceError::Transport(e.to_string()))?;
    decode_chunk(&body).map_err(|e| SourceError::Decode(e.to_string()))
}

/// Runtime owned by a source. Dropping it never blocks, so the source may be
/// dropped from inside async code.
struct OwnedRuntime(Option<Runtime>);

impl Drop for OwnedRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}

/// [`TileSource`] backed by HTTP.
///
/// Each request is spawned onto the runtime; its completion is sent over a
/// channel and only observed when the frame loop drains it.
pub struct HttpTileSource<C> {
    client: reqwest::Client,
    base_url: String,
    handle: Handle,
    _runtime: Option<OwnedRuntime>,
    tx: Sender<SourceResponse<C>>,
    inbox: ChannelSource<C>,
}

impl<C> HttpTileSource<C> {
    /// Source with its own single-worker runtime.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("isotile-fetch")
            .enable_all()
            .build()?;
        let handle = runtime.handle().clone();
        Self::build(base_url.into(), handle, Some(OwnedRuntime(Some(runtime))))
    }

    /// Source spawning onto an existing runtime.
    pub fn with_handle(base_url: impl Into<String>, handle: Handle) -> Result<Self, ClientError> {
        Self::build(base_url.into(), handle, None)
    }

    fn build(
        base_url: String,
        handle: Handle,
        runtime: Option<OwnedRuntime>,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().build()?;
        let (tx, rx) = mpsc::channel();
        info!(%base_url, "http tile source ready");
        Ok(Self {
            client,
            base_url,
            handle,
            _runtime: runtime,
            tx,
            inbox: ChannelSource::from_receiver(rx),
        })
    }

    /// Server the tiles are fetched from.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl<C> TileSource<C> for HttpTileSource<C>
where
    C: DeserializeOwned + Send + 'static,
{
    fn request(&mut self, seq: RequestSeq, bounds: OuterBounds) {
        let url = tile_url(&self.base_url, bounds);
        let client = self.client.clone();
        let tx = self.tx.clone();
        debug!(%seq, %url, "fetching tiles");
        self.handle.spawn(async move {
            let result = fetch_chunk(&client, &url).await;
            if let Err(err) = &result {
                debug!(%seq, %url, error = %err, "tile fetch failed");
            }
            // The receiver is gone once the source is dropped.
            let _ = tx.send(SourceResponse { seq, result });
        });
    }

    fn drain_responses(&mut self, max: usize) -> Vec<SourceResponse<C>> {
        self.inbox.drain(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_bounds_segment() {
        let bounds = OuterBounds::new(-6, -6, 21, 21);
        assert_eq!(
            tile_url("http://127.0.0.1:8080/", bounds),
            "http://127.0.0.1:8080/tiles/-6,-6,21,21"
        );
        assert_eq!(
            tile_url("http://h", OuterBounds::new(0, 1, 2, 3)),
            "http://h/tiles/0,1,2,3"
        );
    }
}
