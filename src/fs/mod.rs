//! Filesystem access to a running allocation's working directory.
//!
//! Every operation resolves the worker node currently hosting the
//! allocation through the node registry, then issues one HTTP request to
//! that node's local agent. Nothing is retried here; retry and backoff
//! policy belongs to callers that understand the call site.

mod frame;
mod stream;

pub use frame::{is_heartbeat, FileEntry, FrameDecoder, StreamFrame};
pub use stream::FrameStream;

use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::alloc::Allocation;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::registry::NodeRegistry;

/// Raw byte stream returned by [`AllocFs::read_at`] and [`AllocFs::cat`].
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Reference point from which a streaming read's initial offset is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Offset is relative to the beginning of the file.
    Start,
    /// Offset is relative to the current end of the file.
    End,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Start => "start",
            Origin::End => "end",
        }
    }
}

/// Client for introspecting an allocation directory on the worker node
/// hosting it.
pub struct AllocFs {
    config: ClientConfig,
    registry: Arc<dyn NodeRegistry>,
    http: reqwest::Client,
}

impl AllocFs {
    pub fn new(config: ClientConfig, registry: Arc<dyn NodeRegistry>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            config,
            registry,
            http,
        })
    }

    /// Resolve the advertised HTTP address of the node hosting `alloc`.
    ///
    /// A missing address is a registration problem, not a transient fault,
    /// and is surfaced before any network call is made.
    async fn node_addr(&self, alloc: &Allocation) -> Result<String> {
        match self.registry.node_http_addr(&alloc.node_id).await? {
            Some(addr) => Ok(addr),
            None => Err(ClientError::NodeNotAdvertised(alloc.id.clone())),
        }
    }

    /// Issue one GET against a per-operation fs endpoint on the hosting
    /// node. Non-success statuses become a remote error carrying the
    /// response body verbatim.
    async fn fs_get(
        &self,
        alloc: &Allocation,
        op: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response> {
        let addr = self.node_addr(alloc).await?;
        let url = format!(
            "{}://{}/v1/client/fs/{}/{}",
            self.config.scheme, addr, op, alloc.id
        );
        tracing::debug!(alloc_id = %alloc.id, op, addr = %addr, "fs request");

        let resp = self.http.get(&url).query(query).send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await?;
            return Err(ClientError::Remote {
                status,
                addr,
                message,
            });
        }
        Ok(resp)
    }

    async fn decode_body<T: DeserializeOwned>(
        alloc: &Allocation,
        path: &str,
        resp: reqwest::Response,
    ) -> Result<T> {
        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
            alloc_id: alloc.id.clone(),
            path: path.to_string(),
            source,
        })
    }

    /// List the files at `path` inside the allocation directory, in the
    /// order the agent returned them.
    pub async fn list(&self, alloc: &Allocation, path: &str) -> Result<Vec<FileEntry>> {
        let resp = self
            .fs_get(alloc, "ls", &[("path", path.to_string())])
            .await?;
        Self::decode_body(alloc, path, resp).await
    }

    /// Stat the file at `path` inside the allocation directory.
    pub async fn stat(&self, alloc: &Allocation, path: &str) -> Result<FileEntry> {
        let resp = self
            .fs_get(alloc, "stat", &[("path", path.to_string())])
            .await?;
        Self::decode_body(alloc, path, resp).await
    }

    /// Read at most `limit` bytes of `path` starting at `offset`. The bytes
    /// flow through undecoded; the caller consumes until exhaustion.
    pub async fn read_at(
        &self,
        alloc: &Allocation,
        path: &str,
        offset: i64,
        limit: i64,
    ) -> Result<ByteStream> {
        let resp = self
            .fs_get(
                alloc,
                "readat",
                &[
                    ("path", path.to_string()),
                    ("offset", offset.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(Box::pin(resp.bytes_stream().map_err(ClientError::from)))
    }

    /// Read the entire contents of `path` from offset 0.
    pub async fn cat(&self, alloc: &Allocation, path: &str) -> Result<ByteStream> {
        let resp = self
            .fs_get(alloc, "cat", &[("path", path.to_string())])
            .await?;
        Ok(Box::pin(resp.bytes_stream().map_err(ClientError::from)))
    }

    /// Tail `path` live, starting `offset` bytes from `origin`.
    ///
    /// Frames arrive in server send order through a bounded hand-off
    /// buffer; heartbeats are filtered out before delivery. The stream ends
    /// cleanly, never with an error, when the remote closes the connection,
    /// a frame fails to decode, or `cancel` fires.
    ///
    /// With [`Origin::End`], the reference point is the file size at the
    /// moment the agent handles the request; appends racing the request are
    /// part of the agent's contract and are not compensated for here.
    pub async fn stream(
        &self,
        alloc: &Allocation,
        path: &str,
        origin: Origin,
        offset: i64,
        cancel: CancellationToken,
    ) -> Result<FrameStream> {
        let resp = self
            .fs_get(
                alloc,
                "stream",
                &[
                    ("path", path.to_string()),
                    ("origin", origin.as_str().to_string()),
                    ("offset", offset.to_string()),
                ],
            )
            .await?;
        Ok(stream::spawn_decode_loop(
            resp,
            self.config.stream_buffer,
            cancel,
            alloc.id.clone(),
            path.to_string(),
        ))
    }
}
