use std::time::Duration;

/// Configuration for talking to worker-node agents.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// URL scheme used when dialing an agent ("http", or "https" when the
    /// deployment terminates TLS at the agent).
    pub scheme: String,
    /// Optional per-request timeout for the single-shot operations.
    /// `None` means no client-side timeout; callers impose their own.
    pub request_timeout: Option<Duration>,
    /// Capacity of the live-stream hand-off buffer, in frames. A slow
    /// consumer blocks the decode loop rather than buffering unboundedly.
    pub stream_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            request_timeout: None,
            stream_buffer: 10,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_stream_buffer(mut self, frames: usize) -> Self {
        self.stream_buffer = frames;
        self
    }
}
