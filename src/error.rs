use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("http addr of the node where alloc {0} is running is not advertised")]
    NodeNotAdvertised(String),

    #[error("node registry lookup for node {node_id} failed: {reason}")]
    Registry { node_id: String, reason: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("node {addr} returned status {status}: {message}")]
    Remote {
        status: u16,
        addr: String,
        message: String,
    },

    #[error("failed to decode response for alloc {alloc_id} path {path}: {source}")]
    Decode {
        alloc_id: String,
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ClientError>;
