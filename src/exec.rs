//! Wire shapes for the bidirectional exec session socket.
//!
//! The session protocol itself lives with the exec collaborator; this
//! module only pins down the frame encoding exchanged at that boundary, so
//! the streaming and broadcast primitives here can be composed into a
//! session without re-deriving the framing.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// One frame of the exec socket conversation. Exactly one field is set per
/// frame: `stdout`/`stderr` flow server to client, `stdin` client to
/// server. A socket close signals session termination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecFrame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdin: Option<ExecData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<ExecData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<ExecData>,
}

impl ExecFrame {
    pub fn stdin(bytes: &[u8]) -> Self {
        Self {
            stdin: Some(ExecData::from_bytes(bytes)),
            ..Default::default()
        }
    }

    pub fn stdout(bytes: &[u8]) -> Self {
        Self {
            stdout: Some(ExecData::from_bytes(bytes)),
            ..Default::default()
        }
    }

    pub fn stderr(bytes: &[u8]) -> Self {
        Self {
            stderr: Some(ExecData::from_bytes(bytes)),
            ..Default::default()
        }
    }
}

/// Base64-encoded chunk of one exec stream.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecData {
    pub data: String,
}

impl ExecData {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            data: BASE64.encode(bytes),
        }
    }

    pub fn payload(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.data)
    }
}
