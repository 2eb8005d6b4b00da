use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::{Buf, BytesMut};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::codec::Decoder;

/// Metadata for one file inside an allocation directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: i64,
    pub file_mode: String,
    pub mod_time: DateTime<Utc>,
}

/// One record of a live file stream.
///
/// `data` carries the transport (base64) encoding of the file bytes that
/// begin at `offset`. A frame with empty `data` and empty `file_event` is a
/// heartbeat: it only proves the connection is alive and is never delivered
/// to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamFrame {
    /// Byte position within the source file at which this frame's data
    /// begins. Non-decreasing within one stream session for a given file.
    pub offset: i64,
    /// Transport-encoded payload.
    pub data: String,
    /// Name of the source file.
    pub file: String,
    /// File event notification from the remote side, e.g. truncation.
    pub file_event: String,
}

impl StreamFrame {
    pub fn is_heartbeat(&self) -> bool {
        is_heartbeat(&self.data, &self.file_event)
    }

    /// Decode the transport-encoded payload into raw file bytes.
    pub fn payload(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.data)
    }
}

/// Heartbeat predicate: a frame with no payload and no file event carries
/// nothing for the caller.
pub fn is_heartbeat(data: &str, file_event: &str) -> bool {
    data.is_empty() && file_event.is_empty()
}

/// Incremental decoder for the concatenated-JSON frame protocol.
///
/// The agent emits frames back to back with no delimiter and no fixed
/// termination. A complete JSON value in the buffer is one frame; a partial
/// value means more bytes are needed.
#[derive(Debug, Default)]
pub struct FrameDecoder;

impl Decoder for FrameDecoder {
    type Item = StreamFrame;
    type Error = std::io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<StreamFrame>, Self::Error> {
        let (next, consumed) = {
            let mut frames =
                serde_json::Deserializer::from_slice(&src[..]).into_iter::<StreamFrame>();
            (frames.next(), frames.byte_offset())
        };

        match next {
            Some(Ok(frame)) => {
                src.advance(consumed);
                Ok(Some(frame))
            }
            // A truncated value is not an error, just an incomplete read.
            Some(Err(e)) if e.is_eof() => Ok(None),
            Some(Err(e)) => Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_json(offset: i64, data: &str, file: &str) -> String {
        serde_json::to_string(&StreamFrame {
            offset,
            data: data.to_string(),
            file: file.to_string(),
            file_event: String::new(),
        })
        .unwrap()
    }

    #[test]
    fn heartbeat_predicate() {
        assert!(is_heartbeat("", ""));
        assert!(!is_heartbeat("aGk=", ""));
        assert!(!is_heartbeat("", "file truncated"));
        assert!(!is_heartbeat("aGk=", "file truncated"));
    }

    #[test]
    fn heartbeat_frame_has_no_payload() {
        let frame = StreamFrame::default();
        assert!(frame.is_heartbeat());
        assert!(frame.payload().unwrap().is_empty());
    }

    #[test]
    fn payload_decodes_transport_encoding() {
        let frame = StreamFrame {
            offset: 120,
            data: "aGk=".to_string(),
            file: "stdout.log".to_string(),
            file_event: String::new(),
        };
        assert!(!frame.is_heartbeat());
        assert_eq!(frame.payload().unwrap(), b"hi");
    }

    #[test]
    fn decoder_consumes_one_frame_at_a_time() {
        let mut buf = BytesMut::new();
        buf.extend_from_slice(frame_json(0, "YQ==", "out").as_bytes());
        buf.extend_from_slice(frame_json(1, "Yg==", "out").as_bytes());

        let mut dec = FrameDecoder;
        let first = dec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(first.offset, 0);
        let second = dec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(second.offset, 1);
        assert!(dec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn decoder_waits_for_a_complete_frame() {
        let full = frame_json(7, "aGk=", "out");
        let (head, tail) = full.split_at(full.len() / 2);

        let mut buf = BytesMut::from(head.as_bytes());
        let mut dec = FrameDecoder;
        assert!(dec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(tail.as_bytes());
        let frame = dec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(frame.offset, 7);
    }

    #[test]
    fn decoder_rejects_malformed_input() {
        let mut buf = BytesMut::from(&b"not json at all"[..]);
        let mut dec = FrameDecoder;
        assert!(dec.decode(&mut buf).is_err());
    }

    #[test]
    fn file_entry_round_trips() {
        let json = r#"{"name":"alloc/","is_dir":true,"size":0,"file_mode":"drwxrwxr-x","mod_time":"2026-08-23T10:00:00Z"}"#;
        let entry: FileEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.name, "alloc/");
        assert!(entry.is_dir);
        assert_eq!(entry.size, 0);
    }
}
