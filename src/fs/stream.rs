use futures::{StreamExt, TryStreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::codec::FramedRead;
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;

use super::frame::{FrameDecoder, StreamFrame};

/// Live frame stream handed to the caller.
///
/// Ends cleanly (yields `None`) when the remote closes the connection, a
/// frame fails to decode, or the stream was cancelled.
pub type FrameStream = ReceiverStream<StreamFrame>;

/// Spawn the decode loop for one live stream.
///
/// The loop owns the HTTP response body; every exit path drops the framed
/// reader, which releases the connection exactly once. Dropping the sender
/// is the end-of-stream signal to the caller.
pub(super) fn spawn_decode_loop(
    resp: reqwest::Response,
    buffer: usize,
    cancel: CancellationToken,
    alloc_id: String,
    path: String,
) -> FrameStream {
    let (tx, rx) = mpsc::channel(buffer);

    tokio::spawn(async move {
        let body = StreamReader::new(
            resp.bytes_stream()
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e)),
        );
        let mut frames = FramedRead::new(body, FrameDecoder);

        loop {
            // Cancellation wins over a frame that is already decodable.
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(alloc_id = %alloc_id, path = %path, "stream cancelled");
                    return;
                }
                next = frames.next() => next,
            };

            let frame = match next {
                Some(Ok(frame)) => frame,
                Some(Err(e)) => {
                    // Indistinguishable from an intentional close at this
                    // boundary; end the stream without an error.
                    tracing::debug!(
                        alloc_id = %alloc_id,
                        path = %path,
                        error = %e,
                        "stream decode ended"
                    );
                    return;
                }
                None => {
                    tracing::debug!(alloc_id = %alloc_id, path = %path, "stream closed by remote");
                    return;
                }
            };

            if frame.is_heartbeat() {
                continue;
            }

            // Bounded send: a slow caller blocks the decode loop instead of
            // growing an unbounded backlog.
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(alloc_id = %alloc_id, path = %path, "stream cancelled");
                    return;
                }
                sent = tx.send(frame) => {
                    if sent.is_err() {
                        // Caller walked away.
                        return;
                    }
                }
            }
        }
    });

    ReceiverStream::new(rx)
}
