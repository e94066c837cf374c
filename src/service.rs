//! Receive loop turning delivered frames into gate calls.
//!
//! The transport strips length prefixes with a [`FrameDecoder`]
//! (`wire::codec`) and hands complete frames to this service over a
//! channel. Each frame is decoded and dispatched to the ownership gate
//! exactly once; malformed frames are logged and dropped, since
//! connection-level recovery belongs to the transport.

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::backup::gate::BackupReceiver;
use crate::wire::codec::decode_request;

/// Dispatch loop for one inbound replication stream.
#[derive(Debug)]
pub struct ReplicationService {
    receiver: BackupReceiver,
    frames: mpsc::Receiver<Bytes>,
}

impl ReplicationService {
    pub fn new(receiver: BackupReceiver, frames: mpsc::Receiver<Bytes>) -> Self {
        Self { receiver, frames }
    }

    /// Drain frames until the sending side closes the channel.
    pub async fn run(mut self) {
        while let Some(frame) = self.frames.recv().await {
            match decode_request(&frame) {
                Ok(request) => {
                    tracing::debug!(request = %request, "backup request received");
                    self.receiver.on_received(request);
                }
                Err(err) => {
                    tracing::warn!("dropping malformed backup frame: {err}");
                }
            }
        }
    }
}
