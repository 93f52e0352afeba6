use parking_lot::Mutex;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::OpusFrameProvider;
use crate::voice::ProviderError;

/// Creates a channel-fed provider, for audio produced live by another task.
///
/// Frames pushed into the [`FrameSender`] are handed out one per tick. A tick with nothing queued
/// yields an empty frame, so a producer that runs a little late causes silence padding rather than
/// an error. Once every sender is dropped and the queue drains, the provider is exhausted.
#[must_use]
pub fn frame_queue() -> (FrameSender, QueueProvider) {
    let (tx, rx) = unbounded_channel();

    (FrameSender { tx }, QueueProvider { rx: Mutex::new(rx) })
}

/// Producer half of a [`frame_queue`].
#[derive(Clone, Debug)]
pub struct FrameSender {
    tx: UnboundedSender<Vec<u8>>,
}

impl FrameSender {
    /// Queues one Opus frame.
    ///
    /// Returns `false` if the provider has been closed or dropped, in which case the frame is
    /// discarded.
    pub fn send(&self, frame: Vec<u8>) -> bool {
        self.tx.send(frame).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half of a [`frame_queue`].
#[derive(Debug)]
pub struct QueueProvider {
    rx: Mutex<UnboundedReceiver<Vec<u8>>>,
}

impl OpusFrameProvider for QueueProvider {
    fn provide_opus_frame(&self) -> Result<Vec<u8>, ProviderError> {
        match self.rx.lock().try_recv() {
            Ok(frame) => Ok(frame),
            Err(TryRecvError::Empty) => Ok(Vec::new()),
            Err(TryRecvError::Disconnected) => Err(ProviderError::Exhausted),
        }
    }

    fn close(&self) {
        self.rx.lock().close();
    }
}
