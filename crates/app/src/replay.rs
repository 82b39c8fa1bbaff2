//! Feeds recorded frames into the session queue

use std::time::Duration;

use landmarks::{FrameSource, LandmarkError, LandmarkFrame};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::SessionError;

/// Longest pause honoured between recorded frames
const MAX_REPLAY_GAP: Duration = Duration::from_secs(1);

/// Background replay of a frame source
pub struct ReplayTask {
    handle: JoinHandle<Result<u64, LandmarkError>>,
}

impl ReplayTask {
    /// Start feeding `source` into `frame_tx` on a blocking thread
    ///
    /// With `pace` set, frames are spaced by their recorded timestamps.
    /// The task ends when the source is exhausted or the receiver is gone.
    pub fn spawn<S>(mut source: S, frame_tx: mpsc::Sender<LandmarkFrame>, pace: bool) -> Self
    where
        S: FrameSource + Send + 'static,
    {
        let handle = tokio::task::spawn_blocking(move || {
            let mut sent = 0u64;
            let mut last_timestamp: Option<f64> = None;

            while let Some(frame) = source.next_frame()? {
                if pace {
                    if let Some(last) = last_timestamp {
                        let gap = (frame.timestamp_s - last).clamp(0.0, MAX_REPLAY_GAP.as_secs_f64());
                        std::thread::sleep(Duration::from_secs_f64(gap));
                    }
                    last_timestamp = Some(frame.timestamp_s);
                }

                if frame_tx.blocking_send(frame).is_err() {
                    debug!("Frame receiver closed after {} frames", sent);
                    break;
                }
                sent += 1;
            }

            info!("Replay finished: {} frames sent", sent);
            Ok(sent)
        });

        Self { handle }
    }

    /// Wait for the replay to end; returns the number of frames sent
    pub async fn finish(self) -> Result<u64, SessionError> {
        let sent = self
            .handle
            .await
            .map_err(|e| SessionError::Task(e.to_string()))??;
        Ok(sent)
    }
}
