use std::time::Duration;

use tokio::time::Instant;

/// Keeps the send loop phase-locked to a fixed timestep.
///
/// The clock tracks when the last frame was due. A tick that runs long is absorbed by shortening
/// the following sleep, so frames stay on the same grid. Once the loop falls `max_drift`
/// timesteps behind, the clock gives up on the backlog and restarts the grid from the current
/// time instead of bursting frames to catch up.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    last_frame_sent: Instant,
    timestep: Duration,
    max_drift: Duration,
}

impl FrameClock {
    pub fn new(start: Instant, timestep: Duration, max_drift_frames: u32) -> Self {
        Self {
            last_frame_sent: start,
            timestep,
            max_drift: timestep * max_drift_frames,
        }
    }

    /// Time left until the next frame is due, zero if it is already late.
    pub fn sleep_time(&self, now: Instant) -> Duration {
        (self.last_frame_sent + self.timestep).saturating_duration_since(now)
    }

    /// Moves the baseline on by one frame.
    ///
    /// Returns `true` if the clock had drifted too far and was resynced to `now`.
    pub fn advance(&mut self, now: Instant) -> bool {
        if now < self.last_frame_sent + self.max_drift {
            self.last_frame_sent += self.timestep;

            false
        } else {
            self.last_frame_sent = now;

            true
        }
    }

    pub fn last_frame_sent(&self) -> Instant {
        self.last_frame_sent
    }
}
