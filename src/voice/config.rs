use std::time::Duration;

use crate::constants::*;
use crate::model::SpeakingState;

/// Configuration for an [`AudioSender`].
///
/// # Examples
///
/// Announce audio as priority speech, and wait less for speaking updates:
///
/// ```rust
/// use std::time::Duration;
///
/// use warbler::model::SpeakingState;
/// use warbler::voice::Config;
///
/// let config = Config::default()
///     .speaking_state(SpeakingState::MICROPHONE | SpeakingState::PRIORITY)
///     .speaking_timeout(Duration::from_secs(2));
/// ```
///
/// [`AudioSender`]: super::AudioSender
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Config {
    /// Time between two consecutive frames.
    ///
    /// Defaults to [`TIMESTEP_LENGTH`] (20ms). This must match the duration of the frames the
    /// provider hands out.
    pub timestep: Duration,
    /// Number of silent frames sent after audio stops, before the client stops speaking.
    ///
    /// Defaults to [`SILENCE_FRAME_COUNT`].
    pub silence_frames: u8,
    /// How long a single speaking update may take before it is abandoned.
    ///
    /// Defaults to [`SPEAKING_TIMEOUT`].
    pub speaking_timeout: Duration,
    /// How many timesteps the loop may fall behind before it resyncs its cadence.
    ///
    /// Defaults to [`MAX_FRAME_DRIFT`].
    pub max_drift_frames: u32,
    /// The state announced whenever audio starts.
    ///
    /// Defaults to [`SpeakingState::MICROPHONE`].
    pub speaking_state: SpeakingState,
}

impl Config {
    /// Sets this `Config`'s time between frames.
    #[must_use]
    pub fn timestep(mut self, timestep: Duration) -> Self {
        self.timestep = timestep;
        self
    }

    /// Sets the number of silent frames sent at the end of each burst of audio.
    #[must_use]
    pub fn silence_frames(mut self, silence_frames: u8) -> Self {
        self.silence_frames = silence_frames;
        self
    }

    /// Sets the timeout applied to each speaking update.
    #[must_use]
    pub fn speaking_timeout(mut self, speaking_timeout: Duration) -> Self {
        self.speaking_timeout = speaking_timeout;
        self
    }

    /// Sets how far behind the loop may fall before it resyncs.
    #[must_use]
    pub fn max_drift_frames(mut self, max_drift_frames: u32) -> Self {
        self.max_drift_frames = max_drift_frames;
        self
    }

    /// Sets the state announced when audio starts.
    #[must_use]
    pub fn speaking_state(mut self, speaking_state: SpeakingState) -> Self {
        self.speaking_state = speaking_state;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timestep: TIMESTEP_LENGTH,
            silence_frames: SILENCE_FRAME_COUNT,
            speaking_timeout: SPEAKING_TIMEOUT,
            max_drift_frames: MAX_FRAME_DRIFT,
            speaking_state: SpeakingState::MICROPHONE,
        }
    }
}
