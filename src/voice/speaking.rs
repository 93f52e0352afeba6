/// What the sender should do on a given tick.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Step {
    /// Audio (re)started: announce speaking, then send the frame.
    Start,
    /// Audio continues: send the frame.
    Frame,
    /// Audio stopped recently: send a silent frame instead.
    Pad,
    /// Padding ran out: announce that speaking stopped.
    Stop,
    /// Silent, and the remote side already knows it.
    Idle,
}

/// Speaking-state hysteresis for one connection.
///
/// Each burst of audio is announced once, and each silence is announced once, after a run of
/// silent frames. A provider that skips a few ticks therefore costs a handful of silent frames
/// rather than a pair of speaking updates.
#[derive(Clone, Debug)]
pub(crate) struct SpeakingTracker {
    budget: u8,
    silence_frames: u8,
    sent_start: bool,
    sent_stop: bool,
}

impl SpeakingTracker {
    pub(crate) fn new(silence_frames: u8) -> Self {
        Self {
            budget: silence_frames,
            silence_frames,
            sent_start: false,
            sent_stop: false,
        }
    }

    /// Advances the state by one tick, given whether the provider produced audio.
    ///
    /// The returned step is committed immediately: a speaking update that later fails is not
    /// retried within the same run.
    pub(crate) fn step(&mut self, has_audio: bool) -> Step {
        if has_audio {
            if self.sent_start {
                return Step::Frame;
            }

            self.sent_start = true;
            self.sent_stop = false;
            self.silence_frames = self.budget;

            Step::Start
        } else if self.silence_frames > 0 {
            self.silence_frames -= 1;

            Step::Pad
        } else if !self.sent_stop {
            self.sent_stop = true;
            self.sent_start = false;

            Step::Stop
        } else {
            Step::Idle
        }
    }

    pub(crate) fn is_speaking(&self) -> bool {
        self.sent_start
    }
}
