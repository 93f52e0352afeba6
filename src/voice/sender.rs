use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::{sleep, timeout, Instant};
#[cfg(feature = "tracing_instrument")]
use tracing::instrument;
use tracing::{debug, error, trace, warn};

use super::speaking::{SpeakingTracker, Step};
use super::{Config, Conn, ConnError, OpusFrameProvider, ProviderError};
use crate::constants::SILENT_FRAME;
use crate::internal::prelude::*;
use crate::internal::timer::FrameClock;

/// Drives audio from an [`OpusFrameProvider`] onto a [`Conn`].
///
/// A sender serves exactly one voice connection. [`open`] runs for the lifetime of that
/// connection and should be given its own task; [`close`] may be called from anywhere to stop it.
///
/// [`open`]: Self::open
/// [`close`]: Self::close
#[async_trait]
pub trait AudioSender: Send + Sync {
    /// Runs the send loop until [`close`] is called or the transport fails for good.
    ///
    /// [`close`]: Self::close
    async fn open(&self);

    /// Asks the send loop to stop.
    ///
    /// The loop notices at its next tick at the latest; a speaking update already in flight is
    /// allowed to finish. Calling this more than once has no further effect.
    fn close(&self);
}

/// Builds an [`AudioSender`] for a new voice connection.
///
/// Connection layers hold one of these so that the sender implementation can be swapped out.
/// [`DefaultAudioSender::create`] is the stock choice.
pub type AudioSenderCreateFn =
    fn(Option<Arc<dyn OpusFrameProvider>>, Arc<dyn Conn>, Config) -> Arc<dyn AudioSender>;

/// The stock [`AudioSender`].
///
/// Every 20ms the sender pulls one frame from its provider and writes it to the connection. When
/// the provider runs dry, it sends a few silent frames, then tells the voice gateway that the
/// client stopped speaking; when audio comes back, it announces speaking again before the first
/// frame. Errors never escape the loop: a closed transport stops the sender, anything else is
/// logged and the next frame goes out as usual.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use warbler::voice::{frame_queue, AudioSender, Conn, DefaultAudioSender};
///
/// # async fn run(conn: Arc<dyn Conn>) {
/// let (frames, provider) = frame_queue();
/// let sender = Arc::new(DefaultAudioSender::new(Some(Arc::new(provider)), conn));
///
/// tokio::spawn({
///     let sender = Arc::clone(&sender);
///     async move { sender.open().await }
/// });
///
/// frames.send(vec![0xfc, 0xff, 0xfe]);
/// # }
/// ```
pub struct DefaultAudioSender {
    provider: Option<Arc<dyn OpusFrameProvider>>,
    conn: Arc<dyn Conn>,
    config: Config,
    cancel: watch::Sender<bool>,
    opened: AtomicBool,
}

impl DefaultAudioSender {
    /// Creates a sender with the default [`Config`].
    ///
    /// A sender without a provider keeps its cadence but never sends anything.
    pub fn new(provider: Option<Arc<dyn OpusFrameProvider>>, conn: Arc<dyn Conn>) -> Self {
        Self::with_config(provider, conn, Config::default())
    }

    pub fn with_config(
        provider: Option<Arc<dyn OpusFrameProvider>>,
        conn: Arc<dyn Conn>,
        config: Config,
    ) -> Self {
        // The channel exists from construction, so closing before opening is well defined: the
        // later `open` returns straight away.
        let (cancel, _) = watch::channel(false);

        Self {
            provider,
            conn,
            config,
            cancel,
            opened: AtomicBool::new(false),
        }
    }

    /// An [`AudioSenderCreateFn`] producing this sender.
    pub fn create(
        provider: Option<Arc<dyn OpusFrameProvider>>,
        conn: Arc<dyn Conn>,
        config: Config,
    ) -> Arc<dyn AudioSender> {
        Arc::new(Self::with_config(provider, conn, config))
    }

    /// Whether [`close`] has been called, or the sender stopped itself.
    ///
    /// [`close`]: AudioSender::close
    pub fn is_closed(&self) -> bool {
        *self.cancel.borrow()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    #[cfg_attr(feature = "tracing_instrument", instrument(skip(self)))]
    async fn run(&self) {
        let mut cancelled = self.cancel.subscribe();
        let mut clock =
            FrameClock::new(Instant::now(), self.config.timestep, self.config.max_drift_frames);
        let mut tracker = SpeakingTracker::new(self.config.silence_frames);

        while !*cancelled.borrow_and_update() {
            match self.send(&mut tracker).await {
                Ok(()) => {},
                Err(why) if why.is_fatal() => {
                    debug!("Voice transport is gone, stopping audio sender: {}", why);
                    self.close();

                    break;
                },
                Err(why) => error!("Error while reading opus frame: {}", why),
            }

            let sleep_time = clock.sleep_time(Instant::now());
            if !sleep_time.is_zero() {
                tokio::select! {
                    () = sleep(sleep_time) => {},
                    _ = cancelled.changed() => {},
                }
            }

            if clock.advance(Instant::now()) {
                trace!("Audio sender fell behind, resyncing to the current time.");
            }
        }
    }

    /// Runs one tick.
    ///
    /// Transient transport errors are logged here. Only provider errors and fatal transport
    /// errors are returned.
    #[cfg_attr(feature = "tracing_instrument", instrument(skip(self)))]
    async fn send(&self, tracker: &mut SpeakingTracker) -> Result<()> {
        let Some(provider) = &self.provider else {
            return Ok(());
        };

        let frame = match provider.provide_opus_frame() {
            Ok(frame) => frame,
            Err(ProviderError::Exhausted) => Vec::new(),
            Err(why) => return Err(why.into()),
        };

        match tracker.step(!frame.is_empty()) {
            Step::Start => {
                absorb(self.set_speaking(self.config.speaking_state).await)?;
                absorb(self.write(&frame).await)
            },
            Step::Frame => absorb(self.write(&frame).await),
            Step::Pad => absorb(self.write(&SILENT_FRAME).await),
            Step::Stop => absorb(self.set_speaking(SpeakingState::empty()).await),
            Step::Idle => Ok(()),
        }
    }

    async fn write(&self, frame: &[u8]) -> StdResult<(), ConnError> {
        self.conn.write(frame).await.map(|_| ())
    }

    async fn set_speaking(&self, state: SpeakingState) -> StdResult<(), ConnError> {
        trace!("Speaking update: {:?}", state);

        timeout(self.config.speaking_timeout, self.conn.set_speaking(state)).await?
    }
}

/// Passes fatal errors up to stop the loop, and logs everything else.
fn absorb(result: StdResult<(), ConnError>) -> Result<()> {
    match result {
        Err(why) if why.is_fatal() => Err(why.into()),
        Err(why) => {
            error!("Failed to send audio: {}", why);

            Ok(())
        },
        Ok(()) => Ok(()),
    }
}

#[async_trait]
impl AudioSender for DefaultAudioSender {
    async fn open(&self) {
        if self.opened.swap(true, Ordering::AcqRel) {
            warn!("Audio sender was already opened; a sender serves only one connection.");
            return;
        }

        debug!("Opening audio sender.");
        self.run().await;
        self.close();
        debug!("Closing audio sender.");
    }

    fn close(&self) {
        let first = self.cancel.send_if_modified(|closed| !std::mem::replace(closed, true));

        if first {
            debug!("Audio sender close requested.");
        }
    }
}
