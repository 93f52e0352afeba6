#![cfg(feature = "providers")]

use std::collections::VecDeque;
use std::io::{Error as IoError, ErrorKind};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use warbler::async_trait;
use warbler::constants::SILENT_FRAME;
use warbler::model::SpeakingState;
use warbler::voice::{
    frame_queue,
    AudioSender,
    AudioSenderCreateFn,
    Config,
    Conn,
    ConnError,
    DefaultAudioSender,
    OpusFrameProvider,
    ProviderError,
};

const TICK: Duration = Duration::from_millis(20);

#[derive(Clone, Debug, PartialEq, Eq)]
enum Sent {
    Frame(Vec<u8>),
    Speaking(SpeakingState),
}

#[derive(Default)]
struct RecordingConn {
    sent: Mutex<Vec<(Instant, Sent)>>,
    write_faults: Mutex<VecDeque<ConnError>>,
    speaking_faults: Mutex<VecDeque<ConnError>>,
    speaking_delay: Option<Duration>,
}

impl RecordingConn {
    fn events(&self) -> Vec<Sent> {
        self.sent.lock().iter().map(|(_, sent)| sent.clone()).collect()
    }

    fn frame_times(&self) -> Vec<Instant> {
        self.sent
            .lock()
            .iter()
            .filter(|(_, sent)| matches!(sent, Sent::Frame(_)))
            .map(|(at, _)| *at)
            .collect()
    }
}

#[async_trait]
impl Conn for RecordingConn {
    async fn write(&self, frame: &[u8]) -> Result<usize, ConnError> {
        if let Some(fault) = self.write_faults.lock().pop_front() {
            return Err(fault);
        }

        self.sent.lock().push((Instant::now(), Sent::Frame(frame.to_vec())));
        Ok(frame.len())
    }

    async fn set_speaking(&self, state: SpeakingState) -> Result<(), ConnError> {
        if let Some(delay) = self.speaking_delay {
            sleep(delay).await;
        }

        if let Some(fault) = self.speaking_faults.lock().pop_front() {
            return Err(fault);
        }

        self.sent.lock().push((Instant::now(), Sent::Speaking(state)));
        Ok(())
    }
}

/// Hands out a fixed script, then empty frames forever.
struct ScriptedProvider {
    script: Mutex<VecDeque<Result<Vec<u8>, ProviderError>>>,
    polls: Mutex<usize>,
}

impl ScriptedProvider {
    fn frames(frames: &[&[u8]]) -> Self {
        let script = frames.iter().map(|f| Ok(f.to_vec())).collect();

        Self {
            script: Mutex::new(script),
            polls: Mutex::new(0),
        }
    }

    fn endless(frame: &[u8]) -> Self {
        Self::frames(&vec![frame; 1000])
    }

    fn polls(&self) -> usize {
        *self.polls.lock()
    }
}

impl OpusFrameProvider for ScriptedProvider {
    fn provide_opus_frame(&self) -> Result<Vec<u8>, ProviderError> {
        *self.polls.lock() += 1;
        self.script.lock().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn close(&self) {
        self.script.lock().clear();
    }
}

fn spawn_open(sender: &Arc<DefaultAudioSender>) -> JoinHandle<()> {
    let sender = Arc::clone(sender);
    tokio::spawn(async move { sender.open().await })
}

fn sender_for(
    provider: Arc<ScriptedProvider>,
    conn: &Arc<RecordingConn>,
) -> Arc<DefaultAudioSender> {
    let provider = provider as Arc<dyn OpusFrameProvider>;

    Arc::new(DefaultAudioSender::new(Some(provider), Arc::clone(conn) as Arc<dyn Conn>))
}

async fn run_for(sender: &Arc<DefaultAudioSender>, ticks: u32) {
    let handle = spawn_open(sender);
    sleep(TICK * ticks + TICK / 2).await;
    sender.close();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn burst_is_padded_then_stopped() {
    let conn = Arc::new(RecordingConn::default());
    let provider = Arc::new(ScriptedProvider::frames(&[b"f1", b"f2", b"f3"]));
    let sender = sender_for(provider, &conn);

    run_for(&sender, 20).await;

    let mut expected = vec![
        Sent::Speaking(SpeakingState::MICROPHONE),
        Sent::Frame(b"f1".to_vec()),
        Sent::Frame(b"f2".to_vec()),
        Sent::Frame(b"f3".to_vec()),
    ];
    expected.extend(vec![Sent::Frame(SILENT_FRAME.to_vec()); 5]);
    expected.push(Sent::Speaking(SpeakingState::empty()));

    assert_eq!(conn.events(), expected);
    assert!(sender.is_closed());
}

#[tokio::test(start_paused = true)]
async fn frames_keep_a_steady_cadence() {
    let conn = Arc::new(RecordingConn::default());
    let provider = Arc::new(ScriptedProvider::endless(b"audio"));
    let sender = sender_for(provider, &conn);

    run_for(&sender, 10).await;

    let times = conn.frame_times();
    assert_eq!(times.len(), 11);
    for pair in times.windows(2) {
        assert_eq!(pair[1] - pair[0], TICK);
    }
}

#[tokio::test(start_paused = true)]
async fn closed_transport_stops_the_sender() {
    let conn = Arc::new(RecordingConn::default());
    conn.write_faults.lock().push_back(ConnError::Closed);
    let provider = Arc::new(ScriptedProvider::endless(b"audio"));
    let sender = sender_for(Arc::clone(&provider), &conn);

    timeout(Duration::from_secs(1), sender.open()).await.unwrap();

    assert_eq!(conn.events(), [Sent::Speaking(SpeakingState::MICROPHONE)]);
    assert_eq!(provider.polls(), 1);
    assert!(sender.is_closed());
}

#[tokio::test(start_paused = true)]
async fn disconnected_gateway_stops_before_writing() {
    let conn = Arc::new(RecordingConn::default());
    conn.speaking_faults.lock().push_back(ConnError::NotConnected);
    let sender = sender_for(Arc::new(ScriptedProvider::endless(b"audio")), &conn);

    timeout(Duration::from_secs(1), sender.open()).await.unwrap();

    assert!(conn.events().is_empty());
    assert!(sender.is_closed());
}

#[tokio::test(start_paused = true)]
async fn transient_write_error_is_skipped() {
    let conn = Arc::new(RecordingConn::default());
    conn.write_faults.lock().push_back(ConnError::Io(IoError::new(ErrorKind::WouldBlock, "full")));
    let provider = Arc::new(ScriptedProvider::frames(&[b"f1", b"f2", b"f3"]));
    let sender = sender_for(provider, &conn);

    run_for(&sender, 4).await;

    assert_eq!(conn.events()[..3], [
        Sent::Speaking(SpeakingState::MICROPHONE),
        Sent::Frame(b"f2".to_vec()),
        Sent::Frame(b"f3".to_vec()),
    ]);
}

#[tokio::test(start_paused = true)]
async fn provider_error_skips_one_tick() {
    let conn = Arc::new(RecordingConn::default());
    let provider = ScriptedProvider::frames(&[b"f1"]);
    {
        let mut script = provider.script.lock();
        script.push_back(Err(ProviderError::Other("decoder hiccup".into())));
        script.push_back(Ok(b"f2".to_vec()));
    }
    let sender = sender_for(Arc::new(provider), &conn);

    run_for(&sender, 3).await;

    // The failed tick neither sends nor counts towards the silence padding.
    assert_eq!(conn.events(), [
        Sent::Speaking(SpeakingState::MICROPHONE),
        Sent::Frame(b"f1".to_vec()),
        Sent::Frame(b"f2".to_vec()),
        Sent::Frame(SILENT_FRAME.to_vec()),
    ]);
}

#[tokio::test(start_paused = true)]
async fn exhausted_provider_is_treated_as_silence() {
    let conn = Arc::new(RecordingConn::default());
    let (frames, provider) = frame_queue();
    frames.send(b"f1".to_vec());
    drop(frames);
    let provider = Arc::new(provider) as Arc<dyn OpusFrameProvider>;
    let sender =
        Arc::new(DefaultAudioSender::new(Some(provider), Arc::clone(&conn) as Arc<dyn Conn>));

    run_for(&sender, 10).await;

    let events = conn.events();
    assert_eq!(events.len(), 8);
    assert_eq!(events[1], Sent::Frame(b"f1".to_vec()));
    assert_eq!(events[7], Sent::Speaking(SpeakingState::empty()));
}

#[tokio::test(start_paused = true)]
async fn slow_speaking_update_times_out_and_audio_still_flows() {
    let conn = Arc::new(RecordingConn {
        speaking_delay: Some(Duration::from_secs(10)),
        ..RecordingConn::default()
    });
    let sender = sender_for(Arc::new(ScriptedProvider::endless(b"audio")), &conn);

    let handle = spawn_open(&sender);
    sleep(Duration::from_secs(5) + TICK * 2 + TICK / 2).await;
    sender.close();
    handle.await.unwrap();

    let events = conn.events();
    assert!(!events.is_empty());
    assert!(events.iter().all(|sent| *sent == Sent::Frame(b"audio".to_vec())));

    // The first frame waited out the timeout. The clock resyncs, so the next frame follows at
    // once and the cadence resumes from there.
    let times = conn.frame_times();
    assert_eq!(times[0], times[1]);
    assert_eq!(times[2] - times[1], TICK);
}

#[tokio::test(start_paused = true)]
async fn close_interrupts_the_sleep() {
    let conn = Arc::new(RecordingConn::default());
    let sender = sender_for(Arc::new(ScriptedProvider::endless(b"audio")), &conn);

    let handle = spawn_open(&sender);
    sleep(TICK / 2).await;

    let closed_at = Instant::now();
    sender.close();
    sender.close();
    handle.await.unwrap();

    assert!(closed_at.elapsed() < TICK);
    assert_eq!(conn.frame_times().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn close_before_open_sends_nothing() {
    let conn = Arc::new(RecordingConn::default());
    let provider = Arc::new(ScriptedProvider::endless(b"audio"));
    let sender = sender_for(Arc::clone(&provider), &conn);

    sender.close();
    timeout(TICK, sender.open()).await.unwrap();

    assert!(conn.events().is_empty());
    assert_eq!(provider.polls(), 0);
}

#[tokio::test(start_paused = true)]
async fn second_open_returns_immediately() {
    let conn = Arc::new(RecordingConn::default());
    let sender = sender_for(Arc::new(ScriptedProvider::endless(b"audio")), &conn);

    let handle = spawn_open(&sender);
    sleep(TICK / 2).await;

    timeout(TICK, sender.open()).await.unwrap();
    assert!(!sender.is_closed());

    sender.close();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn missing_provider_sends_nothing() {
    let conn = Arc::new(RecordingConn::default());
    let sender = Arc::new(DefaultAudioSender::new(None, Arc::clone(&conn) as Arc<dyn Conn>));

    run_for(&sender, 10).await;

    assert!(conn.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn create_fn_honours_config() {
    let create: AudioSenderCreateFn = DefaultAudioSender::create;
    let conn = Arc::new(RecordingConn::default());
    let provider = Arc::new(ScriptedProvider::frames(&[b"f1"]));
    let config = Config::default()
        .silence_frames(2)
        .speaking_state(SpeakingState::MICROPHONE | SpeakingState::PRIORITY);

    let provider = provider as Arc<dyn OpusFrameProvider>;
    let sender = create(Some(provider), Arc::clone(&conn) as Arc<dyn Conn>, config);
    let handle = tokio::spawn({
        let sender = Arc::clone(&sender);
        async move { sender.open().await }
    });
    sleep(TICK * 6 + TICK / 2).await;
    sender.close();
    handle.await.unwrap();

    assert_eq!(conn.events(), [
        Sent::Speaking(SpeakingState::MICROPHONE | SpeakingState::PRIORITY),
        Sent::Frame(b"f1".to_vec()),
        Sent::Frame(SILENT_FRAME.to_vec()),
        Sent::Frame(SILENT_FRAME.to_vec()),
        Sent::Speaking(SpeakingState::empty()),
    ]);
}
