//! Streams a DCA file to a UDP address at Discord's voice cadence.
//!
//! Usage: `DCA_FILE=song.dca TARGET_ADDR=127.0.0.1:5000 cargo run -p udp_sender`
//!
//! Frames are written without RTP framing or encryption, so any UDP listener can watch the
//! cadence and the silence padding. Speaking updates are logged instead of being sent to a
//! voice gateway.
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tracing::{error, info};
use warbler::async_trait;
use warbler::model::payload::build_speaking;
use warbler::model::SpeakingState;
use warbler::voice::{AudioSender, Conn, ConnError, DcaProvider, DefaultAudioSender};

struct UdpConn {
    socket: UdpSocket,
    ssrc: u32,
}

#[async_trait]
impl Conn for UdpConn {
    async fn write(&self, frame: &[u8]) -> Result<usize, ConnError> {
        Ok(self.socket.send(frame).await?)
    }

    async fn set_speaking(&self, state: SpeakingState) -> Result<(), ConnError> {
        let message = serde_json::to_string(&build_speaking(state, self.ssrc))?;
        info!("Speaking update: {}", message);

        Ok(())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let path = env::var("DCA_FILE").expect("Expected a DCA file path in the environment");
    let target = env::var("TARGET_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());

    let file = File::open(&path).expect("Err opening DCA file");
    let provider = DcaProvider::new(BufReader::new(file)).expect("Err reading DCA header");
    if let Some(metadata) = provider.metadata() {
        info!("Streaming {:?}", metadata.info);
    }

    let socket = UdpSocket::bind("0.0.0.0:0").await.expect("Err binding socket");
    socket.connect(&target).await.expect("Err connecting socket");
    let conn = Arc::new(UdpConn {
        socket,
        ssrc: 1,
    });

    let sender = Arc::new(DefaultAudioSender::new(Some(Arc::new(provider)), conn));
    let handle = tokio::spawn({
        let sender = Arc::clone(&sender);
        async move { sender.open().await }
    });

    if let Err(why) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {:?}", why);
    }

    sender.close();
    if let Err(why) = handle.await {
        error!("Audio sender task failed: {:?}", why);
    }
}
