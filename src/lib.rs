//! Warbler is a Rust library for sending audio over Discord's voice transport.
//!
//! It covers the real-time half of a voice connection: pulling pre-encoded Opus frames from an
//! [`OpusFrameProvider`], pacing them onto the voice UDP socket at a fixed 20ms cadence, padding
//! the end of each burst with silent frames, and telling the voice gateway when the client starts
//! and stops speaking.
//!
//! Warbler does not open voice connections itself. The socket, its encryption, and the voice
//! websocket are supplied by the caller through the [`Conn`] trait, so the same sender can sit
//! behind any gateway implementation.
//!
//! ### Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use warbler::voice::{AudioSender, Conn, DefaultAudioSender, OpusFrameProvider};
//!
//! # async fn run(provider: Arc<dyn OpusFrameProvider>, conn: Arc<dyn Conn>) {
//! let sender = Arc::new(DefaultAudioSender::new(Some(provider), conn));
//!
//! let task = tokio::spawn({
//!     let sender = Arc::clone(&sender);
//!     async move { sender.open().await }
//! });
//!
//! // ... later, when the voice connection is torn down:
//! sender.close();
//! let _ = task.await;
//! # }
//! ```
//!
//! [`OpusFrameProvider`]: crate::voice::OpusFrameProvider
//! [`Conn`]: crate::voice::Conn
#![doc(html_root_url = "https://docs.rs/warbler/*")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![warn(
    unused,
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::clone_on_ref_ptr,
    clippy::non_ascii_literal,
    clippy::fallible_impl_from,
    clippy::let_underscore_must_use,
    clippy::format_push_string,
    clippy::pedantic
)]
#![allow(
    // Allowed as they are too pedantic
    clippy::cast_possible_truncation,
    clippy::module_name_repetitions,
    clippy::cast_sign_loss,
    clippy::doc_markdown,
    clippy::missing_panics_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod internal;

pub mod constants;
pub mod model;
pub mod voice;

mod error;

pub use crate::error::{Error, Result};

// Re-exports of crates used internally which are already publically exposed.
pub use async_trait::async_trait;
