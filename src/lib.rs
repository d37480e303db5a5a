//! # PostWoman TUI
//!
//! A tiny terminal API inspector: type a URL, optionally a body, send it,
//! and read the response laid out one token per line.
//!
//! ## Features
//! - GET, or POST when a body is present
//! - Redirect following and a fixed request timeout
//! - One request in flight at a time
//! - Tab-indented response formatting and JSON-style highlighting
//!
//! ## Architecture
//! - UI Layer (Ratatui) - synchronous, polls the fetch manager every frame
//! - App Layer - input buffers and the cached formatted response
//! - Network Layer - single-flight fetch manager over a blocking transport

pub mod app;
pub mod config;
pub mod constants;
pub mod format;
pub mod messages;
pub mod models;
pub mod network;
pub mod ui;

// Re-export commonly used types
pub use app::{AppState, ResponseView};
pub use config::{Config, FetchConfig};
pub use format::{reformat, reformat_lossy};
pub use messages::{RenderState, UiEvent};
pub use models::{FetchOutcome, FetchRequest, FetchResponse, HttpMethod};
pub use network::{FetchError, FetchManager, HttpTransport, StartError, Transport};
