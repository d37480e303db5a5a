//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default URL shown in the URL field on startup
pub const DEFAULT_HTTP_URL: &str = "https://httpbin.org/get";

/// Transport timeout for a single fetch, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Redirect hops followed before giving up
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Response bodies are cut off after this many bytes
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Log file written next to the working directory by default
pub const DEFAULT_LOG_FILE: &str = "postwoman.log";

/// Config directory under the user's home
pub const CONFIG_DIR: &str = ".postwoman";

/// Config file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.yaml";

/// Application name
pub const APP_NAME: &str = "PostWoman";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
