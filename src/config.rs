//! Environment-driven runtime configuration shared by the binaries.

use std::env;
use std::time::Duration;

pub const API_KEY_ENV: &str = "CEREBRAS_API_KEY";

/// The API key, read once at startup and treated as immutable for the
/// process lifetime. `None` when unset or empty.
pub fn api_key() -> Option<String> {
    env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty())
}

/// Bound on each upstream round trip (`CLIE_UPSTREAM_TIMEOUT_SECS`,
/// default 300). Keeps a hung upstream from pinning a worker forever.
pub fn upstream_timeout() -> Duration {
    let secs = env::var("CLIE_UPSTREAM_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&s| s > 0)
        .unwrap_or(300);
    Duration::from_secs(secs)
}
