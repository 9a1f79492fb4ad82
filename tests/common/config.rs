//! Test configuration helpers

use bl_replays::{Config, RetryConfig};
use std::path::Path;
use std::time::Duration;
use wiremock::MockServer;

/// Config pointed at a mock server, writing below `root`, with millisecond retries
pub fn test_config(server: &MockServer, root: &Path) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.api.request_timeout = Duration::from_secs(5);
    config.output.root = root.to_path_buf();
    config.retry = RetryConfig {
        max_attempts: 2,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(10),
        backoff_multiplier: 2.0,
        jitter: false,
    };
    config
}
