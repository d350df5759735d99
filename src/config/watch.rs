//! `[watch]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[watch]` section in stitch.toml - dev-mode rebuild settings.
///
/// # Example
/// ```toml
/// [watch]
/// settle_ms = 100   # quiet period that ends a burst of events
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct WatchConfig {
    /// Milliseconds without new events before a burst is rebuilt.
    #[serde(default = "defaults::watch::settle_ms")]
    #[educe(Default = defaults::watch::settle_ms())]
    pub settle_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_watch_config() {
        let config: SiteConfig = toml::from_str("[watch]\nsettle_ms = 250").unwrap();
        assert_eq!(config.watch.settle_ms, 250);
    }

    #[test]
    fn test_watch_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();
        assert_eq!(config.watch.settle_ms, 50);
    }
}
