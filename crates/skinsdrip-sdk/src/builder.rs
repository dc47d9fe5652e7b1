//! Client builder
//!
//! Fluent configuration for the SDK facade with sensible defaults. The
//! defaults match the merchant platform's policies: 7 s keepalive, 7.5 s
//! reconnect delay, 10 min completion timeout, 5 s drain spacing.

use crate::client::SkinsdripClient;
use crate::tracker::TrackerConfig;
use skinsdrip_rest::RestConfig;
use skinsdrip_types::SkinsdripResult;
use skinsdrip_ws::{ChannelConfig, Endpoint};
use std::time::Duration;

/// Resolved SDK configuration
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// Run against the test-mode platform
    pub testmode: bool,
    /// REST client configuration
    pub rest: RestConfig,
    /// Event channel configuration
    pub channel: ChannelConfig,
    /// Completion tracker configuration
    pub tracker: TrackerConfig,
}

/// Builder for configuring a Skinsdrip client
///
/// # Example
///
/// ```no_run
/// use skinsdrip_sdk::SkinsdripClient;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SkinsdripClient::builder("merchant_1", "merchant_secret")
///     .with_testmode(true)
///     .with_completion_timeout(Duration::from_secs(120))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SkinsdripClientBuilder {
    merchant_id: String,
    merchant_secret: String,
    testmode: bool,
    rest_base_url: Option<String>,
    rest_timeout_secs: Option<u64>,
    stream_endpoint: Option<Endpoint>,
    heartbeat_interval: Option<Duration>,
    reconnect_delay: Option<Duration>,
    connect_timeout: Option<Duration>,
    completion_timeout: Option<Duration>,
    drain_delay: Option<Duration>,
}

impl std::fmt::Debug for SkinsdripClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkinsdripClientBuilder")
            .field("merchant_id", &self.merchant_id)
            .field("merchant_secret", &"[REDACTED]")
            .field("testmode", &self.testmode)
            .finish()
    }
}

impl SkinsdripClientBuilder {
    /// Create a builder with the given merchant credentials
    pub fn new(merchant_id: impl Into<String>, merchant_secret: impl Into<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            merchant_secret: merchant_secret.into(),
            testmode: false,
            rest_base_url: None,
            rest_timeout_secs: None,
            stream_endpoint: None,
            heartbeat_interval: None,
            reconnect_delay: None,
            connect_timeout: None,
            completion_timeout: None,
            drain_delay: None,
        }
    }

    /// Run against the test-mode platform
    pub fn with_testmode(mut self, testmode: bool) -> Self {
        self.testmode = testmode;
        self
    }

    /// Override the REST base URL
    pub fn with_rest_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.rest_base_url = Some(base_url.into());
        self
    }

    /// Set the REST request timeout
    pub fn with_rest_timeout(mut self, secs: u64) -> Self {
        self.rest_timeout_secs = Some(secs);
        self
    }

    /// Override the event stream endpoint
    pub fn with_stream_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.stream_endpoint = Some(endpoint);
        self
    }

    /// Set the keepalive interval
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = Some(interval);
        self
    }

    /// Set the delay between reconnect attempts
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = Some(delay);
        self
    }

    /// Set the stream connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the completion timeout armed for each created trade
    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = Some(timeout);
        self
    }

    /// Set the delay between requests when draining an order backlog
    pub fn with_drain_delay(mut self, delay: Duration) -> Self {
        self.drain_delay = Some(delay);
        self
    }

    /// Resolve the configuration without building a client
    pub fn to_config(&self) -> SdkConfig {
        let mut rest = if self.testmode {
            RestConfig::test_mode()
        } else {
            RestConfig::default()
        };
        if let Some(base_url) = &self.rest_base_url {
            rest = rest.with_base_url(base_url.clone());
        }
        if let Some(secs) = self.rest_timeout_secs {
            rest = rest.with_timeout(secs);
        }

        let mut channel = ChannelConfig::new().with_endpoint(
            self.stream_endpoint
                .clone()
                .unwrap_or_else(|| Endpoint::for_test_mode(self.testmode)),
        );
        if let Some(interval) = self.heartbeat_interval {
            channel = channel.with_heartbeat_interval(interval);
        }
        if let Some(delay) = self.reconnect_delay {
            channel = channel.with_reconnect_delay(delay);
        }
        if let Some(timeout) = self.connect_timeout {
            channel = channel.with_connect_timeout(timeout);
        }

        let mut tracker = TrackerConfig::new();
        if let Some(timeout) = self.completion_timeout {
            tracker = tracker.with_completion_timeout(timeout);
        }
        if let Some(delay) = self.drain_delay {
            tracker = tracker.with_drain_delay(delay);
        }

        SdkConfig {
            testmode: self.testmode,
            rest,
            channel,
            tracker,
        }
    }

    /// Build the client.
    ///
    /// # Errors
    /// `Configuration` when the merchant id or secret is empty.
    pub fn build(self) -> SkinsdripResult<SkinsdripClient> {
        let config = self.to_config();
        SkinsdripClient::from_builder(self.merchant_id, self.merchant_secret, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_platform_policy() {
        let config = SkinsdripClientBuilder::new("m", "s").to_config();
        assert!(!config.testmode);
        assert_eq!(config.channel.heartbeat_interval, Duration::from_secs(7));
        assert_eq!(config.channel.reconnect_delay, Duration::from_millis(7500));
        assert_eq!(config.tracker.completion_timeout, Duration::from_secs(600));
        assert_eq!(config.tracker.drain_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_testmode_selects_test_endpoints() {
        let config = SkinsdripClientBuilder::new("m", "s")
            .with_testmode(true)
            .to_config();
        assert!(config.testmode);
        assert_eq!(config.channel.endpoint, Endpoint::Test);
        assert!(config.rest.base_url.contains("test"));
    }

    #[test]
    fn test_overrides_apply() {
        let config = SkinsdripClientBuilder::new("m", "s")
            .with_heartbeat_interval(Duration::from_secs(3))
            .with_reconnect_delay(Duration::from_secs(1))
            .with_completion_timeout(Duration::from_secs(30))
            .with_drain_delay(Duration::from_secs(2))
            .with_rest_timeout(5)
            .to_config();

        assert_eq!(config.channel.heartbeat_interval, Duration::from_secs(3));
        assert_eq!(config.channel.reconnect_delay, Duration::from_secs(1));
        assert_eq!(config.tracker.completion_timeout, Duration::from_secs(30));
        assert_eq!(config.tracker.drain_delay, Duration::from_secs(2));
        assert_eq!(config.rest.timeout_secs, 5);
    }
}
