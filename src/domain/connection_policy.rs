// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection policy and consistency level types.
//!
//! These mirror the transport settings the client library accepts at
//! construction. Apart from the user-agent suffix, nothing here is interpreted
//! by this crate; the values are handed through to the client provider.

use crate::domain::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_IDLE_CONNECTION_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_MAX_POOL_SIZE: u32 = 1000;
const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 9;
const DEFAULT_MAX_RETRY_WAIT: Duration = Duration::from_secs(30);

/// Consistency level requested from the service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsistencyLevel {
    /// Linearizable reads.
    Strong,
    /// Reads lag writes by a bounded number of versions or time.
    BoundedStaleness,
    /// Read-your-writes within a session.
    #[default]
    Session,
    /// No ordering guarantee.
    Eventual,
    /// Reads never see out-of-order writes.
    ConsistentPrefix,
}

impl ConsistencyLevel {
    /// Returns the canonical name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsistencyLevel::Strong => "Strong",
            ConsistencyLevel::BoundedStaleness => "BoundedStaleness",
            ConsistencyLevel::Session => "Session",
            ConsistencyLevel::Eventual => "Eventual",
            ConsistencyLevel::ConsistentPrefix => "ConsistentPrefix",
        }
    }
}

impl fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsistencyLevel {
    type Err = ConfigError;

    /// Parses a level name, ignoring case, `-` and `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "strong" => Ok(ConsistencyLevel::Strong),
            "boundedstaleness" => Ok(ConsistencyLevel::BoundedStaleness),
            "session" => Ok(ConsistencyLevel::Session),
            "eventual" => Ok(ConsistencyLevel::Eventual),
            "consistentprefix" => Ok(ConsistencyLevel::ConsistentPrefix),
            _ => Err(ConfigError::ParseError {
                message: format!("Unknown consistency level '{}'", s),
                source: None,
            }),
        }
    }
}

/// Retry behaviour for throttled requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetryOptions {
    max_retry_attempts_on_throttled_requests: u32,
    #[serde(with = "duration_secs")]
    max_retry_wait: Duration,
}

impl RetryOptions {
    /// Maximum number of retries for a throttled request.
    pub fn max_retry_attempts_on_throttled_requests(&self) -> u32 {
        self.max_retry_attempts_on_throttled_requests
    }

    /// Upper bound on the cumulative wait across retries.
    pub fn max_retry_wait(&self) -> Duration {
        self.max_retry_wait
    }

    /// Sets the maximum number of throttled retries.
    pub fn with_max_retry_attempts(mut self, attempts: u32) -> Self {
        self.max_retry_attempts_on_throttled_requests = attempts;
        self
    }

    /// Sets the maximum cumulative retry wait.
    pub fn with_max_retry_wait(mut self, wait: Duration) -> Self {
        self.max_retry_wait = wait;
        self
    }
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retry_attempts_on_throttled_requests: DEFAULT_MAX_RETRY_ATTEMPTS,
            max_retry_wait: DEFAULT_MAX_RETRY_WAIT,
        }
    }
}

/// Transport-level settings passed to the client library.
///
/// `ConnectionPolicy::default()` is the default policy used when a client is
/// built from a bare host and key.
///
/// # Examples
///
/// ```
/// use cosmos_factory::domain::ConnectionPolicy;
///
/// let mut policy = ConnectionPolicy::default().with_user_agent_suffix("my-app");
/// policy.append_user_agent_suffix(";cosmos-factory/0.1.0");
/// assert_eq!(policy.user_agent_suffix(), "my-app;cosmos-factory/0.1.0");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConnectionPolicy {
    #[serde(with = "duration_secs")]
    request_timeout: Duration,
    #[serde(with = "duration_secs")]
    idle_connection_timeout: Duration,
    max_pool_size: u32,
    retry_options: RetryOptions,
    enable_endpoint_discovery: bool,
    preferred_locations: Vec<String>,
    user_agent_suffix: String,
}

impl ConnectionPolicy {
    /// Request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Idle timeout for pooled connections.
    pub fn idle_connection_timeout(&self) -> Duration {
        self.idle_connection_timeout
    }

    /// Maximum connection pool size.
    pub fn max_pool_size(&self) -> u32 {
        self.max_pool_size
    }

    /// Throttling retry options.
    pub fn retry_options(&self) -> &RetryOptions {
        &self.retry_options
    }

    /// Whether the client discovers regional endpoints.
    pub fn enable_endpoint_discovery(&self) -> bool {
        self.enable_endpoint_discovery
    }

    /// Preferred regions in order.
    pub fn preferred_locations(&self) -> &[String] {
        &self.preferred_locations
    }

    /// The user-agent suffix sent with every request.
    pub fn user_agent_suffix(&self) -> &str {
        &self.user_agent_suffix
    }

    /// Replaces the user-agent suffix.
    pub fn set_user_agent_suffix(&mut self, suffix: impl Into<String>) {
        self.user_agent_suffix = suffix.into();
    }

    /// Appends `suffix` after whatever suffix is already present.
    pub fn append_user_agent_suffix(&mut self, suffix: &str) {
        self.user_agent_suffix.push_str(suffix);
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the idle connection timeout.
    pub fn with_idle_connection_timeout(mut self, timeout: Duration) -> Self {
        self.idle_connection_timeout = timeout;
        self
    }

    /// Sets the maximum connection pool size.
    pub fn with_max_pool_size(mut self, size: u32) -> Self {
        self.max_pool_size = size;
        self
    }

    /// Sets the throttling retry options.
    pub fn with_retry_options(mut self, options: RetryOptions) -> Self {
        self.retry_options = options;
        self
    }

    /// Enables or disables endpoint discovery.
    pub fn with_endpoint_discovery(mut self, enabled: bool) -> Self {
        self.enable_endpoint_discovery = enabled;
        self
    }

    /// Sets the preferred regions.
    pub fn with_preferred_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_locations = locations.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the initial user-agent suffix.
    pub fn with_user_agent_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.user_agent_suffix = suffix.into();
        self
    }
}

impl Default for ConnectionPolicy {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            idle_connection_timeout: DEFAULT_IDLE_CONNECTION_TIMEOUT,
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
            retry_options: RetryOptions::default(),
            enable_endpoint_discovery: true,
            preferred_locations: Vec::new(),
            user_agent_suffix: String::new(),
        }
    }
}

/// Serializes durations as whole seconds.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = ConnectionPolicy::default();
        assert_eq!(policy.request_timeout(), Duration::from_secs(60));
        assert_eq!(policy.max_pool_size(), 1000);
        assert!(policy.enable_endpoint_discovery());
        assert_eq!(policy.user_agent_suffix(), "");
        assert_eq!(
            policy.retry_options().max_retry_attempts_on_throttled_requests(),
            9
        );
    }

    #[test]
    fn test_append_preserves_existing_suffix() {
        let mut policy = ConnectionPolicy::default().with_user_agent_suffix("foo");
        policy.append_user_agent_suffix(";bar");
        assert_eq!(policy.user_agent_suffix(), "foo;bar");
    }

    #[test]
    fn test_builder_methods() {
        let policy = ConnectionPolicy::default()
            .with_request_timeout(Duration::from_secs(5))
            .with_max_pool_size(10)
            .with_endpoint_discovery(false)
            .with_preferred_locations(["West US", "East US"])
            .with_retry_options(RetryOptions::default().with_max_retry_attempts(3));

        assert_eq!(policy.request_timeout(), Duration::from_secs(5));
        assert_eq!(policy.max_pool_size(), 10);
        assert!(!policy.enable_endpoint_discovery());
        assert_eq!(policy.preferred_locations(), ["West US", "East US"]);
        assert_eq!(
            policy.retry_options().max_retry_attempts_on_throttled_requests(),
            3
        );
    }

    #[test]
    fn test_consistency_level_parse() {
        assert_eq!(
            "session".parse::<ConsistencyLevel>().unwrap(),
            ConsistencyLevel::Session
        );
        assert_eq!(
            "Bounded_Staleness".parse::<ConsistencyLevel>().unwrap(),
            ConsistencyLevel::BoundedStaleness
        );
        assert_eq!(
            "consistent-prefix".parse::<ConsistencyLevel>().unwrap(),
            ConsistencyLevel::ConsistentPrefix
        );
        assert!("linearizable".parse::<ConsistencyLevel>().is_err());
    }

    #[test]
    fn test_consistency_level_default_is_session() {
        assert_eq!(ConsistencyLevel::default(), ConsistencyLevel::Session);
        assert_eq!(ConsistencyLevel::default().to_string(), "Session");
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_policy_deserializes_kebab_case_and_fills_defaults() {
        let yaml = "\
request-timeout: 5
max-pool-size: 10
preferred-locations:
  - West US
retry-options:
  max-retry-wait: 12
";
        let policy: ConnectionPolicy = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(policy.request_timeout(), Duration::from_secs(5));
        assert_eq!(policy.max_pool_size(), 10);
        assert_eq!(policy.preferred_locations(), ["West US"]);
        assert_eq!(policy.retry_options().max_retry_wait(), Duration::from_secs(12));
        assert_eq!(
            policy.retry_options().max_retry_attempts_on_throttled_requests(),
            DEFAULT_MAX_RETRY_ATTEMPTS
        );
        assert_eq!(policy.idle_connection_timeout(), DEFAULT_IDLE_CONNECTION_TIMEOUT);
        assert!(policy.enable_endpoint_discovery());
        assert_eq!(policy.user_agent_suffix(), "");
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_empty_document_is_default_policy() {
        let policy: ConnectionPolicy = serde_yaml::from_str("{}").unwrap();
        assert_eq!(policy, ConnectionPolicy::default());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_policy_round_trip_uses_whole_seconds() {
        let policy = ConnectionPolicy::default()
            .with_request_timeout(Duration::from_millis(90_750))
            .with_user_agent_suffix("app")
            .with_retry_options(RetryOptions::default().with_max_retry_attempts(3));

        let yaml = serde_yaml::to_string(&policy).unwrap();
        assert!(yaml.contains("request-timeout: 90\n"));
        assert!(yaml.contains("max-retry-attempts-on-throttled-requests: 3\n"));
        assert!(yaml.contains("user-agent-suffix: app\n"));

        let restored: ConnectionPolicy = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(
            restored,
            policy.with_request_timeout(Duration::from_secs(90))
        );
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_consistency_level_serde_uses_variant_names() {
        assert_eq!(
            serde_yaml::to_string(&ConsistencyLevel::BoundedStaleness).unwrap(),
            "BoundedStaleness\n"
        );
        assert_eq!(
            serde_yaml::from_str::<ConsistencyLevel>("Eventual").unwrap(),
            ConsistencyLevel::Eventual
        );
        assert!(serde_yaml::from_str::<ConsistencyLevel>("eventual").is_err());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_negative_duration_rejected() {
        assert!(serde_yaml::from_str::<ConnectionPolicy>("request-timeout: -1").is_err());
    }
}
