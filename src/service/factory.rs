// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client construction with user-agent decoration and usage telemetry.
//!
//! A [`ClientFactory`] is created in one of three ways:
//!
//! - [`ClientFactory::from_host_key`] from a raw endpoint and key,
//! - [`ClientFactory::from_config`] from a validated [`CosmosConfig`],
//! - [`ClientFactory::from_client`] around a handle built elsewhere.
//!
//! Each path appends the library's user-agent suffix to the connection policy
//! and, when telemetry is allowed and a sink was supplied, emits a single
//! `ClientFactory` usage event. Telemetry can never fail construction.

use crate::domain::user_agent::installation_fingerprint;
use crate::domain::{
    ConfigError, ConfigValidator, ConsistencyLevel, CosmosConfig, FactoryError,
    TelemetrySettings, UserAgentSuffix, ValidationRule,
};
use crate::ports::{ClientProvider, HardwareIdentifier, PolicyHandle, TelemetrySink};
use crate::service::telemetry_client::{DispatchMode, TelemetryClient};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

/// Name of the usage event.
pub const EVENT_NAME: &str = "ClientFactory";

/// Property key identifying the service in usage events.
pub const SERVICE_NAME_KEY: &str = "service.name";

/// Service name reported in usage events.
pub const SERVICE_NAME: &str = "cosmosdb";

/// Process-wide collaborators shared by every factory.
///
/// Holds the telemetry settings, the optional telemetry client and the
/// optional hardware identifier. The user-agent suffix is computed on first
/// use and reused afterwards; the hardware identifier is never consulted when
/// telemetry is disallowed.
///
/// # Examples
///
/// ```rust
/// use cosmos_factory::adapters::TracingTelemetrySink;
/// use cosmos_factory::domain::TelemetrySettings;
/// use cosmos_factory::service::FactoryContext;
///
/// let context = FactoryContext::builder()
///     .with_settings(TelemetrySettings::new(true, "1.0.0"))
///     .with_telemetry_sink(TracingTelemetrySink::new())
///     .build();
///
/// assert!(context.settings().is_telemetry_allowed());
/// ```
pub struct FactoryContext {
    settings: TelemetrySettings,
    telemetry: Option<TelemetryClient>,
    hardware: Option<Box<dyn HardwareIdentifier>>,
    suffix: OnceCell<UserAgentSuffix>,
}

impl FactoryContext {
    /// Creates a context with the given settings, no sink and no hardware
    /// identifier.
    pub fn new(settings: TelemetrySettings) -> Self {
        Self {
            settings,
            telemetry: None,
            hardware: None,
            suffix: OnceCell::new(),
        }
    }

    /// Creates a new builder.
    pub fn builder() -> FactoryContextBuilder {
        FactoryContextBuilder::default()
    }

    /// The telemetry settings.
    pub fn settings(&self) -> &TelemetrySettings {
        &self.settings
    }

    /// The telemetry client, if a sink was supplied.
    pub fn telemetry(&self) -> Option<&TelemetryClient> {
        self.telemetry.as_ref()
    }

    /// Flushes queued usage events and stops the telemetry worker.
    ///
    /// Dropping the context also closes the queue but does not wait for the
    /// worker to drain it.
    pub fn shutdown(self) {
        if let Some(telemetry) = self.telemetry {
            telemetry.shutdown();
        }
    }

    /// The user-agent suffix appended to every connection policy.
    pub fn user_agent_suffix(&self) -> &UserAgentSuffix {
        self.suffix.get_or_init(|| {
            let fingerprint = if self.settings.is_telemetry_allowed() {
                self.hardware
                    .as_deref()
                    .and_then(|hardware| installation_fingerprint(hardware))
            } else {
                None
            };
            UserAgentSuffix::new(&self.settings, fingerprint.as_deref())
        })
    }

    fn track_usage(&self) {
        if !self.settings.is_telemetry_allowed() {
            return;
        }
        let Some(telemetry) = &self.telemetry else {
            return;
        };
        let properties = HashMap::from([(SERVICE_NAME_KEY.to_string(), SERVICE_NAME.to_string())]);
        telemetry.track_event(EVENT_NAME, properties);
    }
}

impl Default for FactoryContext {
    fn default() -> Self {
        Self::new(TelemetrySettings::default())
    }
}

impl std::fmt::Debug for FactoryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryContext")
            .field("settings", &self.settings)
            .field("telemetry", &self.telemetry)
            .field("hardware", &self.hardware.is_some())
            .finish()
    }
}

/// Builder for [`FactoryContext`].
#[derive(Default)]
pub struct FactoryContextBuilder {
    settings: TelemetrySettings,
    telemetry: Option<TelemetryClient>,
    hardware: Option<Box<dyn HardwareIdentifier>>,
}

impl FactoryContextBuilder {
    /// Sets the telemetry settings. Defaults to telemetry disabled.
    pub fn with_settings(mut self, settings: TelemetrySettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sends usage events to `sink` through a background worker.
    pub fn with_telemetry_sink(self, sink: impl TelemetrySink + 'static) -> Self {
        self.with_telemetry_client(TelemetryClient::with_mode(
            Arc::new(sink),
            DispatchMode::Background,
        ))
    }

    /// Uses a preconfigured telemetry client.
    pub fn with_telemetry_client(mut self, client: TelemetryClient) -> Self {
        self.telemetry = Some(client);
        self
    }

    /// Sets the source of the installation fingerprint.
    pub fn with_hardware_identifier(mut self, hardware: impl HardwareIdentifier + 'static) -> Self {
        self.hardware = Some(Box::new(hardware));
        self
    }

    /// Builds the context.
    pub fn build(self) -> FactoryContext {
        FactoryContext {
            settings: self.settings,
            telemetry: self.telemetry,
            hardware: self.hardware,
            suffix: OnceCell::new(),
        }
    }
}

/// A client handle, either owned by the factory or shared with the caller.
#[derive(Debug)]
pub enum ClientHandle<C> {
    /// Constructed by the factory.
    Owned(C),
    /// Supplied by the caller; the factory never closes it.
    Shared(Arc<C>),
}

impl<C> ClientHandle<C> {
    /// Whether the handle was supplied by the caller.
    pub fn is_shared(&self) -> bool {
        matches!(self, ClientHandle::Shared(_))
    }
}

impl<C> Deref for ClientHandle<C> {
    type Target = C;

    fn deref(&self) -> &C {
        match self {
            ClientHandle::Owned(client) => client,
            ClientHandle::Shared(client) => client.as_ref(),
        }
    }
}

/// Holds a decorated client handle and, for the configuration path, the
/// configuration it was built from.
///
/// # Examples
///
/// ```rust
/// use cosmos_factory::prelude::*;
/// use cosmos_factory::service::{ClientFactory, FactoryContext};
///
/// struct Provider;
///
/// impl ClientProvider for Provider {
///     type Client = ConnectionPolicy;
///     type Error = std::io::Error;
///
///     fn create_client(
///         &self,
///         _endpoint: &str,
///         _key: &str,
///         policy: ConnectionPolicy,
///         _consistency: ConsistencyLevel,
///     ) -> std::result::Result<ConnectionPolicy, std::io::Error> {
///         Ok(policy)
///     }
/// }
///
/// let context = FactoryContext::new(TelemetrySettings::new(false, "1.0.0"));
/// let factory = ClientFactory::from_host_key("https://acct", "key", &Provider, &context).unwrap();
/// assert_eq!(factory.client().user_agent_suffix(), ";cosmos-factory/1.0.0");
/// ```
#[derive(Debug)]
pub struct ClientFactory<C> {
    client: ClientHandle<C>,
    config: Option<CosmosConfig>,
}

impl<C> ClientFactory<C> {
    /// Builds a client from a raw endpoint and key.
    ///
    /// The host is checked before the key. The provider's default policy is
    /// decorated and the client uses [`ConsistencyLevel::Session`].
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` with [`ValidationRule::Host`] or
    /// [`ValidationRule::Key`], or the provider's own error unchanged.
    pub fn from_host_key<P>(
        host: &str,
        key: &str,
        provider: &P,
        context: &FactoryContext,
    ) -> Result<Self, FactoryError<P::Error>>
    where
        P: ClientProvider<Client = C>,
    {
        ConfigValidator::validate_host_key(host, key)?;

        let mut policy = provider.default_policy();
        context.user_agent_suffix().decorate(&mut policy);

        let client = provider
            .create_client(host, key, policy, ConsistencyLevel::Session)
            .map_err(FactoryError::Client)?;

        tracing::info!("Created Cosmos DB client for {}", host);
        context.track_usage();

        Ok(Self {
            client: ClientHandle::Owned(client),
            config: None,
        })
    }

    /// Builds a client from a configuration after validating it.
    ///
    /// The configuration's policy is copied and decorated, so the retained
    /// configuration is left untouched. The alternate credential's key is used
    /// when present and non-blank, the primary key otherwise.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` naming the first violated rule, or the
    /// provider's own error unchanged.
    pub fn from_config<P>(
        config: CosmosConfig,
        provider: &P,
        context: &FactoryContext,
    ) -> Result<Self, FactoryError<P::Error>>
    where
        P: ClientProvider<Client = C>,
    {
        ConfigValidator::validate(&config)?;

        let mut policy = config
            .connection_policy()
            .cloned()
            .ok_or(ConfigError::invalid(ValidationRule::ConnectionPolicy))?;
        context.user_agent_suffix().decorate(&mut policy);

        let client = provider
            .create_client(
                config.uri(),
                config.effective_key(),
                policy,
                config.consistency_level(),
            )
            .map_err(FactoryError::Client)?;

        tracing::info!(
            "Created Cosmos DB client for {} (database '{}')",
            config.uri(),
            config.database()
        );
        context.track_usage();

        Ok(Self {
            client: ClientHandle::Owned(client),
            config: Some(config),
        })
    }

    /// Wraps a handle built elsewhere.
    ///
    /// The suffix is appended to the handle's connection policy in place if it
    /// exposes one. No new client is constructed.
    pub fn from_client(client: Arc<C>, context: &FactoryContext) -> Self
    where
        C: PolicyHandle,
    {
        let suffix = context.user_agent_suffix();
        if !client.update_connection_policy(|policy| suffix.decorate(policy)) {
            tracing::debug!("Client exposes no connection policy, user agent left unchanged");
        }

        context.track_usage();

        Self {
            client: ClientHandle::Shared(client),
            config: None,
        }
    }

    /// The client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The client handle.
    pub fn handle(&self) -> &ClientHandle<C> {
        &self.client
    }

    /// Consumes the factory, returning the handle.
    pub fn into_handle(self) -> ClientHandle<C> {
        self.client
    }

    /// The configuration the client was built from, if any.
    pub fn config(&self) -> Option<&CosmosConfig> {
        self.config.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionPolicy, TelemetryError};
    use std::sync::Mutex;

    #[derive(Debug)]
    struct Built {
        key: String,
        policy: ConnectionPolicy,
        consistency: ConsistencyLevel,
    }

    struct Provider;

    impl ClientProvider for Provider {
        type Client = Built;
        type Error = std::io::Error;

        fn create_client(
            &self,
            _endpoint: &str,
            key: &str,
            policy: ConnectionPolicy,
            consistency: ConsistencyLevel,
        ) -> Result<Built, std::io::Error> {
            Ok(Built {
                key: key.to_string(),
                policy,
                consistency,
            })
        }
    }

    #[derive(Default)]
    struct Counting(Mutex<usize>);

    impl TelemetrySink for Counting {
        fn send(&self, _: &str, _: &HashMap<String, String>) -> Result<(), TelemetryError> {
            *self.0.lock().unwrap() += 1;
            Ok(())
        }
    }

    struct Mac(&'static str);

    impl HardwareIdentifier for Mac {
        fn mac_addresses(&self) -> Vec<String> {
            vec![self.0.to_string()]
        }
    }

    fn inline_context(allowed: bool, sink: Arc<Counting>) -> FactoryContext {
        FactoryContext::builder()
            .with_settings(TelemetrySettings::new(allowed, "2.0.0"))
            .with_telemetry_client(TelemetryClient::inline(sink))
            .with_hardware_identifier(Mac("aa:bb:cc:dd:ee:ff"))
            .build()
    }

    #[test]
    fn test_host_key_uses_session_and_decorates_default_policy() {
        let context = FactoryContext::new(TelemetrySettings::new(false, "2.0.0"));
        let factory = ClientFactory::from_host_key("https://acct", "k", &Provider, &context).unwrap();

        assert_eq!(factory.client().consistency, ConsistencyLevel::Session);
        assert_eq!(factory.client().policy.user_agent_suffix(), ";cosmos-factory/2.0.0");
        assert!(!factory.handle().is_shared());
        assert!(factory.config().is_none());
    }

    #[test]
    fn test_host_checked_before_key() {
        let context = FactoryContext::default();
        let err = ClientFactory::from_host_key("", "", &Provider, &context).unwrap_err();
        assert_eq!(err.rule(), Some(ValidationRule::Host));

        let err = ClientFactory::from_host_key("https://acct", " ", &Provider, &context).unwrap_err();
        assert_eq!(err.rule(), Some(ValidationRule::Key));
    }

    #[test]
    fn test_fingerprint_only_when_allowed() {
        let sink = Arc::new(Counting::default());

        let allowed = inline_context(true, sink.clone());
        let suffix = allowed.user_agent_suffix().as_str().to_string();
        let parts: Vec<&str> = suffix.split(';').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].len(), 64);

        let denied = inline_context(false, sink);
        assert_eq!(denied.user_agent_suffix().as_str(), ";cosmos-factory/2.0.0");
    }

    #[test]
    fn test_config_retained_and_not_mutated() {
        let context = FactoryContext::new(TelemetrySettings::new(false, "2.0.0"));
        let config = CosmosConfig::builder()
            .uri("https://acct")
            .key("primary")
            .database("orders")
            .connection_policy(ConnectionPolicy::default().with_user_agent_suffix("app"))
            .consistency_level(ConsistencyLevel::Strong)
            .build();

        let factory = ClientFactory::from_config(config, &Provider, &context).unwrap();

        assert_eq!(factory.client().key, "primary");
        assert_eq!(factory.client().consistency, ConsistencyLevel::Strong);
        assert_eq!(
            factory.client().policy.user_agent_suffix(),
            "app;cosmos-factory/2.0.0"
        );
        let retained = factory.config().unwrap();
        assert_eq!(retained.connection_policy().unwrap().user_agent_suffix(), "app");
    }

    #[test]
    fn test_telemetry_once_per_construction_when_allowed() {
        let sink = Arc::new(Counting::default());
        let context = inline_context(true, sink.clone());

        ClientFactory::from_host_key("https://acct", "k", &Provider, &context).unwrap();
        ClientFactory::from_host_key("https://acct", "k", &Provider, &context).unwrap();

        assert_eq!(*sink.0.lock().unwrap(), 2);
    }

    #[test]
    fn test_no_telemetry_on_validation_failure() {
        let sink = Arc::new(Counting::default());
        let context = inline_context(true, sink.clone());

        assert!(ClientFactory::from_host_key("", "k", &Provider, &context).is_err());
        assert_eq!(*sink.0.lock().unwrap(), 0);
    }

    #[test]
    fn test_no_telemetry_when_disallowed() {
        let sink = Arc::new(Counting::default());
        let context = inline_context(false, sink.clone());

        ClientFactory::from_host_key("https://acct", "k", &Provider, &context).unwrap();
        assert_eq!(*sink.0.lock().unwrap(), 0);
    }
}
