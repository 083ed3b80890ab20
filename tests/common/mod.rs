// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared doubles for the integration tests.

#![allow(dead_code)]

use cosmos_factory::domain::{ConnectionPolicy, ConsistencyLevel, TelemetryError};
use cosmos_factory::ports::{ClientProvider, HardwareIdentifier, PolicyHandle, TelemetrySink};
use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex};

/// What the provider was asked to build.
#[derive(Debug, Clone)]
pub struct MockClient {
    pub endpoint: String,
    pub key: String,
    pub policy: ConnectionPolicy,
    pub consistency: ConsistencyLevel,
}

/// Provider that records every construction.
#[derive(Default)]
pub struct MockProvider {
    pub default_suffix: Option<String>,
    pub created: Mutex<usize>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider whose default policy already carries `suffix`.
    pub fn with_default_suffix(suffix: &str) -> Self {
        Self {
            default_suffix: Some(suffix.to_string()),
            created: Mutex::new(0),
        }
    }

    pub fn created(&self) -> usize {
        *self.created.lock().unwrap()
    }
}

impl ClientProvider for MockProvider {
    type Client = MockClient;
    type Error = ProviderError;

    fn default_policy(&self) -> ConnectionPolicy {
        match &self.default_suffix {
            Some(suffix) => ConnectionPolicy::default().with_user_agent_suffix(suffix.clone()),
            None => ConnectionPolicy::default(),
        }
    }

    fn create_client(
        &self,
        endpoint: &str,
        key: &str,
        policy: ConnectionPolicy,
        consistency: ConsistencyLevel,
    ) -> Result<MockClient, ProviderError> {
        *self.created.lock().unwrap() += 1;
        Ok(MockClient {
            endpoint: endpoint.to_string(),
            key: key.to_string(),
            policy,
            consistency,
        })
    }
}

/// Error raised by [`FailingProvider`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("endpoint rejected the key: {0}")]
pub struct ProviderError(pub String);

/// Provider whose construction always fails.
pub struct FailingProvider;

impl ClientProvider for FailingProvider {
    type Client = MockClient;
    type Error = ProviderError;

    fn create_client(
        &self,
        _endpoint: &str,
        _key: &str,
        _policy: ConnectionPolicy,
        _consistency: ConsistencyLevel,
    ) -> Result<MockClient, ProviderError> {
        Err(ProviderError("401 Unauthorized".to_string()))
    }
}

/// A client built elsewhere, optionally exposing a connection policy.
pub struct SharedClient {
    pub policy: Mutex<Option<ConnectionPolicy>>,
}

impl SharedClient {
    pub fn with_policy(policy: ConnectionPolicy) -> Self {
        Self {
            policy: Mutex::new(Some(policy)),
        }
    }

    pub fn without_policy() -> Self {
        Self {
            policy: Mutex::new(None),
        }
    }

    pub fn suffix(&self) -> Option<String> {
        self.policy
            .lock()
            .unwrap()
            .as_ref()
            .map(|p| p.user_agent_suffix().to_string())
    }
}

impl PolicyHandle for SharedClient {
    fn update_connection_policy<F>(&self, update: F) -> bool
    where
        F: FnOnce(&mut ConnectionPolicy),
    {
        let mut guard = self.policy.lock().unwrap();
        match guard.as_mut() {
            Some(policy) => {
                update(policy);
                true
            }
            None => false,
        }
    }
}

/// Sink that records events.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<(String, HashMap<String, String>)>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<(String, HashMap<String, String>)> {
        self.events.lock().unwrap().clone()
    }
}

impl TelemetrySink for RecordingSink {
    fn send(
        &self,
        event_name: &str,
        properties: &HashMap<String, String>,
    ) -> Result<(), TelemetryError> {
        self.events
            .lock()
            .unwrap()
            .push((event_name.to_string(), properties.clone()));
        Ok(())
    }
}

/// Sink that panics on every event.
pub struct PanickingSink;

impl TelemetrySink for PanickingSink {
    fn send(&self, _: &str, _: &HashMap<String, String>) -> Result<(), TelemetryError> {
        panic!("telemetry collector crashed");
    }
}

/// Sink that always fails.
pub struct FailingSink;

impl TelemetrySink for FailingSink {
    fn send(&self, _: &str, _: &HashMap<String, String>) -> Result<(), TelemetryError> {
        Err(TelemetryError::sink("collector unreachable"))
    }
}

/// Hardware identifier returning fixed addresses and counting lookups.
pub struct FixedMac {
    pub addresses: Vec<String>,
    pub lookups: Arc<Mutex<usize>>,
}

impl FixedMac {
    pub fn new(address: &str) -> Self {
        Self {
            addresses: vec![address.to_string()],
            lookups: Arc::new(Mutex::new(0)),
        }
    }
}

impl HardwareIdentifier for FixedMac {
    fn mac_addresses(&self) -> Vec<String> {
        *self.lookups.lock().unwrap() += 1;
        self.addresses.clone()
    }
}

/// Sets environment variables and removes them on drop.
pub struct EnvGuard {
    keys: Vec<String>,
}

impl EnvGuard {
    pub fn new() -> Self {
        EnvGuard { keys: Vec::new() }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        env::set_var(key, value);
        self.keys.push(key.to_string());
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in &self.keys {
            env::remove_var(key);
        }
    }
}
