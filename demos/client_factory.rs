// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds a client from environment properties.
//!
//! This example demonstrates:
//! - Resolving telemetry settings from a property service
//! - Loading and validating a Cosmos DB configuration
//! - Constructing a client through a provider with a decorated user agent
//!
//! To run this example:
//! ```bash
//! export AZURE_COSMOSDB_CONNECTION_STRING="AccountEndpoint=https://acct.documents.azure.com:443/;AccountKey=c2VjcmV0;"
//! export AZURE_COSMOSDB_DATABASE="orders"
//! export TELEMETRY_ALLOW="true"
//!
//! cargo run --example client_factory
//! ```

use cosmos_factory::adapters::{SysfsNetworkInterfaces, TracingTelemetrySink};
use cosmos_factory::prelude::*;

/// Stands in for a real client library and returns the policy it was given.
struct EchoProvider;

impl ClientProvider for EchoProvider {
    type Client = (String, ConnectionPolicy);
    type Error = std::io::Error;

    fn create_client(
        &self,
        endpoint: &str,
        _key: &str,
        policy: ConnectionPolicy,
        _consistency: ConsistencyLevel,
    ) -> std::result::Result<Self::Client, Self::Error> {
        Ok((endpoint.to_string(), policy))
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let properties = PropertyService::builder().with_env_vars().build()?;
    let settings = properties.resolve_settings()?;
    println!("Telemetry allowed: {}", settings.is_telemetry_allowed());

    let context = FactoryContext::builder()
        .with_settings(settings)
        .with_telemetry_sink(TracingTelemetrySink::new())
        .with_hardware_identifier(SysfsNetworkInterfaces::new())
        .build();

    let config = properties.load_cosmos_config()?;
    match ClientFactory::from_config(config, &EchoProvider, &context) {
        Ok(factory) => {
            let (endpoint, policy) = factory.client();
            println!("✓ Client for {}", endpoint);
            println!("  User agent suffix: {}", policy.user_agent_suffix());
        }
        Err(e) => println!("✗ {}", e),
    }

    Ok(())
}
