// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client library ports.
//!
//! The database client itself lives in an external library. The factory only
//! needs two things from it: a way to construct a client from an endpoint, a
//! key, a connection policy and a consistency level, and, for handles built
//! elsewhere, a way to reach their connection policy.

use crate::domain::{ConnectionPolicy, ConsistencyLevel};

/// Constructs clients on behalf of the factory.
///
/// Errors are returned to the factory's caller unchanged, wrapped only in
/// [`FactoryError::Client`](crate::domain::FactoryError::Client).
///
/// # Examples
///
/// ```rust
/// use cosmos_factory::ports::ClientProvider;
/// use cosmos_factory::domain::{ConnectionPolicy, ConsistencyLevel};
///
/// struct Handle {
///     endpoint: String,
///     user_agent: String,
/// }
///
/// struct Provider;
///
/// impl ClientProvider for Provider {
///     type Client = Handle;
///     type Error = std::io::Error;
///
///     fn create_client(
///         &self,
///         endpoint: &str,
///         _key: &str,
///         policy: ConnectionPolicy,
///         _consistency: ConsistencyLevel,
///     ) -> Result<Handle, std::io::Error> {
///         Ok(Handle {
///             endpoint: endpoint.to_string(),
///             user_agent: policy.user_agent_suffix().to_string(),
///         })
///     }
/// }
/// ```
pub trait ClientProvider {
    /// The client handle type.
    type Client;

    /// The error raised when construction fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the policy used when the caller supplies none.
    fn default_policy(&self) -> ConnectionPolicy {
        ConnectionPolicy::default()
    }

    /// Constructs a new client.
    fn create_client(
        &self,
        endpoint: &str,
        key: &str,
        policy: ConnectionPolicy,
        consistency: ConsistencyLevel,
    ) -> Result<Self::Client, Self::Error>;
}

/// A client handle whose connection policy can be updated in place.
///
/// Implemented by handles the caller constructed and then shares with the
/// factory. The handle controls its own synchronization, so `update` takes
/// `&self`.
pub trait PolicyHandle {
    /// Applies `update` to the handle's connection policy.
    ///
    /// Returns `false` without calling `update` if the handle has no policy.
    fn update_connection_policy<F>(&self, update: F) -> bool
    where
        F: FnOnce(&mut ConnectionPolicy);
}
