// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort telemetry dispatch.
//!
//! [`TelemetryClient`] wraps a [`TelemetrySink`] so that nothing the sink does
//! can reach the caller: errors are logged, panics are caught, and in
//! background mode a full queue drops the event instead of blocking.

use crate::ports::TelemetrySink;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Default capacity of the background queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

const WORKER_THREAD_NAME: &str = "cosmos-telemetry";

/// How events reach the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// The sink is called on the caller's thread.
    Inline,
    /// Events are queued for a dedicated worker thread.
    #[default]
    Background,
}

/// A queued usage event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryEvent {
    /// Event name
    pub name: String,
    /// Event properties
    pub properties: HashMap<String, String>,
}

enum Dispatcher {
    Inline(Arc<dyn TelemetrySink>),
    Background {
        sender: Option<SyncSender<TelemetryEvent>>,
        worker: Option<JoinHandle<()>>,
    },
}

/// Fire-and-forget front end for a [`TelemetrySink`].
///
/// # Examples
///
/// ```rust
/// use cosmos_factory::adapters::TracingTelemetrySink;
/// use cosmos_factory::service::{DispatchMode, TelemetryClient};
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// let client = TelemetryClient::with_mode(Arc::new(TracingTelemetrySink::new()), DispatchMode::Inline);
/// client.track_event("ClientFactory", HashMap::new());
/// ```
pub struct TelemetryClient {
    dispatcher: Dispatcher,
}

impl TelemetryClient {
    /// Creates a client dispatching on a background worker.
    pub fn new(sink: Arc<dyn TelemetrySink>) -> Self {
        Self::with_mode(sink, DispatchMode::default())
    }

    /// Creates a client with the given dispatch mode and the default queue
    /// capacity.
    pub fn with_mode(sink: Arc<dyn TelemetrySink>, mode: DispatchMode) -> Self {
        match mode {
            DispatchMode::Inline => Self::inline(sink),
            DispatchMode::Background => Self::background(sink, DEFAULT_QUEUE_CAPACITY),
        }
    }

    /// Creates a client that calls the sink on the caller's thread.
    pub fn inline(sink: Arc<dyn TelemetrySink>) -> Self {
        Self {
            dispatcher: Dispatcher::Inline(sink),
        }
    }

    /// Creates a client backed by a worker thread and a queue holding at most
    /// `capacity` pending events.
    ///
    /// Falls back to inline dispatch if the worker thread cannot be spawned.
    pub fn background(sink: Arc<dyn TelemetrySink>, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::sync_channel(capacity.max(1));
        let worker_sink = Arc::clone(&sink);

        let spawned = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || worker_loop(worker_sink.as_ref(), &receiver));

        match spawned {
            Ok(worker) => Self {
                dispatcher: Dispatcher::Background {
                    sender: Some(sender),
                    worker: Some(worker),
                },
            },
            Err(e) => {
                tracing::warn!("Failed to spawn telemetry worker, dispatching inline: {}", e);
                Self::inline(sink)
            }
        }
    }

    /// The active dispatch mode.
    pub fn mode(&self) -> DispatchMode {
        match self.dispatcher {
            Dispatcher::Inline(_) => DispatchMode::Inline,
            Dispatcher::Background { .. } => DispatchMode::Background,
        }
    }

    /// Sends one event. Never blocks on the sink and never fails.
    pub fn track_event(&self, name: &str, properties: HashMap<String, String>) {
        let event = TelemetryEvent {
            name: name.to_string(),
            properties,
        };

        match &self.dispatcher {
            Dispatcher::Inline(sink) => deliver(sink.as_ref(), &event),
            Dispatcher::Background { sender, .. } => {
                let Some(sender) = sender else {
                    tracing::debug!("Telemetry worker stopped, dropping event '{}'", event.name);
                    return;
                };
                match sender.try_send(event) {
                    Ok(()) => {}
                    Err(TrySendError::Full(event)) => {
                        tracing::debug!("Telemetry queue full, dropping event '{}'", event.name);
                    }
                    Err(TrySendError::Disconnected(event)) => {
                        tracing::debug!(
                            "Telemetry worker unavailable, dropping event '{}'",
                            event.name
                        );
                    }
                }
            }
        }
    }

    /// Closes the queue and waits for queued events to be delivered.
    ///
    /// Inline clients have nothing to wait for.
    pub fn shutdown(mut self) {
        if let Dispatcher::Background { sender, worker } = &mut self.dispatcher {
            drop(sender.take());
            if let Some(worker) = worker.take() {
                if worker.join().is_err() {
                    tracing::warn!("Telemetry worker terminated abnormally");
                }
            }
        }
    }
}

impl Drop for TelemetryClient {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit on its own.
        if let Dispatcher::Background { sender, .. } = &mut self.dispatcher {
            drop(sender.take());
        }
    }
}

impl std::fmt::Debug for TelemetryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryClient")
            .field("mode", &self.mode())
            .finish()
    }
}

fn worker_loop(sink: &dyn TelemetrySink, receiver: &Receiver<TelemetryEvent>) {
    while let Ok(event) = receiver.recv() {
        deliver(sink, &event);
    }
    tracing::debug!("Telemetry worker exiting");
}

fn deliver(sink: &dyn TelemetrySink, event: &TelemetryEvent) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        sink.send(&event.name, &event.properties)
    }));

    match outcome {
        Ok(Ok(())) => tracing::debug!("Telemetry event '{}' sent", event.name),
        Ok(Err(e)) => tracing::warn!("Failed to send telemetry event '{}': {}", event.name, e),
        Err(_) => tracing::warn!("Telemetry sink panicked while sending '{}'", event.name),
    }
}
