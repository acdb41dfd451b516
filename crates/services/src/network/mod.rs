//! Networking state aggregation.
//!
//! [`Network`] owns the transport client, one adapter per known device
//! kind, and a derived [`NetworkSnapshot`]. Construction is two-phase:
//! the façade exists immediately with default state while client
//! acquisition runs on the runtime. Acquisition failure is terminal; the
//! service stays in its default state and logs the error once.

pub mod client;
pub mod memory;
pub mod wifi;
pub mod wired;

use std::sync::{Arc, Mutex, Weak};

use tokio::sync::Notify;
use tracing::{debug, error, warn};

use shared::domain::{Connectivity, NetworkSnapshot, PrimaryKind};
use shared::error::ServiceError;

use crate::emitter::{Changed, Emitter, Subscription};
use crate::registry::registry;

use client::{ClientFactory, ClientProperty, NetClient, NetDevice};

pub use wifi::Wifi;
pub use wired::Wired;

struct NetworkInner {
    client: Option<Arc<dyn NetClient>>,
    wifi: Option<Arc<Wifi>>,
    wired: Option<Arc<Wired>>,
    snapshot: NetworkSnapshot,
    subs: Vec<Subscription>,
}

pub struct Network {
    changed: Emitter<Changed>,
    ready: Notify,
    inner: Mutex<NetworkInner>,
}

impl Network {
    /// Builds the façade and spawns client acquisition. The returned
    /// handle is usable immediately; accessors report default state until
    /// acquisition completes.
    pub fn new(factory: impl ClientFactory + 'static) -> Arc<Self> {
        let network = Arc::new(Self {
            changed: Emitter::new(),
            ready: Notify::new(),
            inner: Mutex::new(NetworkInner {
                client: None,
                wifi: None,
                wired: None,
                snapshot: NetworkSnapshot::default(),
                subs: Vec::new(),
            }),
        });

        let weak = Arc::downgrade(&network);
        tokio::spawn(async move {
            match factory.create().await {
                Ok(client) => {
                    if let Some(network) = Weak::upgrade(&weak) {
                        Self::attach_client(&network, client);
                    }
                }
                Err(error) => {
                    error!(%error, "network client acquisition failed");
                }
            }
        });

        network
    }

    /// Registers the network service with the process registry under the
    /// external name `network`. The factory is not run until first use.
    pub fn install(factory: impl ClientFactory + 'static) -> Result<(), ServiceError> {
        registry().register::<Network>(move || Network::new(factory))?;
        registry().export::<Network>("network")
    }

    /// The process-wide instance, constructed on first call.
    pub fn instance() -> Result<Arc<Network>, ServiceError> {
        registry().ensure::<Network>()
    }

    /// Resolves once client acquisition has completed. Never resolves if
    /// acquisition failed.
    pub async fn ready(&self) {
        loop {
            let notified = self.ready.notified();
            if self.inner.lock().unwrap().client.is_some() {
                return;
            }
            notified.await;
        }
    }

    fn attach_client(this: &Arc<Self>, client: Arc<dyn NetClient>) {
        let mut subs = Vec::new();
        for property in [
            ClientProperty::WirelessEnabled,
            ClientProperty::Connectivity,
            ClientProperty::PrimaryConnection,
            ClientProperty::ActivatingConnection,
        ] {
            let weak = Arc::downgrade(this);
            subs.push(client.subscribe(
                property,
                Box::new(move || {
                    if let Some(network) = Weak::upgrade(&weak) {
                        network.recompute_and_emit();
                    }
                }),
            ));
        }

        // First wifi and first wired device win; extras are ignored.
        let mut wifi = None;
        let mut wired = None;
        for device in client.devices() {
            match device {
                NetDevice::Wifi(device) if wifi.is_none() => {
                    let adapter = Wifi::new(device);
                    let weak = Arc::downgrade(this);
                    subs.push(adapter.connect_changed(move |_| {
                        if let Some(network) = Weak::upgrade(&weak) {
                            network.recompute_and_emit();
                        }
                    }));
                    wifi = Some(adapter);
                }
                NetDevice::Wired(device) if wired.is_none() => {
                    let adapter = Wired::new(device);
                    let weak = Arc::downgrade(this);
                    subs.push(adapter.connect_changed(move |_| {
                        if let Some(network) = Weak::upgrade(&weak) {
                            network.recompute_and_emit();
                        }
                    }));
                    wired = Some(adapter);
                }
                _ => {}
            }
        }

        {
            let mut inner = this.inner.lock().unwrap();
            inner.client = Some(client);
            inner.wifi = wifi;
            inner.wired = wired;
            inner.subs = subs;
        }
        debug!("network client attached");
        this.ready.notify_waiters();
        this.recompute_and_emit();
    }

    /// Rederives the snapshot from current client state and publishes one
    /// `changed`, however many inputs moved since the last recomputation.
    fn recompute_and_emit(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            let Some(client) = inner.client.clone() else {
                return;
            };
            let connection = client
                .primary_connection()
                .or_else(|| client.activating_connection());
            let primary = connection
                .and_then(|connection| PrimaryKind::from_connection_type(&connection.connection_type()));
            inner.snapshot = NetworkSnapshot {
                primary,
                connectivity: Connectivity::from_code(client.connectivity_code()),
            };
        }
        self.changed.emit(&Changed);
    }

    pub fn snapshot(&self) -> NetworkSnapshot {
        self.inner.lock().unwrap().snapshot
    }

    pub fn primary(&self) -> Option<PrimaryKind> {
        self.inner.lock().unwrap().snapshot.primary
    }

    pub fn connectivity(&self) -> Connectivity {
        self.inner.lock().unwrap().snapshot.connectivity
    }

    pub fn wifi(&self) -> Option<Arc<Wifi>> {
        self.inner.lock().unwrap().wifi.clone()
    }

    pub fn wired(&self) -> Option<Arc<Wired>> {
        self.inner.lock().unwrap().wired.clone()
    }

    pub fn wifi_enabled(&self) -> bool {
        self.inner
            .lock()
            .unwrap()
            .client
            .as_ref()
            .map(|client| client.wireless_enabled())
            .unwrap_or(false)
    }

    /// Flips the wireless radio. A no-op before the client is acquired.
    pub fn toggle_wifi(&self) {
        let client = self.inner.lock().unwrap().client.clone();
        match client {
            Some(client) => client.set_wireless_enabled(!client.wireless_enabled()),
            None => warn!("toggle_wifi ignored, client not acquired"),
        }
    }

    pub fn connect_changed(
        &self,
        handler: impl Fn(&Changed) + Send + Sync + 'static,
    ) -> Subscription {
        self.changed.connect(handler)
    }
}

#[cfg(test)]
#[path = "tests/network_tests.rs"]
mod tests;
