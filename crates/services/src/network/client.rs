//! Transport collaborator surface.
//!
//! The service layer never performs raw protocol I/O. It consumes an async
//! client factory, a device enumeration call, per-device accessors, and
//! property-change subscriptions, all behind the traits below.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::emitter::Subscription;

/// Property-change notification callback. Payloads are not carried; the
/// subscriber re-reads whatever state it cares about.
pub type ChangeHandler = Box<dyn Fn() + Send + Sync>;

/// Client-level property notifications the aggregator subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientProperty {
    WirelessEnabled,
    Connectivity,
    PrimaryConnection,
    ActivatingConnection,
}

/// Asynchronous client acquisition. This is the single suspend point of the
/// service layer; the result is delivered on the runtime, never awaited
/// synchronously by a constructor.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn create(&self) -> Result<Arc<dyn NetClient>>;
}

pub trait NetClient: Send + Sync {
    fn devices(&self) -> Vec<NetDevice>;
    fn wireless_enabled(&self) -> bool;
    /// Fire-and-forget request to the transport.
    fn set_wireless_enabled(&self, enabled: bool);
    fn connectivity_code(&self) -> u32;
    fn primary_connection(&self) -> Option<Arc<dyn ActiveConnection>>;
    fn activating_connection(&self) -> Option<Arc<dyn ActiveConnection>>;
    fn subscribe(&self, property: ClientProperty, handler: ChangeHandler) -> Subscription;
}

/// One enumerated device, already classified by kind.
#[derive(Clone)]
pub enum NetDevice {
    Wifi(Arc<dyn WifiDevice>),
    Wired(Arc<dyn WiredDevice>),
    Other(Arc<dyn DeviceHandle>),
}

pub trait DeviceHandle: Send + Sync {
    /// Native device state code.
    fn state_code(&self) -> u32;
    /// Native activation state code of the device's active connection.
    fn activation_state_code(&self) -> u32;
    fn subscribe_changed(&self, handler: ChangeHandler) -> Subscription;
}

#[async_trait]
pub trait WifiDevice: DeviceHandle {
    fn active_access_point(&self) -> Option<Arc<dyn AccessPoint>>;
    fn access_points(&self) -> Vec<Arc<dyn AccessPoint>>;
    fn bitrate_kbps(&self) -> u32;
    fn subscribe_active_access_point(&self, handler: ChangeHandler) -> Subscription;
    /// Not cancellable; overlapping requests are permitted.
    async fn request_scan(&self) -> Result<()>;
}

pub trait WiredDevice: DeviceHandle {
    fn speed_mbps(&self) -> u32;
}

pub trait AccessPoint: Send + Sync {
    /// Stable identity of the access point within its device.
    fn path(&self) -> String;
    fn ssid_bytes(&self) -> Option<Vec<u8>>;
    fn strength_percent(&self) -> u8;
    fn frequency_mhz(&self) -> u32;
    fn subscribe_strength(&self, handler: ChangeHandler) -> Subscription;
}

pub trait ActiveConnection: Send + Sync {
    /// Native connection type string, e.g. `802-11-wireless`.
    fn connection_type(&self) -> String;
    fn state_code(&self) -> u32;
}
