//! In-memory transport used by tests and the demo app. Mutators mirror the
//! property-change semantics of a real client: each setter updates state and
//! fires the matching change notification synchronously.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc, Mutex,
};

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::emitter::{Emitter, Subscription};
use crate::network::client::{
    AccessPoint, ActiveConnection, ChangeHandler, ClientFactory, ClientProperty, DeviceHandle,
    NetClient, NetDevice, WifiDevice, WiredDevice,
};

pub struct MemoryActiveConnection {
    connection_type: String,
    state_code: u32,
}

impl MemoryActiveConnection {
    pub fn new(connection_type: impl Into<String>, state_code: u32) -> Arc<Self> {
        Arc::new(Self {
            connection_type: connection_type.into(),
            state_code,
        })
    }
}

impl ActiveConnection for MemoryActiveConnection {
    fn connection_type(&self) -> String {
        self.connection_type.clone()
    }

    fn state_code(&self) -> u32 {
        self.state_code
    }
}

struct AccessPointState {
    ssid: Option<Vec<u8>>,
    strength: u8,
    frequency_mhz: u32,
}

pub struct MemoryAccessPoint {
    path: String,
    state: Mutex<AccessPointState>,
    strength_changed: Emitter<()>,
}

impl MemoryAccessPoint {
    pub fn new(path: impl Into<String>, ssid: Option<&[u8]>, strength: u8) -> Arc<Self> {
        Arc::new(Self {
            path: path.into(),
            state: Mutex::new(AccessPointState {
                ssid: ssid.map(|s| s.to_vec()),
                strength,
                frequency_mhz: 2412,
            }),
            strength_changed: Emitter::new(),
        })
    }

    pub fn set_strength(&self, strength: u8) {
        self.state.lock().unwrap().strength = strength;
        self.strength_changed.emit(&());
    }

    pub fn set_frequency_mhz(&self, frequency_mhz: u32) {
        self.state.lock().unwrap().frequency_mhz = frequency_mhz;
    }
}

impl AccessPoint for MemoryAccessPoint {
    fn path(&self) -> String {
        self.path.clone()
    }

    fn ssid_bytes(&self) -> Option<Vec<u8>> {
        self.state.lock().unwrap().ssid.clone()
    }

    fn strength_percent(&self) -> u8 {
        self.state.lock().unwrap().strength
    }

    fn frequency_mhz(&self) -> u32 {
        self.state.lock().unwrap().frequency_mhz
    }

    fn subscribe_strength(&self, handler: ChangeHandler) -> Subscription {
        self.strength_changed.connect(move |_| handler())
    }
}

struct WifiState {
    state_code: u32,
    activation_state_code: u32,
    bitrate_kbps: u32,
    access_points: Vec<Arc<dyn AccessPoint>>,
    active: Option<Arc<dyn AccessPoint>>,
}

pub struct MemoryWifiDevice {
    state: Mutex<WifiState>,
    changed: Emitter<()>,
    active_ap_changed: Emitter<()>,
    scan_requests: AtomicU32,
    fail_scans: bool,
}

impl MemoryWifiDevice {
    pub fn new() -> Arc<Self> {
        Self::build(false)
    }

    /// A device that rejects every scan request.
    pub fn failing_scans() -> Arc<Self> {
        Self::build(true)
    }

    fn build(fail_scans: bool) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(WifiState {
                state_code: 30,
                activation_state_code: 0,
                bitrate_kbps: 0,
                access_points: Vec::new(),
                active: None,
            }),
            changed: Emitter::new(),
            active_ap_changed: Emitter::new(),
            scan_requests: AtomicU32::new(0),
            fail_scans,
        })
    }

    pub fn set_state(&self, state_code: u32, activation_state_code: u32) {
        {
            let mut state = self.state.lock().unwrap();
            state.state_code = state_code;
            state.activation_state_code = activation_state_code;
        }
        self.changed.emit(&());
    }

    pub fn set_bitrate_kbps(&self, bitrate_kbps: u32) {
        self.state.lock().unwrap().bitrate_kbps = bitrate_kbps;
        self.changed.emit(&());
    }

    pub fn set_access_points(&self, access_points: Vec<Arc<dyn AccessPoint>>) {
        self.state.lock().unwrap().access_points = access_points;
        self.changed.emit(&());
    }

    pub fn set_active_access_point(&self, active: Option<Arc<dyn AccessPoint>>) {
        self.state.lock().unwrap().active = active;
        self.active_ap_changed.emit(&());
    }

    pub fn scan_request_count(&self) -> u32 {
        self.scan_requests.load(Ordering::SeqCst)
    }
}

impl DeviceHandle for MemoryWifiDevice {
    fn state_code(&self) -> u32 {
        self.state.lock().unwrap().state_code
    }

    fn activation_state_code(&self) -> u32 {
        self.state.lock().unwrap().activation_state_code
    }

    fn subscribe_changed(&self, handler: ChangeHandler) -> Subscription {
        self.changed.connect(move |_| handler())
    }
}

#[async_trait]
impl WifiDevice for MemoryWifiDevice {
    fn active_access_point(&self) -> Option<Arc<dyn AccessPoint>> {
        self.state.lock().unwrap().active.clone()
    }

    fn access_points(&self) -> Vec<Arc<dyn AccessPoint>> {
        self.state.lock().unwrap().access_points.clone()
    }

    fn bitrate_kbps(&self) -> u32 {
        self.state.lock().unwrap().bitrate_kbps
    }

    fn subscribe_active_access_point(&self, handler: ChangeHandler) -> Subscription {
        self.active_ap_changed.connect(move |_| handler())
    }

    async fn request_scan(&self) -> Result<()> {
        self.scan_requests.fetch_add(1, Ordering::SeqCst);
        if self.fail_scans {
            bail!("scan rejected by device");
        }
        Ok(())
    }
}

struct WiredState {
    state_code: u32,
    activation_state_code: u32,
    speed_mbps: u32,
}

pub struct MemoryWiredDevice {
    state: Mutex<WiredState>,
    changed: Emitter<()>,
}

impl MemoryWiredDevice {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(WiredState {
                state_code: 30,
                activation_state_code: 0,
                speed_mbps: 0,
            }),
            changed: Emitter::new(),
        })
    }

    pub fn set_state(&self, state_code: u32, activation_state_code: u32) {
        {
            let mut state = self.state.lock().unwrap();
            state.state_code = state_code;
            state.activation_state_code = activation_state_code;
        }
        self.changed.emit(&());
    }

    pub fn set_speed_mbps(&self, speed_mbps: u32) {
        self.state.lock().unwrap().speed_mbps = speed_mbps;
        self.changed.emit(&());
    }
}

impl DeviceHandle for MemoryWiredDevice {
    fn state_code(&self) -> u32 {
        self.state.lock().unwrap().state_code
    }

    fn activation_state_code(&self) -> u32 {
        self.state.lock().unwrap().activation_state_code
    }

    fn subscribe_changed(&self, handler: ChangeHandler) -> Subscription {
        self.changed.connect(move |_| handler())
    }
}

impl WiredDevice for MemoryWiredDevice {
    fn speed_mbps(&self) -> u32 {
        self.state.lock().unwrap().speed_mbps
    }
}

struct ClientState {
    devices: Vec<NetDevice>,
    wireless_enabled: bool,
    connectivity_code: u32,
    primary: Option<Arc<dyn ActiveConnection>>,
    activating: Option<Arc<dyn ActiveConnection>>,
}

pub struct MemoryClient {
    state: Mutex<ClientState>,
    wireless_changed: Emitter<()>,
    connectivity_changed: Emitter<()>,
    primary_changed: Emitter<()>,
    activating_changed: Emitter<()>,
}

impl MemoryClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ClientState {
                devices: Vec::new(),
                wireless_enabled: true,
                connectivity_code: 0,
                primary: None,
                activating: None,
            }),
            wireless_changed: Emitter::new(),
            connectivity_changed: Emitter::new(),
            primary_changed: Emitter::new(),
            activating_changed: Emitter::new(),
        })
    }

    pub fn attach_wifi(&self, device: Arc<MemoryWifiDevice>) {
        self.state.lock().unwrap().devices.push(NetDevice::Wifi(device));
    }

    pub fn attach_wired(&self, device: Arc<MemoryWiredDevice>) {
        self.state.lock().unwrap().devices.push(NetDevice::Wired(device));
    }

    pub fn set_connectivity_code(&self, code: u32) {
        self.state.lock().unwrap().connectivity_code = code;
        self.connectivity_changed.emit(&());
    }

    pub fn set_primary(&self, primary: Option<Arc<dyn ActiveConnection>>) {
        self.state.lock().unwrap().primary = primary;
        self.primary_changed.emit(&());
    }

    pub fn set_activating(&self, activating: Option<Arc<dyn ActiveConnection>>) {
        self.state.lock().unwrap().activating = activating;
        self.activating_changed.emit(&());
    }
}

impl NetClient for MemoryClient {
    fn devices(&self) -> Vec<NetDevice> {
        self.state.lock().unwrap().devices.clone()
    }

    fn wireless_enabled(&self) -> bool {
        self.state.lock().unwrap().wireless_enabled
    }

    fn set_wireless_enabled(&self, enabled: bool) {
        self.state.lock().unwrap().wireless_enabled = enabled;
        self.wireless_changed.emit(&());
    }

    fn connectivity_code(&self) -> u32 {
        self.state.lock().unwrap().connectivity_code
    }

    fn primary_connection(&self) -> Option<Arc<dyn ActiveConnection>> {
        self.state.lock().unwrap().primary.clone()
    }

    fn activating_connection(&self) -> Option<Arc<dyn ActiveConnection>> {
        self.state.lock().unwrap().activating.clone()
    }

    fn subscribe(&self, property: ClientProperty, handler: ChangeHandler) -> Subscription {
        let emitter = match property {
            ClientProperty::WirelessEnabled => &self.wireless_changed,
            ClientProperty::Connectivity => &self.connectivity_changed,
            ClientProperty::PrimaryConnection => &self.primary_changed,
            ClientProperty::ActivatingConnection => &self.activating_changed,
        };
        emitter.connect(move |_| handler())
    }
}

/// Hands out a pre-built client and counts how many times it was asked to.
pub struct MemoryClientFactory {
    client: Arc<MemoryClient>,
    created: AtomicU32,
}

impl MemoryClientFactory {
    pub fn new(client: Arc<MemoryClient>) -> Self {
        Self {
            client,
            created: AtomicU32::new(0),
        }
    }

    pub fn created(&self) -> u32 {
        self.created.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientFactory for MemoryClientFactory {
    async fn create(&self) -> Result<Arc<dyn NetClient>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(self.client.clone())
    }
}

/// Always fails acquisition; models an unreachable transport.
pub struct FailingClientFactory;

#[async_trait]
impl ClientFactory for FailingClientFactory {
    async fn create(&self) -> Result<Arc<dyn NetClient>> {
        bail!("transport unavailable")
    }
}
