//! Wireless device adapter.
//!
//! Tracks the device's active access point, rebinding its strength
//! subscription whenever the active AP changes, and republishes every
//! upstream notification as a single `changed` event.

use std::sync::{Arc, Mutex, Weak};

use tracing::warn;

use shared::domain::{AccessPointInfo, DeviceState, Internet};

use crate::emitter::{Changed, Emitter, Subscription};
use crate::network::client::{AccessPoint, WifiDevice};

/// Missing active access point reads as this strength.
const NO_STRENGTH: i32 = -1;

struct ApBinding {
    access_point: Option<Arc<dyn AccessPoint>>,
    strength_sub: Option<Subscription>,
    device_subs: Vec<Subscription>,
}

pub struct Wifi {
    device: Arc<dyn WifiDevice>,
    changed: Emitter<Changed>,
    binding: Mutex<ApBinding>,
}

impl Wifi {
    pub fn new(device: Arc<dyn WifiDevice>) -> Arc<Self> {
        let adapter = Arc::new(Self {
            device: device.clone(),
            changed: Emitter::new(),
            binding: Mutex::new(ApBinding {
                access_point: None,
                strength_sub: None,
                device_subs: Vec::new(),
            }),
        });

        let weak = Arc::downgrade(&adapter);
        let device_sub = device.subscribe_changed(Box::new({
            let weak = weak.clone();
            move || {
                if let Some(adapter) = Weak::upgrade(&weak) {
                    adapter.changed.emit(&Changed);
                }
            }
        }));
        let ap_sub = device.subscribe_active_access_point(Box::new(move || {
            if let Some(adapter) = Weak::upgrade(&weak) {
                Self::rebind_active_access_point(&adapter);
                adapter.changed.emit(&Changed);
            }
        }));
        adapter
            .binding
            .lock()
            .unwrap()
            .device_subs
            .extend([device_sub, ap_sub]);

        Self::rebind_active_access_point(&adapter);
        adapter
    }

    /// Drops the previous strength subscription, then binds the current
    /// active access point and subscribes to its strength updates.
    fn rebind_active_access_point(this: &Arc<Self>) {
        let active = this.device.active_access_point();
        let mut binding = this.binding.lock().unwrap();
        binding.strength_sub = None;
        binding.access_point = active.clone();
        if let Some(access_point) = active {
            let weak = Arc::downgrade(this);
            binding.strength_sub = Some(access_point.subscribe_strength(Box::new(move || {
                if let Some(adapter) = Weak::upgrade(&weak) {
                    adapter.changed.emit(&Changed);
                }
            })));
        }
    }

    pub fn state(&self) -> DeviceState {
        DeviceState::from_code(self.device.state_code())
    }

    pub fn internet(&self) -> Internet {
        Internet::from_activation_code(self.device.activation_state_code())
    }

    /// Signal strength of the active access point, or `-1` when there is
    /// no active access point.
    pub fn strength(&self) -> i32 {
        match &self.binding.lock().unwrap().access_point {
            Some(access_point) => i32::from(access_point.strength_percent()),
            None => NO_STRENGTH,
        }
    }

    /// SSID of the active access point, decoded lossily. Empty when there
    /// is no active access point or the AP carries no SSID.
    pub fn ssid(&self) -> String {
        self.binding
            .lock()
            .unwrap()
            .access_point
            .as_ref()
            .and_then(|access_point| access_point.ssid_bytes())
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }

    pub fn frequency_mhz(&self) -> u32 {
        self.binding
            .lock()
            .unwrap()
            .access_point
            .as_ref()
            .map(|access_point| access_point.frequency_mhz())
            .unwrap_or(0)
    }

    pub fn bitrate_kbps(&self) -> u32 {
        self.device.bitrate_kbps()
    }

    /// Fresh listing of visible access points. Hidden SSIDs render as
    /// `Unknown`; the active flag is matched by access-point identity.
    pub fn access_points(&self) -> Vec<AccessPointInfo> {
        let active_path = self
            .binding
            .lock()
            .unwrap()
            .access_point
            .as_ref()
            .map(|access_point| access_point.path());
        self.device
            .access_points()
            .iter()
            .map(|access_point| {
                let path = access_point.path();
                AccessPointInfo {
                    ssid: access_point
                        .ssid_bytes()
                        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    strength: access_point.strength_percent(),
                    frequency_mhz: access_point.frequency_mhz(),
                    active: active_path.as_deref() == Some(path.as_str()),
                }
            })
            .collect()
    }

    /// Kicks off a background scan. Failures are logged and swallowed;
    /// fresh results arrive through device change notifications.
    pub fn scan(&self) {
        let device = self.device.clone();
        tokio::spawn(async move {
            if let Err(error) = device.request_scan().await {
                warn!(%error, "wifi scan request failed");
            }
        });
    }

    pub fn connect_changed(
        &self,
        handler: impl Fn(&Changed) + Send + Sync + 'static,
    ) -> Subscription {
        self.changed.connect(handler)
    }
}
