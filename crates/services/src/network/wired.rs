//! Wired device adapter. Thin compared to wireless: no access-point
//! tracking, just state classification and link speed.

use std::sync::{Arc, Mutex, Weak};

use shared::domain::{DeviceState, Internet};

use crate::emitter::{Changed, Emitter, Subscription};
use crate::network::client::WiredDevice;

pub struct Wired {
    device: Arc<dyn WiredDevice>,
    changed: Emitter<Changed>,
    device_sub: Mutex<Option<Subscription>>,
}

impl Wired {
    pub fn new(device: Arc<dyn WiredDevice>) -> Arc<Self> {
        let adapter = Arc::new(Self {
            device: device.clone(),
            changed: Emitter::new(),
            device_sub: Mutex::new(None),
        });
        let weak = Arc::downgrade(&adapter);
        let sub = device.subscribe_changed(Box::new(move || {
            if let Some(adapter) = Weak::upgrade(&weak) {
                adapter.changed.emit(&Changed);
            }
        }));
        *adapter.device_sub.lock().unwrap() = Some(sub);
        adapter
    }

    pub fn state(&self) -> DeviceState {
        DeviceState::from_code(self.device.state_code())
    }

    pub fn internet(&self) -> Internet {
        Internet::from_activation_code(self.device.activation_state_code())
    }

    pub fn speed_mbps(&self) -> u32 {
        self.device.speed_mbps()
    }

    pub fn connect_changed(
        &self,
        handler: impl Fn(&Changed) + Send + Sync + 'static,
    ) -> Subscription {
        self.changed.connect(handler)
    }
}
