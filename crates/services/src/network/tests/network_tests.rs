use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use shared::domain::{Connectivity, DeviceState, PrimaryKind};

use super::client::{ClientFactory, NetClient};
use super::memory::{
    FailingClientFactory, MemoryAccessPoint, MemoryActiveConnection, MemoryClient,
    MemoryClientFactory, MemoryWifiDevice, MemoryWiredDevice,
};
use super::Network;

async fn attached_network(client: Arc<MemoryClient>) -> Arc<Network> {
    let network = Network::new(MemoryClientFactory::new(client));
    network.ready().await;
    network
}

fn count_changes(network: &Network) -> (Arc<AtomicU32>, crate::Subscription) {
    let count = Arc::new(AtomicU32::new(0));
    let sub = network.connect_changed({
        let count = count.clone();
        move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        }
    });
    (count, sub)
}

#[tokio::test]
async fn wifi_without_active_access_point_reports_sentinels() {
    let client = MemoryClient::new();
    client.attach_wifi(MemoryWifiDevice::new());
    let network = attached_network(client).await;

    let wifi = network.wifi().expect("wifi adapter");
    assert_eq!(wifi.ssid(), "");
    assert_eq!(wifi.strength(), -1);
    assert_eq!(wifi.state(), DeviceState::Disconnected);
}

#[tokio::test]
async fn active_access_point_ssid_is_decoded_from_bytes() {
    let client = MemoryClient::new();
    let device = MemoryWifiDevice::new();
    let ap = MemoryAccessPoint::new("/ap/1", Some(b"Home"), 74);
    device.set_access_points(vec![ap.clone()]);
    device.set_active_access_point(Some(ap));
    client.attach_wifi(device);
    let network = attached_network(client).await;

    let wifi = network.wifi().expect("wifi adapter");
    assert_eq!(wifi.ssid(), "Home");
    assert_eq!(wifi.strength(), 74);
}

#[tokio::test]
async fn access_point_listing_marks_active_and_names_hidden_networks() {
    let client = MemoryClient::new();
    let device = MemoryWifiDevice::new();
    let home = MemoryAccessPoint::new("/ap/1", Some(b"Home"), 74);
    let hidden = MemoryAccessPoint::new("/ap/2", None, 40);
    device.set_access_points(vec![home.clone(), hidden]);
    device.set_active_access_point(Some(home));
    client.attach_wifi(device);
    let network = attached_network(client).await;

    let listing = network.wifi().expect("wifi adapter").access_points();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].ssid, "Home");
    assert!(listing[0].active);
    assert_eq!(listing[1].ssid, "Unknown");
    assert!(!listing[1].active);
}

#[tokio::test]
async fn rebinding_moves_the_strength_subscription_to_the_new_access_point() {
    let client = MemoryClient::new();
    let device = MemoryWifiDevice::new();
    let first = MemoryAccessPoint::new("/ap/1", Some(b"First"), 50);
    let second = MemoryAccessPoint::new("/ap/2", Some(b"Second"), 60);
    device.set_access_points(vec![first.clone(), second.clone()]);
    device.set_active_access_point(Some(first.clone()));
    client.attach_wifi(device.clone());
    let network = attached_network(client).await;
    let (count, _sub) = count_changes(&network);

    first.set_strength(55);
    assert_eq!(count.load(Ordering::SeqCst), 1);

    device.set_active_access_point(Some(second.clone()));
    let after_switch = count.load(Ordering::SeqCst);

    first.set_strength(10);
    assert_eq!(count.load(Ordering::SeqCst), after_switch);

    second.set_strength(65);
    assert_eq!(count.load(Ordering::SeqCst), after_switch + 1);
    assert_eq!(network.wifi().expect("wifi adapter").strength(), 65);
}

#[tokio::test]
async fn connectivity_change_recomputes_and_emits_once() {
    let client = MemoryClient::new();
    client.set_connectivity_code(4);
    let network = attached_network(client.clone()).await;
    assert_eq!(network.connectivity(), Connectivity::Full);

    let (count, _sub) = count_changes(&network);
    client.set_connectivity_code(2);

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(network.connectivity(), Connectivity::Portal);
}

#[tokio::test]
async fn primary_falls_back_to_the_activating_connection() {
    let client = MemoryClient::new();
    client.set_activating(Some(MemoryActiveConnection::new("802-11-wireless", 1)));
    let network = attached_network(client.clone()).await;
    assert_eq!(network.primary(), Some(PrimaryKind::Wifi));

    client.set_primary(Some(MemoryActiveConnection::new("802-3-ethernet", 2)));
    assert_eq!(network.primary(), Some(PrimaryKind::Wired));

    client.set_primary(Some(MemoryActiveConnection::new("tun", 2)));
    client.set_activating(None);
    assert_eq!(network.primary(), None);
}

#[tokio::test]
async fn failed_acquisition_leaves_the_default_snapshot() {
    let network = Network::new(FailingClientFactory);
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }

    assert_eq!(network.primary(), None);
    assert_eq!(network.connectivity(), Connectivity::Unknown);
    assert!(!network.wifi_enabled());
    assert!(network.wifi().is_none());

    // Terminal state, toggling the radio has nowhere to go.
    network.toggle_wifi();
    assert!(!network.wifi_enabled());
}

#[tokio::test]
async fn toggle_wifi_flips_the_radio() {
    let client = MemoryClient::new();
    let network = attached_network(client).await;
    assert!(network.wifi_enabled());

    network.toggle_wifi();
    assert!(!network.wifi_enabled());
    network.toggle_wifi();
    assert!(network.wifi_enabled());
}

#[tokio::test]
async fn wired_adapter_reports_state_and_speed() {
    let client = MemoryClient::new();
    let device = MemoryWiredDevice::new();
    device.set_state(100, 2);
    device.set_speed_mbps(1000);
    client.attach_wired(device.clone());
    let network = attached_network(client).await;

    let wired = network.wired().expect("wired adapter");
    assert_eq!(wired.state(), DeviceState::Activated);
    assert_eq!(wired.speed_mbps(), 1000);

    let (count, _sub) = count_changes(&network);
    device.set_state(30, 0);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(wired.state(), DeviceState::Disconnected);
}

#[tokio::test]
async fn scan_requests_reach_the_device() {
    let client = MemoryClient::new();
    let device = MemoryWifiDevice::new();
    client.attach_wifi(device.clone());
    let network = attached_network(client).await;

    network.wifi().expect("wifi adapter").scan();
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
    assert_eq!(device.scan_request_count(), 1);
}

#[tokio::test]
async fn adapter_events_rederive_the_snapshot() {
    let client = MemoryClient::new();
    let device = MemoryWifiDevice::new();
    let ap = MemoryAccessPoint::new("/ap/1", Some(b"Home"), 50);
    device.set_access_points(vec![ap.clone()]);
    device.set_active_access_point(Some(ap.clone()));
    client.attach_wifi(device.clone());
    client.set_connectivity_code(4);
    client.set_primary(Some(MemoryActiveConnection::new("802-11-wireless", 2)));
    let network = attached_network(client).await;
    let (count, _sub) = count_changes(&network);

    // A device-level event republishes once and leaves the derived pair
    // consistent with client state.
    ap.set_strength(60);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(network.primary(), Some(PrimaryKind::Wifi));
    assert_eq!(network.connectivity(), Connectivity::Full);

    device.set_state(100, 2);
    assert_eq!(count.load(Ordering::SeqCst), 2);
    assert_eq!(network.connectivity(), Connectivity::Full);
}

#[tokio::test]
async fn rejected_scan_is_swallowed() {
    let client = MemoryClient::new();
    let device = MemoryWifiDevice::failing_scans();
    client.attach_wifi(device.clone());
    let network = attached_network(client).await;

    network.wifi().expect("wifi adapter").scan();
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
    assert_eq!(device.scan_request_count(), 1);
}

#[tokio::test]
async fn install_and_instance_share_one_lazily_built_service() {
    let client = MemoryClient::new();
    client.set_connectivity_code(4);
    let factory = Arc::new(MemoryClientFactory::new(client));
    Network::install(SharedFactory(factory.clone())).unwrap();
    assert!(crate::registry().is_exported("network"));

    let first = Network::instance().unwrap();
    let second = Network::instance().unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    first.ready().await;
    assert_eq!(factory.created(), 1);
    assert_eq!(first.connectivity(), Connectivity::Full);
}

struct SharedFactory(Arc<MemoryClientFactory>);

#[async_trait::async_trait]
impl ClientFactory for SharedFactory {
    async fn create(&self) -> anyhow::Result<Arc<dyn NetClient>> {
        self.0.create().await
    }
}
