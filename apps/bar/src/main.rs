use anyhow::{anyhow, Result};
use clap::Parser;
use services::network::memory::{
    MemoryAccessPoint, MemoryActiveConnection, MemoryClient, MemoryClientFactory,
    MemoryWifiDevice,
};
use services::Network;
use toolkit::headless::{headless, HeadlessToolkit};
use toolkit::WidgetRef;
use ui_core::Factory;

const DEFAULT_BAR: &str = r#"{
    "type": "center_box",
    "start": {
        "type": "box",
        "spacing": 8,
        "children": [
            { "type": "icon", "icon": "network-wireless" },
            { "type": "label", "text": "ssid" }
        ]
    },
    "center": { "type": "label", "text": "clock" },
    "end": {
        "type": "box",
        "spacing": 8,
        "children": [
            { "type": "slider", "min": 0, "max": 100, "value": 35, "on_change": "wpctl set-volume @DEFAULT_SINK@ {}%" },
            { "type": "switch", "active": true, "on_activate": "nmcli radio wifi {}" }
        ]
    }
}"#;

#[derive(Parser, Debug)]
struct Args {
    /// Path to a widget layout file. Falls back to a built-in bar layout.
    #[arg(long)]
    layout: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let json = match &args.layout {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEFAULT_BAR.to_string(),
    };

    let factory = Factory::with_shell(HeadlessToolkit::new());
    let root = factory.build_json(&json)?;
    println!("Built widget tree:");
    print_tree(&root, 0);

    // Wire up the network service against the in-memory transport and walk
    // it through a connectivity change.
    let client = MemoryClient::new();
    let device = MemoryWifiDevice::new();
    let ap = MemoryAccessPoint::new("/ap/home", Some(b"HomeNet"), 72);
    device.set_access_points(vec![ap.clone()]);
    device.set_active_access_point(Some(ap));
    client.attach_wifi(device);
    client.set_connectivity_code(4);
    client.set_primary(Some(MemoryActiveConnection::new("802-11-wireless", 2)));

    Network::install(MemoryClientFactory::new(client.clone()))?;
    let network = Network::instance()?;
    network.ready().await;

    let wifi = network.wifi().ok_or_else(|| anyhow!("no wifi adapter"))?;
    println!(
        "network: primary={:?} connectivity={:?} ssid={} strength={}",
        network.primary(),
        network.connectivity(),
        wifi.ssid(),
        wifi.strength()
    );

    let sub = network.connect_changed(|_| println!("network: changed"));
    client.set_connectivity_code(2);
    println!(
        "network: primary={:?} connectivity={:?}",
        network.primary(),
        network.connectivity()
    );
    sub.disconnect();

    Ok(())
}

fn print_tree(widget: &WidgetRef, depth: usize) {
    let inspect = headless(widget);
    println!("{}{:?}", "  ".repeat(depth), widget.kind());
    for slot in [toolkit::Slot::Start, toolkit::Slot::Center, toolkit::Slot::End] {
        if let Some(child) = inspect.slot(slot) {
            print_tree(&child, depth + 1);
        }
    }
    if let Some(child) = inspect.child() {
        print_tree(&child, depth + 1);
    }
    for child in inspect.children() {
        print_tree(&child, depth + 1);
    }
}
