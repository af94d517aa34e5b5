// SPDX-License-Identifier: MPL-2.0

//! Demo program: Check a device, list what it sees and optionally register a webhook.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example probe_device -- <host> [webhook-url]
//! ```
//!
//! # Example
//!
//! ```bash
//! cargo run --example probe_device -- 192.168.1.10 http://192.168.1.2:8123/api/webhook/button
//! ```

use std::env;

use mystrom_lib::RestClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <host> [webhook-url]", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --example probe_device -- 192.168.1.10");
        std::process::exit(1);
    }

    let client = RestClient::new(args[1].as_str())?;

    let Some(info) = client.probe().await? else {
        println!("{} is offline or not a Button Plus", args[1]);
        return Ok(());
    };

    println!("Button Plus {} at {}", info.mac, info.ip);

    match client.get_sensor_data().await {
        Ok(sensors) => println!("Sensors: {sensors}"),
        Err(e) => println!("Sensors unavailable: {e}"),
    }

    for access_point in client.get_access_points().await? {
        println!("  {:<32} {}", access_point.ssid, access_point.strength);
    }

    if let Some(webhook) = args.get(2) {
        client.register_webhook(webhook).await?;
        println!("Webhook registered: {webhook}");
        println!("Actions: {}", client.get_all_actions().await?);
    }

    Ok(())
}
