// SPDX-License-Identifier: MPL-2.0

//! Demo program: Print decoded Button Plus events until Ctrl-C.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example watch_events -- <ws-url> [mac]
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=mystrom_lib=debug cargo run --example watch_events -- ws://192.168.1.2:8765/events A4CF12F0E5D6
//! ```

use std::env;

use mystrom_lib::Bridge;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mystrom_lib=info".parse()?),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <ws-url> [mac]", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --example watch_events -- ws://192.168.1.2:8765/events");
        std::process::exit(1);
    }

    let url = &args[1];
    let only_mac = args.get(2).cloned();

    let shutdown = CancellationToken::new();
    let bridge = Bridge::connect(url, shutdown.clone())?;

    bridge.subscribe(move |event| {
        if let Some(mac) = &only_mac
            && !event.is_from(mac)
        {
            return;
        }

        match event.button_index() {
            Some(button) => println!("{} button {button}: {}", event.mac, event.action),
            None => println!(
                "{} {} {}: battery={:?} temperature={:?} humidity={:?}",
                event.mac,
                event.component,
                event.action,
                event.battery,
                event.temperature,
                event.humidity
            ),
        }
    });

    println!("Listening on {url}, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    shutdown.cancel();
    bridge.join().await;
    println!("Stopped");

    Ok(())
}
