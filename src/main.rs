use std::io;

use checkout_sim::{Renderer, Store, StoreConfig};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Simulate a day at the supermarket checkouts
#[derive(Parser, Debug)]
#[command(name = "checkout-sim", version, about)]
struct Args {
    /// Draw the checkout lines while the store is open
    #[arg(short, long)]
    draw: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Default: INFO, use RUST_LOG=debug to follow every customer
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let store = Store::open(StoreConfig::default())?;

    let renderer = args
        .draw
        .then(|| Renderer::new(store.observer(), io::stdout()).spawn());

    let report = store.run().await?;

    // The report is printed even if drawing failed.
    let drawn = match renderer {
        Some(renderer) => renderer.await,
        None => Ok(Ok(io::stdout())),
    };

    info!(
        served = report.served,
        mean_wait_secs = report.mean_wait_secs(),
        "Simulation finished"
    );
    println!("{report}");

    drawn??;

    Ok(())
}
