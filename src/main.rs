use clap::Parser;
use log::{error, info};
use phishlab::configuration::{CliArgs, Config};
use phishlab::controller::Controller;

#[tokio::main]
async fn main() {
    // RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    info!(
        "phishlab v{} - phishing-awareness demonstration backend",
        env!("CARGO_PKG_VERSION")
    );

    let args = CliArgs::parse();

    let config = Config::load(&args).unwrap_or_else(|e| {
        error!("Unable to load configuration: {}", e);
        std::process::exit(1);
    });
    info!("Configuration loaded successfully");

    let controller = Controller::new(config).unwrap_or_else(|e| {
        error!("Unable to create a controller instance: {}, exiting...", e);
        std::process::exit(1);
    });

    if let Err(e) = controller.run().await {
        error!("Error occured in the controller process: {}, exiting...", e);
        std::process::exit(1);
    }
}
