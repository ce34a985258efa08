use ad_publisher::AppConfig;
use ad_publisher::server;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "ad-publisher",
    about = "Headless-browser automation service that publishes vehicle listings",
    version
)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, env = "AD_PUBLISHER_CONFIG")]
    config: Option<PathBuf>,

    /// Listen port override
    #[arg(long)]
    port: Option<u16>,

    /// Run the browser with a visible window
    #[arg(long)]
    headed: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config =
        AppConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.headed {
        config.browser.headless = false;
    }
    config.validate().context("invalid configuration")?;

    server::serve(Arc::new(config)).await
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = if verbose {
        EnvFilter::new("debug").add_directive("chromiumoxide=info".parse().unwrap())
    } else {
        EnvFilter::from_default_env()
            .add_directive("info".parse().unwrap())
            .add_directive("chromiumoxide=off".parse().unwrap())
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
