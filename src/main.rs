use clap::Parser;
use nestegg::api::{Cli, run};

#[tokio::main]
async fn main() {
    nestegg::telemetry::init_tracing();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
